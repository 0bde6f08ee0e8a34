//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::CollectorConfig;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::Collector;

/// Execute the `run` command
pub async fn run_collector(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    apply_overrides(&mut config, args);
    config_loader::ConfigLoader::validate(&config)
        .context("Configuration invalid after applying CLI overrides")?;

    info!(
        port = config.server.port,
        address = %config.server.address,
        log_folder = %config.log_folder,
        "Configuration loaded"
    );

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let mut collector = Collector::new(config)
        .start()
        .await
        .context("Failed to start collector")?;

    let outcome = tokio::select! {
        result = collector.wait() => result.context("Collector stopped"),
        signal = shutdown_signal() => {
            signal.context("Failed to listen for shutdown signal")?;
            warn!("Received shutdown signal, stopping collector...");
            Ok(())
        }
    };

    let stats = collector.shutdown();
    stats.print_summary();

    if outcome.is_ok() {
        info!("Syslog collector finished");
    }
    outcome
}

fn apply_overrides(config: &mut CollectorConfig, args: &RunArgs) {
    if let Some(port) = args.port {
        info!(port = port, "Overriding listen port from CLI");
        config.server.port = port;
    }
    if let Some(ref log_folder) = args.log_folder {
        info!(log_folder = %log_folder, "Overriding log folder from CLI");
        config.log_folder = log_folder.clone();
    }
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
