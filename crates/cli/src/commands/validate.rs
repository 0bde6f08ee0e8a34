//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::CollectorConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    listen: String,
    log_folder: String,
    queue_capacity: usize,
    queue_policy: String,
    record_format: String,
    on_write_error: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(summarize(&config)),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

fn summarize(config: &CollectorConfig) -> ConfigSummary {
    ConfigSummary {
        listen: config.server.bind_address(),
        log_folder: config.log_folder.clone(),
        queue_capacity: config.queue.capacity,
        queue_policy: format!("{:?}", config.queue.policy),
        record_format: format!("{:?}", config.output.record_format),
        on_write_error: format!("{:?}", config.output.on_write_error),
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &CollectorConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.server.port < 1024 {
        warnings.push(format!(
            "port {} is privileged - the collector needs elevated permissions to bind it",
            config.server.port
        ));
    }

    if config.log_folder.matches(contracts::HOSTNAME_PLACEHOLDER).count() > 1 {
        warnings.push(
            "log_folder contains %HOSTNAME% more than once - only the first is replaced"
                .to_string(),
        );
    }

    if config.output.on_write_error == contracts::WriteFailurePolicy::Continue {
        warnings.push("output.on_write_error is 'continue' - failed writes are dropped".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Listen: udp://{}", summary.listen);
            println!("  Log folder: {}", summary.log_folder);
            println!(
                "  Queue: {} ({})",
                summary.queue_capacity, summary.queue_policy
            );
            println!("  Record format: {}", summary.record_format);
            println!("  On write error: {}", summary.on_write_error);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
