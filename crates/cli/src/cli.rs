//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Syslog Collector - receives syslog over UDP and writes one log file per host
#[derive(Parser, Debug)]
#[command(
    name = "syslog-collector",
    author,
    version,
    about = "UDP syslog collector with per-host log files",
    long_about = "Receives RFC 3164 and RFC 5424 syslog datagrams over UDP and appends\n\
                  every message to <log_folder>/syslog.log, with %HOSTNAME% in the\n\
                  folder template replaced by the sender's hostname."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SYSLOG_COLLECTOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SYSLOG_COLLECTOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Receive and persist syslog messages until terminated
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (YAML, TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.yml",
        env = "SYSLOG_COLLECTOR_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the UDP listen port from configuration
    #[arg(long, env = "SYSLOG_COLLECTOR_PORT")]
    pub port: Option<u16>,

    /// Override the log folder template from configuration
    #[arg(long, env = "SYSLOG_COLLECTOR_LOG_FOLDER")]
    pub log_folder: Option<String>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SYSLOG_COLLECTOR_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.yml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
