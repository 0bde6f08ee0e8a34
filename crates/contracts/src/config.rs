//! CollectorConfig - Config Loader output
//!
//! Describes the listening endpoint, the per-host path template, the queue
//! between receiver and dispatcher, and how records are written.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Placeholder substituted with the message hostname in `log_folder`
pub const HOSTNAME_PLACEHOLDER: &str = "%HOSTNAME%";

/// Name of the per-host log file
pub const LOG_FILE_NAME: &str = "syslog.log";

/// Complete collector configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CollectorConfig {
    /// Listening endpoint
    #[validate(nested)]
    pub server: ServerConfig,

    /// Directory template, e.g. `/var/log/%HOSTNAME%/`
    #[validate(length(min = 1))]
    pub log_folder: String,

    /// Receiver -> dispatcher queue
    #[serde(default)]
    #[validate(nested)]
    pub queue: QueueConfig,

    /// Record format and failure policy
    #[serde(default)]
    pub output: OutputConfig,
}

/// UDP endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Listen port
    #[validate(range(min = 1))]
    pub port: u16,

    /// Bind address
    #[serde(default = "default_address")]
    pub address: String,

    /// Receive buffer size; larger datagrams are truncated by the OS
    #[serde(default = "default_max_datagram_size")]
    #[validate(range(min = 1, max = 65535))]
    pub max_datagram_size: usize,
}

impl ServerConfig {
    /// Socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_max_datagram_size() -> usize {
    65535
}

/// Bounded queue settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueueConfig {
    /// Maximum number of messages waiting for the dispatcher
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1))]
    pub capacity: usize,

    /// What the receiver does when the queue is full
    #[serde(default)]
    pub policy: BackpressurePolicy,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
            policy: BackpressurePolicy::default(),
        }
    }
}

fn default_queue_capacity() -> usize {
    1024
}

/// Receiver behaviour when the queue is full
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackpressurePolicy {
    /// Wait for space; the OS socket buffer absorbs or drops the overflow
    #[default]
    Block,
    /// Discard the message that does not fit
    DropNewest,
}

/// Persistence settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Line rendering
    #[serde(default)]
    pub record_format: RecordFormat,

    /// Reaction to a failed write
    #[serde(default)]
    pub on_write_error: WriteFailurePolicy,
}

/// Line rendering of a persisted message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    /// One JSON object per line, keys sorted
    #[default]
    Json,
    /// `map[key:value ...]`, keys sorted
    Text,
}

/// Reaction to a failed write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Stop the dispatcher and exit the process
    #[default]
    Exit,
    /// Log, count, drop the message and keep going
    Continue,
}
