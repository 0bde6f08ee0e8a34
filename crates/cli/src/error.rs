//! Error types for CLI operations.

use ingestion::IngestionError;
use dispatcher::DispatchError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Receiver failed
    #[error("Receiver failed: {0}")]
    Receiver(#[from] IngestionError),

    /// Dispatcher failed to persist a message
    #[error("Dispatcher failed: {0}")]
    Dispatcher(#[from] DispatchError),

    /// A collector task ended although it should run until shutdown
    #[error("{task} task stopped unexpectedly")]
    TaskStopped { task: &'static str },

    /// A collector task panicked or was cancelled
    #[error("{task} task aborted: {message}")]
    TaskAborted { task: &'static str, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn task_aborted(task: &'static str, message: impl Into<String>) -> Self {
        Self::TaskAborted {
            task,
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
