//! Dispatcher error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a hostname into a log file path
#[derive(Debug, Error)]
pub enum PathError {
    /// The hostname cannot be used as a single path component
    #[error("hostname '{hostname}' is not a safe path component")]
    UnsafeHostname { hostname: String },

    /// The per-host directory could not be created
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Opening or appending to the host log failed
    #[error("failed to persist record for '{hostname}' to {}: {source}", path.display())]
    Persist {
        hostname: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No usable destination for the hostname
    #[error(transparent)]
    Path(#[from] PathError),

    /// Record could not be rendered
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DispatchError {
    /// Create a persistence error
    pub fn persist(hostname: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Persist {
            hostname: hostname.into(),
            path: path.into(),
            source,
        }
    }
}
