//! DataSink trait - Dispatcher output interface

use std::path::PathBuf;

use crate::LogMessage;

/// Data output trait
///
/// The dispatcher hands every dequeued message to exactly one sink.
#[trait_variant::make(DataSink: Send)]
pub trait LocalDataSink {
    /// Error produced by a failed write
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one message, returning the file it landed in
    ///
    /// # Errors
    /// Returns the write error with enough context to report it
    async fn write(&mut self, message: &LogMessage) -> Result<PathBuf, Self::Error>;
}
