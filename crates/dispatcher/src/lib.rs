//! # Dispatcher
//!
//! Persists queued log messages.
//!
//! Responsibilities:
//! - Consume `LogMessage`s from the ingestion queue in order
//! - Resolve the per-host log file from the `log_folder` template
//! - Append one record per message
//! - Apply the write-failure policy

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod path;
pub mod record;
pub mod sinks;

pub use contracts::{DataSink, LogMessage};
pub use dispatcher::{DispatchSummary, Dispatcher};
pub use error::{DispatchError, PathError};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use sinks::HostFileSink;
