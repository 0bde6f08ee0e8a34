//! # Ingestion
//!
//! Syslog ingestion over UDP.
//!
//! Responsibilities:
//! - Bind the configured UDP endpoint
//! - Decode RFC 5424 / RFC 3164 datagrams into `LogMessage`
//! - Tag each message with the sender address
//! - Hand messages to the dispatcher over a bounded queue
//!
//! ## Usage Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ingestion::{message_queue, IngestionMetrics, UdpReceiver};
//!
//! let metrics = Arc::new(IngestionMetrics::new());
//! let (tx, rx) = message_queue(&config.queue, Arc::clone(&metrics));
//! let receiver = UdpReceiver::bind(&config.server, tx, metrics).await?;
//! tokio::spawn(receiver.run());
//! while let Ok(message) = rx.recv().await {
//!     // Persist message
//! }
//! ```

mod error;
mod metrics;
pub mod parser;
mod queue;
mod receiver;

// Re-exports
pub use contracts::LogMessage;
pub use error::{IngestionError, ParseError, Result};
pub use metrics::{IngestionMetrics, MetricsSnapshot};
pub use parser::parse;
pub use queue::{message_queue, MessageReceiver, MessageSender, PushOutcome};
pub use receiver::UdpReceiver;
