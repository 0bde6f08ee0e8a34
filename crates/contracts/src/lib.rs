//! # Contracts
//!
//! Shared data structures and traits for the collector crates.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data flow
//! - `ingestion` turns a datagram into a [`LogMessage`]
//! - `dispatcher` consumes it through a [`DataSink`]
//! - [`CollectorConfig`] is produced by `config_loader`

mod config;
mod error;
mod message;
mod sink;

pub use config::*;
pub use error::*;
pub use message::*;
pub use sink::*;
