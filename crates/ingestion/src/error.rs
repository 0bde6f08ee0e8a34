//! Ingestion error types

use std::io;

use thiserror::Error;

/// A datagram that could not be decoded into a message
///
/// Recovered locally: the datagram is dropped and ingestion continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to parse datagram: {reason}")]
pub struct ParseError {
    /// Human-readable cause
    pub reason: &'static str,
}

impl ParseError {
    /// Nothing left after trimming line terminators
    pub const EMPTY: ParseError = ParseError {
        reason: "empty datagram",
    };

    /// Neither RFC 5424 nor RFC 3164 framing matched
    pub const UNRECOGNIZED: ParseError = ParseError {
        reason: "unrecognized format",
    };

    /// The hostname cannot name a per-host directory
    pub const UNROUTABLE_HOSTNAME: ParseError = ParseError {
        reason: "unroutable hostname",
    };
}

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The UDP endpoint could not be bound
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        /// Requested address
        addr: String,
        /// Underlying cause
        #[source]
        source: io::Error,
    },

    /// The bound socket has no usable local address
    #[error("failed to query local address: {0}")]
    LocalAddr(#[source] io::Error),

    /// The dispatcher side of the queue is gone
    #[error("message queue closed")]
    QueueClosed,
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
