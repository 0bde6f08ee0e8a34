//! Ingestion metrics
//!
//! In-process counters for snapshots and shutdown summaries, mirrored to the
//! global `metrics` recorder through `observability`.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Total datagrams read from the socket
    pub datagrams_received: AtomicU64,

    /// Total payload bytes read from the socket
    pub bytes_received: AtomicU64,

    /// Datagrams that matched no dialect
    pub parse_errors: AtomicU64,

    /// Messages handed to the dispatcher queue
    pub messages_queued: AtomicU64,

    /// Messages discarded because the queue was full
    pub messages_dropped: AtomicU64,

    /// Current queue length
    pub queue_len: AtomicUsize,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record datagram received
    pub fn record_received(&self, bytes: usize) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
        observability::record_datagram_received(bytes);
    }

    /// Record parse error
    pub fn record_parse_error(&self, reason: &'static str) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
        observability::record_parse_failure(reason);
    }

    /// Record message queued
    pub fn record_queued(&self) {
        self.messages_queued.fetch_add(1, Ordering::Relaxed);
        observability::record_message_queued();
    }

    /// Record message dropped
    pub fn record_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
        observability::record_message_dropped();
    }

    /// Update queue length
    pub fn update_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
        observability::record_queue_depth(len);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            messages_queued: self.messages_queued.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            queue_len: self.queue_len.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub datagrams_received: u64,
    pub bytes_received: u64,
    pub parse_errors: u64,
    pub messages_queued: u64,
    pub messages_dropped: u64,
    pub queue_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let metrics = IngestionMetrics::new();
        metrics.record_received(10);
        metrics.record_received(5);
        metrics.record_parse_error("unrecognized format");
        metrics.record_queued();
        metrics.record_dropped();
        metrics.update_queue_len(3);

        let snap = metrics.snapshot();
        assert_eq!(snap.datagrams_received, 2);
        assert_eq!(snap.bytes_received, 15);
        assert_eq!(snap.parse_errors, 1);
        assert_eq!(snap.messages_queued, 1);
        assert_eq!(snap.messages_dropped, 1);
        assert_eq!(snap.queue_len, 3);
    }
}
