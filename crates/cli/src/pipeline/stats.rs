//! Collector statistics.

use std::time::Duration;

/// Counters from a collector run
#[derive(Debug, Clone, Default)]
pub struct CollectorStats {
    /// Receive and queue counters
    pub ingestion: ingestion::MetricsSnapshot,

    /// Write counters
    pub dispatch: dispatcher::MetricsSnapshot,

    /// Time since the collector started
    pub duration: Duration,
}

impl CollectorStats {
    /// Messages persisted per second
    pub fn records_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.dispatch.write_count as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        let ingestion = &self.ingestion;
        let dispatch = &self.dispatch;

        println!("\n=== Collector Statistics ===\n");

        println!("Overview");
        println!("   Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   Records/s: {:.2}", self.records_per_sec());

        println!("\nIngestion");
        println!("   Datagrams received: {}", ingestion.datagrams_received);
        println!("   Bytes received: {}", ingestion.bytes_received);
        println!("   Parse errors: {}", ingestion.parse_errors);
        println!("   Messages queued: {}", ingestion.messages_queued);
        println!("   Messages dropped: {}", ingestion.messages_dropped);

        println!("\nDispatch");
        println!("   Records written: {}", dispatch.write_count);
        println!("   Failed writes: {}", dispatch.failure_count);
        println!("   Queue length: {}", dispatch.queue_len);

        println!();
    }
}
