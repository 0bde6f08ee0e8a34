//! Collector metrics
//!
//! Thin wrappers over the `metrics` facade so every crate uses the same
//! names. Without an installed recorder these calls are no-ops.

use metrics::{counter, gauge, histogram};

/// Record a datagram read from the socket
pub fn record_datagram_received(bytes: usize) {
    counter!("syslog_collector_datagrams_received_total").increment(1);
    counter!("syslog_collector_bytes_received_total").increment(bytes as u64);
}

/// Record a datagram that could not be decoded
pub fn record_parse_failure(reason: &'static str) {
    counter!("syslog_collector_parse_failures_total", "reason" => reason).increment(1);
}

/// Record a message accepted by the queue
pub fn record_message_queued() {
    counter!("syslog_collector_messages_queued_total").increment(1);
}

/// Record a message discarded because the queue was full
pub fn record_message_dropped() {
    counter!("syslog_collector_messages_dropped_total").increment(1);
}

/// Record current queue depth
pub fn record_queue_depth(depth: usize) {
    gauge!("syslog_collector_queue_depth").set(depth as f64);
}

/// Record a persisted record
pub fn record_record_written(sink_name: &str) {
    counter!(
        "syslog_collector_records_written_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// Record a failed write
pub fn record_write_failure(sink_name: &str) {
    counter!(
        "syslog_collector_write_failures_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);
}

/// Record time spent persisting one record
pub fn record_write_latency_ms(latency_ms: f64) {
    histogram!("syslog_collector_write_latency_ms").record(latency_ms);
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
