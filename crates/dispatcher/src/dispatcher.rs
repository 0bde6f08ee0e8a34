//! Dispatcher - single consumer draining the message queue into a sink

use std::sync::Arc;
use std::time::Instant;

use async_channel::Receiver;
use contracts::{DataSink, LogMessage, WriteFailurePolicy};
use observability::{RunningStats, StatsSummary};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace};

use crate::metrics::DispatchMetrics;

/// Outcome of a dispatcher run that ended because the queue closed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchSummary {
    /// Records persisted
    pub written: u64,
    /// Writes that failed and were skipped
    pub failed: u64,
    /// Time spent per write
    pub write_latency_ms: StatsSummary,
}

impl std::fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Records written: {}", self.written)?;
        writeln!(f, "Failed writes: {}", self.failed)?;
        write!(f, "Write latency (ms): {}", self.write_latency_ms)
    }
}

/// The dispatcher loop
///
/// Messages are handled one at a time in queue order, so records for the
/// same host land in the order they were received.
pub struct Dispatcher<S> {
    sink: S,
    input_rx: Receiver<LogMessage>,
    policy: WriteFailurePolicy,
    metrics: Arc<DispatchMetrics>,
}

impl<S: DataSink> Dispatcher<S> {
    /// Create a dispatcher
    pub fn new(sink: S, input_rx: Receiver<LogMessage>, policy: WriteFailurePolicy) -> Self {
        Self {
            sink,
            input_rx,
            policy,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the dispatcher main loop
    ///
    /// Returns when the input queue is closed and drained.
    ///
    /// # Errors
    /// The first write error under [`WriteFailurePolicy::Exit`]
    #[instrument(name = "dispatcher_run", skip(self), fields(sink = %self.sink.name(), policy = ?self.policy))]
    pub async fn run(mut self) -> Result<DispatchSummary, S::Error> {
        info!("Dispatcher started");

        let mut latency = RunningStats::default();
        let mut failed: u64 = 0;

        while let Ok(message) = self.input_rx.recv().await {
            self.metrics.set_queue_len(self.input_rx.len());

            let started = Instant::now();
            match self.sink.write(&message).await {
                Ok(path) => {
                    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                    latency.push(elapsed_ms);
                    self.metrics.inc_write_count();
                    observability::record_record_written(self.sink.name());
                    observability::record_write_latency_ms(elapsed_ms);
                    trace!(hostname = %message.hostname(), path = %path.display(), "record written");
                }
                Err(e) => {
                    failed += 1;
                    self.metrics.inc_failure_count();
                    observability::record_write_failure(self.sink.name());
                    error!(hostname = %message.hostname(), error = %e, "Write failed");

                    match self.policy {
                        WriteFailurePolicy::Exit => return Err(e),
                        WriteFailurePolicy::Continue => {
                            debug!(hostname = %message.hostname(), "message dropped, continuing");
                        }
                    }
                }
            }

            let written = self.metrics.write_count();
            if written > 0 && written.is_multiple_of(1000) {
                debug!(records = written, "Dispatcher progress");
            }
        }

        let summary = DispatchSummary {
            written: self.metrics.write_count(),
            failed,
            write_latency_ms: StatsSummary::from(&latency),
        };
        info!(
            written = summary.written,
            failed = summary.failed,
            "Dispatcher input closed, shutting down"
        );
        Ok(summary)
    }
}

impl<S: DataSink + 'static> Dispatcher<S> {
    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<Result<DispatchSummary, S::Error>> {
        tokio::spawn(self.run())
    }
}
