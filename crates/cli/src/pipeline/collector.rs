//! Collector orchestrator - wires the receiver, queue and dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use contracts::CollectorConfig;
use dispatcher::{DispatchError, DispatchMetrics, DispatchSummary, Dispatcher, HostFileSink};
use ingestion::{message_queue, IngestionMetrics, UdpReceiver};
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use super::CollectorStats;
use crate::error::{CliError, Result};

/// Collector built from a validated configuration
pub struct Collector {
    config: CollectorConfig,
}

impl Collector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    /// Bind the socket and spawn the receiver and dispatcher tasks
    ///
    /// Binding happens before anything is spawned, so an unusable address
    /// is reported here.
    #[instrument(name = "collector_start", skip(self), fields(port = self.config.server.port))]
    pub async fn start(self) -> Result<RunningCollector> {
        let config = self.config;
        let ingestion_metrics = Arc::new(IngestionMetrics::new());

        let (tx, rx) = message_queue(&config.queue, Arc::clone(&ingestion_metrics));
        let receiver =
            UdpReceiver::bind(&config.server, tx, Arc::clone(&ingestion_metrics)).await?;
        let local_addr = receiver.local_addr();

        let sink = HostFileSink::from_config(&config.log_folder, &config.output);
        let dispatcher = Dispatcher::new(sink, rx, config.output.on_write_error);
        let dispatch_metrics = dispatcher.metrics();

        let receiver_task = tokio::spawn(receiver.run());
        let dispatcher_task = dispatcher.spawn();

        info!(
            %local_addr,
            log_folder = %config.log_folder,
            queue_capacity = config.queue.capacity,
            queue_policy = ?config.queue.policy,
            record_format = ?config.output.record_format,
            on_write_error = ?config.output.on_write_error,
            "Collector started"
        );

        Ok(RunningCollector {
            local_addr,
            receiver_task,
            dispatcher_task,
            ingestion_metrics,
            dispatch_metrics,
            started: Instant::now(),
        })
    }
}

/// Handle to the running receiver and dispatcher tasks
pub struct RunningCollector {
    local_addr: SocketAddr,
    receiver_task: JoinHandle<ingestion::Result<()>>,
    dispatcher_task: JoinHandle<std::result::Result<DispatchSummary, DispatchError>>,
    ingestion_metrics: Arc<IngestionMetrics>,
    dispatch_metrics: Arc<DispatchMetrics>,
    started: Instant,
}

impl RunningCollector {
    /// Address the receiver is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for the first task to stop
    ///
    /// Both tasks run until the process is terminated, so any return is an
    /// error.
    pub async fn wait(&mut self) -> Result<()> {
        tokio::select! {
            joined = &mut self.receiver_task => match joined {
                Ok(Ok(())) => Err(CliError::TaskStopped { task: "receiver" }),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(CliError::task_aborted("receiver", e.to_string())),
            },
            joined = &mut self.dispatcher_task => match joined {
                Ok(Ok(summary)) => {
                    info!(written = summary.written, "Dispatcher finished");
                    Err(CliError::TaskStopped { task: "dispatcher" })
                }
                Ok(Err(e)) => Err(e.into()),
                Err(e) => Err(CliError::task_aborted("dispatcher", e.to_string())),
            },
        }
    }

    /// Current counters
    pub fn stats(&self) -> CollectorStats {
        CollectorStats {
            ingestion: self.ingestion_metrics.snapshot(),
            dispatch: self.dispatch_metrics.snapshot(),
            duration: self.started.elapsed(),
        }
    }

    /// Stop both tasks without draining the queue
    pub fn shutdown(self) -> CollectorStats {
        self.receiver_task.abort();
        self.dispatcher_task.abort();
        let stats = self.stats();
        info!(
            received = stats.ingestion.datagrams_received,
            written = stats.dispatch.write_count,
            "Collector stopped"
        );
        stats
    }
}
