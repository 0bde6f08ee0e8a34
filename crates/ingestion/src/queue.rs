//! Bounded receiver -> dispatcher queue
//!
//! A single FIFO channel with one consumer. When it is full the producer
//! either waits (`block`) or discards the incoming message (`drop_newest`).

use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender, TrySendError};
use contracts::{BackpressurePolicy, LogMessage, QueueConfig};
use tracing::{debug, trace};

use crate::error::{IngestionError, Result};
use crate::metrics::IngestionMetrics;

/// Consumer side of the queue
pub type MessageReceiver = Receiver<LogMessage>;

/// Result of a push
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The message is in the queue
    Queued,
    /// The queue was full and the message was discarded
    Dropped,
}

/// Producer side of the queue, applying the configured backpressure policy
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: Sender<LogMessage>,
    policy: BackpressurePolicy,
    metrics: Arc<IngestionMetrics>,
}

/// Create the queue described by `config`
pub fn message_queue(
    config: &QueueConfig,
    metrics: Arc<IngestionMetrics>,
) -> (MessageSender, MessageReceiver) {
    let (tx, rx) = bounded(config.capacity);
    let sender = MessageSender {
        tx,
        policy: config.policy,
        metrics,
    };
    (sender, rx)
}

impl MessageSender {
    /// Enqueue a message
    ///
    /// # Errors
    /// [`IngestionError::QueueClosed`] once the receiving side is gone
    pub async fn push(&self, message: LogMessage) -> Result<PushOutcome> {
        let outcome = match self.policy {
            BackpressurePolicy::Block => {
                self.tx
                    .send(message)
                    .await
                    .map_err(|_| IngestionError::QueueClosed)?;
                PushOutcome::Queued
            }
            BackpressurePolicy::DropNewest => match self.tx.try_send(message) {
                Ok(()) => PushOutcome::Queued,
                Err(TrySendError::Full(dropped)) => {
                    debug!(hostname = %dropped.hostname(), "queue full, message dropped");
                    PushOutcome::Dropped
                }
                Err(TrySendError::Closed(_)) => return Err(IngestionError::QueueClosed),
            },
        };

        match outcome {
            PushOutcome::Queued => self.metrics.record_queued(),
            PushOutcome::Dropped => self.metrics.record_dropped(),
        }
        self.metrics.update_queue_len(self.tx.len());
        trace!(outcome = ?outcome, "message pushed");
        Ok(outcome)
    }
}
