//! UDP receiver
//!
//! One socket, one loop: read a datagram, decode it, tag it with the sender
//! address and push it onto the dispatcher queue. Undecodable datagrams are
//! logged and counted; they never stop the loop.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use contracts::{fields, ServerConfig};
use tokio::net::UdpSocket;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{IngestionError, Result};
use crate::metrics::IngestionMetrics;
use crate::parser;
use crate::queue::{MessageSender, PushOutcome};

/// Pause after a failed socket read
const RECV_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Syslog UDP receiver
pub struct UdpReceiver {
    socket: UdpSocket,
    local_addr: SocketAddr,
    max_datagram_size: usize,
    sender: MessageSender,
    metrics: Arc<IngestionMetrics>,
}

impl UdpReceiver {
    /// Bind the socket described by `config`
    ///
    /// # Errors
    /// [`IngestionError::Bind`] when the address is invalid or in use
    #[instrument(name = "receiver_bind", skip(config, sender, metrics), fields(addr = %config.bind_address()))]
    pub async fn bind(
        config: &ServerConfig,
        sender: MessageSender,
        metrics: Arc<IngestionMetrics>,
    ) -> Result<Self> {
        let addr = config.bind_address();
        let socket = UdpSocket::bind(&addr)
            .await
            .map_err(|source| IngestionError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = socket.local_addr().map_err(IngestionError::LocalAddr)?;

        info!(%local_addr, "listening for syslog datagrams");

        Ok(Self {
            socket,
            local_addr,
            max_datagram_size: config.max_datagram_size,
            sender,
            metrics,
        })
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Receive until the queue closes
    ///
    /// Socket read errors are logged and the loop continues after a short
    /// pause.
    ///
    /// # Errors
    /// [`IngestionError::QueueClosed`] once the dispatcher is gone
    #[instrument(name = "receiver_run", skip(self), fields(addr = %self.local_addr))]
    pub async fn run(self) -> Result<()> {
        let mut buf = vec![0u8; self.max_datagram_size];
        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    read_failed(&e).await;
                    continue;
                }
            };
            self.handle_datagram(&buf[..len], peer).await?;
        }
    }

    /// Decode one datagram and enqueue it
    async fn handle_datagram(&self, payload: &[u8], peer: SocketAddr) -> Result<()> {
        self.metrics.record_received(payload.len());
        trace!(%peer, bytes = payload.len(), "datagram received");

        let message = match parser::parse(payload) {
            Ok(message) => message.with_field(fields::CLIENT, peer.to_string()),
            Err(e) => {
                self.metrics.record_parse_error(e.reason);
                warn!(%peer, error = %e, "discarding datagram");
                return Ok(());
            }
        };

        let hostname = message.hostname().to_string();
        if self.sender.push(message).await? == PushOutcome::Queued {
            debug!(%peer, %hostname, "message queued");
        }
        Ok(())
    }
}

/// Log a failed read and pause so a persistent socket error cannot spin
async fn read_failed(error: &io::Error) {
    warn!(%error, "failed to read datagram");
    tokio::time::sleep(RECV_RETRY_DELAY).await;
}
