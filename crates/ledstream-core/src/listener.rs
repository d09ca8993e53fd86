//! Connection listener - ingest side of the pipeline
//!
//! Serves exactly one connection at a time:
//!
//! ```text
//! Idle -> Bound -> Listening -> Streaming -> Listening -> ...
//!                      |
//!                      +-> Failed (accept error, permanent)
//! ```
//!
//! Every connection gets a fresh [`ByteFramer`], so trailing bytes of one
//! connection never leak into the next. Connection attempts made while
//! streaming are not queued.

use core::convert::Infallible;
use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::with_timeout;
use embedded_io_async::Read;
use log::{error, info, warn};

use crate::channel::RecordProducer;
use crate::config::{KeepaliveConfig, ListenerConfig};
use crate::error::ListenerFault;
use crate::framer::{ByteFramer, SessionEnd};
use crate::stats::PipelineStats;

/// One accepted stream connection
#[allow(async_fn_in_trait)]
pub trait Connection: Read {
    /// Apply TCP keepalive to the accepted socket
    fn configure_keepalive(&mut self, keepalive: &KeepaliveConfig);

    /// Shut the connection down once framing is over
    async fn close(self);
}

/// Transport seam producing connections for the listener
#[allow(async_fn_in_trait)]
pub trait ConnectionAcceptor {
    type Error: fmt::Debug;
    type Connection<'a>: Connection
    where
        Self: 'a;

    /// Reserve the listening port, with address reuse
    fn bind(&mut self, port: u16) -> Result<(), Self::Error>;

    /// Wait for the next peer
    async fn accept(&mut self) -> Result<Self::Connection<'_>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ListenerState {
    Idle,
    Bound,
    Listening,
    Streaming,
    /// Terminal, no further connections are served
    Failed,
}

impl ListenerState {
    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            1 => ListenerState::Bound,
            2 => ListenerState::Listening,
            3 => ListenerState::Streaming,
            4 => ListenerState::Failed,
            _ => ListenerState::Idle,
        }
    }
}

pub struct ConnectionListener<'a, A: ConnectionAcceptor> {
    acceptor: A,
    config: ListenerConfig,
    state: ListenerState,
    /// Scratch buffer for socket reads
    buffer: &'a mut [u8],
    stats: Option<&'a PipelineStats>,
}

impl<'a, A: ConnectionAcceptor> ConnectionListener<'a, A> {
    pub fn new(acceptor: A, config: ListenerConfig, buffer: &'a mut [u8]) -> Self {
        Self {
            acceptor,
            config,
            state: ListenerState::Idle,
            buffer,
            stats: None,
        }
    }

    /// Attach shared counters
    #[must_use]
    pub fn with_stats(mut self, stats: &'a PipelineStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    pub fn acceptor(&self) -> &A {
        &self.acceptor
    }

    /// Serve connections one after another until a fatal fault
    ///
    /// Connection endings (peer close, read error) are logged and the listener
    /// goes back to waiting. A bind or accept failure stops it for good.
    pub async fn serve<M: RawMutex, const C: usize>(
        &mut self,
        producer: &RecordProducer<'_, M, C>,
    ) -> Result<Infallible, ListenerFault<A::Error>> {
        let port = self.config.port;
        if let Err(e) = self.acceptor.bind(port) {
            error!("listener: unable to bind port {}: {:?}", port, e);
            enter(&mut self.state, self.stats, ListenerState::Failed);
            return Err(ListenerFault::Bind(e));
        }
        enter(&mut self.state, self.stats, ListenerState::Bound);
        info!("listener: bound, port {}", port);

        loop {
            enter(&mut self.state, self.stats, ListenerState::Listening);
            info!("listener: waiting for connection");

            let mut connection = match self.acceptor.accept().await {
                Ok(connection) => connection,
                Err(e) => {
                    error!("listener: unable to accept connection: {:?}", e);
                    enter(&mut self.state, self.stats, ListenerState::Failed);
                    return Err(ListenerFault::Accept(e));
                }
            };
            enter(&mut self.state, self.stats, ListenerState::Streaming);
            connection.configure_keepalive(&self.config.keepalive);
            if let Some(stats) = self.stats {
                stats.record_connection();
            }

            let mut framer = ByteFramer::new();
            let report = framer.stream(&mut connection, producer, self.buffer).await;
            match report.end {
                SessionEnd::PeerClosed => info!("listener: connection closed"),
                SessionEnd::ReadFailed(ref e) => warn!("listener: receive failed: {:?}", e),
            }
            info!(
                "listener: {} bytes, {} records, {} trailing bytes dropped",
                report.bytes, report.records, report.discarded
            );
            if let Some(stats) = self.stats {
                stats.add_discarded(report.discarded);
            }

            if with_timeout(self.config.close_timeout, connection.close())
                .await
                .is_err()
            {
                warn!("listener: close timed out, dropping connection");
            }
        }
    }
}

fn enter(state: &mut ListenerState, stats: Option<&PipelineStats>, next: ListenerState) {
    *state = next;
    if let Some(stats) = stats {
        stats.set_listener_state(next);
    }
}
