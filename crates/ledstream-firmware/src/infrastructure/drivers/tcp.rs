//! embassy-net transport for the stream listener
//!
//! embassy-net has no standalone listening socket: a socket is put into the
//! listen state per connection and only one exists at a time, so attempts
//! made while a peer is streaming are refused by the stack.

use embassy_net::Stack;
use embassy_net::tcp::{AcceptError, Error as TcpError, TcpSocket};
use embassy_time::{Duration, with_timeout};
use embedded_io_async::{ErrorType, Read};
use log::{info, warn};

use ledstream_core::{Connection, ConnectionAcceptor, KeepaliveConfig};

// Shorter than the listener's close timeout so the abort path runs first
const CLOSE_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TcpListenError {
    InvalidPort,
    NotBound,
    Accept(AcceptError),
}

pub(crate) struct TcpAcceptor<'s> {
    stack: Stack<'s>,
    port: Option<u16>,
    rx_buffer: &'s mut [u8],
    tx_buffer: &'s mut [u8],
}

impl<'s> TcpAcceptor<'s> {
    pub(crate) fn new(stack: Stack<'s>, rx_buffer: &'s mut [u8], tx_buffer: &'s mut [u8]) -> Self {
        Self {
            stack,
            port: None,
            rx_buffer,
            tx_buffer,
        }
    }
}

impl ConnectionAcceptor for TcpAcceptor<'_> {
    type Error = TcpListenError;
    type Connection<'a>
        = TcpConnection<'a>
    where
        Self: 'a;

    fn bind(&mut self, port: u16) -> Result<(), Self::Error> {
        if port == 0 {
            return Err(TcpListenError::InvalidPort);
        }
        self.port = Some(port);
        Ok(())
    }

    async fn accept(&mut self) -> Result<Self::Connection<'_>, Self::Error> {
        let port = self.port.ok_or(TcpListenError::NotBound)?;

        let mut socket = TcpSocket::new(self.stack, &mut *self.rx_buffer, &mut *self.tx_buffer);
        loop {
            match socket.accept(port).await {
                Ok(()) => {
                    if let Some(peer) = socket.remote_endpoint() {
                        info!("tcp: accepted connection from {}", peer);
                    }
                    return Ok(TcpConnection { socket });
                }
                // Peer gave up during the handshake, the port is still usable
                Err(AcceptError::ConnectionReset) => {
                    warn!("tcp: connection reset before it was established");
                    socket.abort();
                }
                Err(e) => return Err(TcpListenError::Accept(e)),
            }
        }
    }
}

pub(crate) struct TcpConnection<'a> {
    socket: TcpSocket<'a>,
}

impl ErrorType for TcpConnection<'_> {
    type Error = TcpError;
}

impl Read for TcpConnection<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.socket.read(buf).await
    }
}

impl Connection for TcpConnection<'_> {
    fn configure_keepalive(&mut self, keepalive: &KeepaliveConfig) {
        self.socket.set_keep_alive(Some(keepalive.idle));
        // smoltcp has no probe count, drop the peer once every probe went unanswered
        self.socket.set_timeout(Some(keepalive.give_up_after()));
    }

    async fn close(mut self) {
        self.socket.close();
        match with_timeout(CLOSE_GRACE, self.socket.flush()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("tcp: error while closing connection: {:?}", e),
            // FIN never acknowledged, reset instead of lingering in LAST-ACK
            Err(_) => {
                warn!("tcp: peer did not acknowledge close, aborting");
                self.socket.abort();
            }
        }
    }
}
