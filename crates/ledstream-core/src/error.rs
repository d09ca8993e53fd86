//! Fatal pipeline faults
//!
//! Recoverable connection endings are not errors, see
//! [`SessionEnd`](crate::framer::SessionEnd).

use core::fmt;

/// Listener failure that ends the ingest worker for good
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerFault<E> {
    /// The listening socket could not be bound
    Bind(E),
    /// Waiting for a connection failed
    Accept(E),
}

impl<E: fmt::Debug> fmt::Display for ListenerFault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerFault::Bind(e) => write!(f, "unable to bind: {:?}", e),
            ListenerFault::Accept(e) => write!(f, "unable to accept connection: {:?}", e),
        }
    }
}

/// The LED driver failed to push a completed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareFault<E> {
    /// Zero-based index of the frame that failed
    pub frame: u32,
    pub error: E,
}

impl<E: fmt::Debug> fmt::Display for HardwareFault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flush of frame {} failed: {:?}", self.frame, self.error)
    }
}
