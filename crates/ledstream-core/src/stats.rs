//! Shared pipeline counters for external observation
//!
//! The workers update these counters as they go, anyone holding a shared
//! reference can read them without touching the pipeline itself.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::listener::ListenerState;

/// Monotonic pipeline counters
///
/// Uses atomics for lock-free access from any task.
#[derive(Debug)]
pub struct PipelineStats {
    connections: AtomicU32,
    records: AtomicU32,
    discarded_bytes: AtomicU32,
    flushes: AtomicU32,
    listener_state: AtomicU8,
}

impl PipelineStats {
    pub const fn new() -> Self {
        Self {
            connections: AtomicU32::new(0),
            records: AtomicU32::new(0),
            discarded_bytes: AtomicU32::new(0),
            flushes: AtomicU32::new(0),
            listener_state: AtomicU8::new(ListenerState::Idle as u8),
        }
    }

    // === Read methods ===

    /// Connections accepted since boot
    pub fn connections(&self) -> u32 {
        self.connections.load(Ordering::Relaxed)
    }

    /// Records delivered to the render side since boot
    pub fn records(&self) -> u32 {
        self.records.load(Ordering::Relaxed)
    }

    /// Trailing bytes dropped because their connection ended mid-record
    pub fn discarded_bytes(&self) -> u32 {
        self.discarded_bytes.load(Ordering::Relaxed)
    }

    /// Frames pushed to the strip since boot
    pub fn flushes(&self) -> u32 {
        self.flushes.load(Ordering::Relaxed)
    }

    /// Where the attached listener currently is in its lifecycle
    pub fn listener_state(&self) -> ListenerState {
        ListenerState::from_u8(self.listener_state.load(Ordering::Relaxed))
    }

    // === Write methods (for the workers) ===

    pub(crate) fn record_connection(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.records.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_discarded(&self, bytes: usize) {
        let bytes = u32::try_from(bytes).unwrap_or(u32::MAX);
        self.discarded_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn set_listener_state(&self, state: ListenerState) {
        self.listener_state.store(state as u8, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}
