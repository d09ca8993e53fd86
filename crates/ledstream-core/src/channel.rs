//! Bounded record channel
//!
//! The only synchronization point between the ingest and render workers.
//! Enqueueing waits for free capacity instead of dropping, which is what
//! propagates a slow renderer back to the network peer.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{Duration, with_timeout};

use crate::record::ColorRecord;

/// Fixed-capacity FIFO of color records
pub struct RecordChannel<M: RawMutex, const C: usize> {
    inner: Channel<M, ColorRecord, C>,
}

impl<M: RawMutex, const C: usize> RecordChannel<M, C> {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Handle for the ingest side
    pub fn producer(&self) -> RecordProducer<'_, M, C> {
        RecordProducer {
            sender: self.inner.sender(),
        }
    }

    /// Handle for the render side
    pub fn consumer(&self) -> RecordConsumer<'_, M, C> {
        RecordConsumer {
            receiver: self.inner.receiver(),
        }
    }

    /// Records currently queued
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        C
    }
}

impl<M: RawMutex, const C: usize> Default for RecordChannel<M, C> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RecordProducer<'a, M: RawMutex, const C: usize> {
    sender: Sender<'a, M, ColorRecord, C>,
}

impl<M: RawMutex, const C: usize> RecordProducer<'_, M, C> {
    /// Append a record, waiting as long as the channel is full
    pub async fn enqueue(&self, record: ColorRecord) {
        self.sender.send(record).await;
    }
}

pub struct RecordConsumer<'a, M: RawMutex, const C: usize> {
    receiver: Receiver<'a, M, ColorRecord, C>,
}

impl<M: RawMutex, const C: usize> RecordConsumer<'_, M, C> {
    /// Take the oldest record, or `None` if nothing arrives within `timeout`
    pub async fn dequeue_with_timeout(&self, timeout: Duration) -> Option<ColorRecord> {
        with_timeout(timeout, self.receiver.receive()).await.ok()
    }
}
