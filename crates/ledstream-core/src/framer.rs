//! Byte framer
//!
//! Turns the raw byte stream of one connection into color records. Up to two
//! bytes of an incomplete record are carried between reads; whatever is still
//! pending when the connection ends is dropped, so a record is only emitted
//! when all of its bytes arrived on the same connection.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io_async::Read;

use crate::channel::RecordProducer;
use crate::record::{ColorRecord, RECORD_SIZE, record_from_bytes};

/// Why a connection stopped producing bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd<E> {
    /// The peer closed its side (zero-length read)
    PeerClosed,
    /// The transport reported a read error
    ReadFailed(E),
}

/// Outcome of streaming one connection through the framer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport<E> {
    pub end: SessionEnd<E>,
    /// Bytes read from the connection
    pub bytes: u64,
    /// Records handed to the channel
    pub records: u64,
    /// Trailing bytes dropped at the end of the connection
    pub discarded: usize,
}

impl<E> SessionReport<E> {
    fn opened() -> Self {
        Self {
            end: SessionEnd::PeerClosed,
            bytes: 0,
            records: 0,
            discarded: 0,
        }
    }

    /// Account one read, saturating: a connection may stream forever
    fn count_read(&mut self, bytes: usize, records: usize) {
        self.bytes = self
            .bytes
            .saturating_add(u64::try_from(bytes).unwrap_or(u64::MAX));
        self.records = self
            .records
            .saturating_add(u64::try_from(records).unwrap_or(u64::MAX));
    }
}

#[derive(Debug, Default)]
pub struct ByteFramer {
    group: [u8; RECORD_SIZE],
    filled: usize,
}

impl ByteFramer {
    pub const fn new() -> Self {
        Self {
            group: [0; RECORD_SIZE],
            filled: 0,
        }
    }

    /// Append one byte, returning a record once three bytes are grouped
    pub fn push(&mut self, byte: u8) -> Option<ColorRecord> {
        self.group[self.filled] = byte;
        self.filled += 1;
        if self.filled < RECORD_SIZE {
            return None;
        }
        self.filled = 0;
        Some(record_from_bytes(self.group))
    }

    /// Bytes of the record currently being assembled
    pub fn pending(&self) -> &[u8] {
        &self.group[..self.filled]
    }

    /// Drop the incomplete record, returning how many bytes were lost
    pub fn discard(&mut self) -> usize {
        core::mem::take(&mut self.filled)
    }

    /// Frame a chunk and enqueue every completed record
    ///
    /// Waits on the channel whenever it is full, records are never dropped.
    /// Returns the number of records enqueued.
    pub async fn feed<M: RawMutex, const C: usize>(
        &mut self,
        chunk: &[u8],
        producer: &RecordProducer<'_, M, C>,
    ) -> usize {
        let mut emitted = 0;
        for &byte in chunk {
            if let Some(record) = self.push(byte) {
                producer.enqueue(record).await;
                emitted += 1;
            }
        }
        emitted
    }

    /// Frame a whole connection until the peer closes it or a read fails
    ///
    /// Both endings are normal connection termination and are reported, not
    /// raised. Pending bytes are discarded before returning.
    pub async fn stream<R: Read, M: RawMutex, const C: usize>(
        &mut self,
        connection: &mut R,
        producer: &RecordProducer<'_, M, C>,
        buffer: &mut [u8],
    ) -> SessionReport<R::Error> {
        debug_assert!(!buffer.is_empty(), "read buffer must not be empty");

        let mut report = SessionReport::opened();
        report.end = loop {
            match connection.read(buffer).await {
                Ok(0) => break SessionEnd::PeerClosed,
                Ok(len) => {
                    let records = self.feed(&buffer[..len], producer).await;
                    report.count_read(len, records);
                }
                Err(e) => break SessionEnd::ReadFailed(e),
            }
        };
        report.discarded = self.discard();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Report = SessionReport<()>;

    #[test]
    fn counters_saturate_instead_of_overflowing() {
        let mut report = Report::opened();
        report.bytes = u64::MAX - 2;
        report.records = u64::MAX - 1;

        report.count_read(3000, 1000);

        assert_eq!(report.bytes, u64::MAX);
        assert_eq!(report.records, u64::MAX);
    }

    #[test]
    fn counters_grow_past_32_bits() {
        let mut report = Report::opened();
        report.bytes = u64::from(u32::MAX);
        report.records = u64::from(u32::MAX);

        report.count_read(3000, 1000);

        assert_eq!(report.bytes, u64::from(u32::MAX) + 3000);
        assert_eq!(report.records, u64::from(u32::MAX) + 1000);
    }
}
