//! Pixel frame sink - render side of the pipeline
//!
//! The sink owns the pixel frame and the LED driver. It:
//! - Polls the record channel with a short timeout (an empty poll is a no-op)
//! - Writes every record at the frame cursor
//! - Flushes the whole frame synchronously the moment the cursor wraps
//!
//! There is no partial-frame flush: records that do not complete a frame stay
//! invisible until later records, from any connection, complete it.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Duration;
use log::{debug, error};

use crate::channel::RecordConsumer;
use crate::config::SinkConfig;
use crate::driver::LedDriver;
use crate::error::HardwareFault;
use crate::frame::PixelFrame;
use crate::record::ColorRecord;
use crate::stats::PipelineStats;

pub struct PixelSink<'a, D: LedDriver<N>, const N: usize> {
    /// Hardware driver for LED output
    driver: D,
    frame: PixelFrame<N>,
    poll_timeout: Duration,
    /// Frames flushed so far
    flushed: u32,
    /// Optional shared counters for external observation
    stats: Option<&'a PipelineStats>,
}

impl<'a, D: LedDriver<N>, const N: usize> PixelSink<'a, D, N> {
    pub fn new(driver: D, config: SinkConfig) -> Self {
        Self {
            driver,
            frame: PixelFrame::new(),
            poll_timeout: config.poll_timeout,
            flushed: 0,
            stats: None,
        }
    }

    /// Attach shared counters
    #[must_use]
    pub fn with_stats(mut self, stats: &'a PipelineStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn frame(&self) -> &PixelFrame<N> {
        &self.frame
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Frames flushed by this sink
    pub fn flushed(&self) -> u32 {
        self.flushed
    }

    /// Write one record, flushing if it completes the frame
    ///
    /// Returns whether a flush happened.
    pub fn consume(&mut self, record: ColorRecord) -> Result<bool, HardwareFault<D::Error>> {
        if let Some(stats) = self.stats {
            stats.record_delivered();
        }
        if !self.frame.write(record) {
            return Ok(false);
        }

        let index = self.flushed;
        self.driver
            .write(self.frame.pixels())
            .map_err(|error| HardwareFault {
                frame: index,
                error,
            })?;
        self.flushed = self.flushed.wrapping_add(1);
        if let Some(stats) = self.stats {
            stats.record_flush();
        }
        debug!("sink: frame {} flushed", index);
        Ok(true)
    }

    /// Run the render loop until the driver fails
    ///
    /// A driver failure is unrecoverable, the caller is expected to stop the
    /// process with it.
    pub async fn run<M: RawMutex, const C: usize>(
        &mut self,
        consumer: &RecordConsumer<'_, M, C>,
    ) -> Result<Infallible, HardwareFault<D::Error>> {
        loop {
            let Some(record) = consumer.dequeue_with_timeout(self.poll_timeout).await else {
                continue;
            };
            if let Err(fault) = self.consume(record) {
                error!("sink: {}", fault);
                return Err(fault);
            }
        }
    }
}
