use log::info;

use ledstream_core::PixelSink;

use crate::config;
use crate::infrastructure::tasks::{PIPELINE_STATS, RECORD_QUEUE};
use crate::infrastructure::types::LightDriver;

/// Task draining the record queue into the strip
///
/// A failed flush leaves the strip in an unknown state, so it panics and
/// lets the backtrace handler reset the chip.
#[embassy_executor::task]
pub(crate) async fn render_task(driver: LightDriver) {
    let consumer = RECORD_QUEUE.consumer();
    let mut sink: PixelSink<'static, LightDriver, { config::LED_COUNT }> =
        PixelSink::new(driver, config::SINK).with_stats(&PIPELINE_STATS);

    info!("render: driving {} pixels", config::LED_COUNT);
    let Err(fault) = sink.run(&consumer).await;
    panic!("render: {}", fault);
}
