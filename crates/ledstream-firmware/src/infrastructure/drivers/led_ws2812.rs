use static_cell::make_static;

use esp_hal::xtensa_lx::interrupt;
use esp_hal::{gpio::interconnect::PeripheralOutput, peripherals::RMT, rmt::Rmt, time::Rate};
use esp_hal_smartled::{SmartLedsAdapter, buffer_size, smart_led_buffer};
use smart_leds::SmartLedsWrite;

use ledstream_core::{ColorRecord, LedDriver};

use crate::config;

type Adapter = SmartLedsAdapter<'static, { buffer_size(config::LED_COUNT) }>;

/// WS2812 strip driven by the RMT peripheral
///
/// The RMT channel generates the bit timing, a full frame is pushed with
/// interrupts masked so radio activity cannot stretch a pulse.
pub(crate) struct EspLedDriver {
    adapter: Adapter,
}

impl EspLedDriver {
    /// Create the driver on the first RMT channel
    ///
    /// # Arguments
    /// * `rmt` - RMT peripheral
    /// * `pin` - GPIO pin connected to the strip data line
    pub(crate) fn new<O>(rmt: RMT<'static>, pin: O) -> Self
    where
        O: PeripheralOutput<'static>,
    {
        let rmt = Rmt::new(rmt, Rate::from_mhz(80)).expect("RMT initialization failed");

        // Pulse buffer for one full frame, lives for the whole program
        let rmt_buffer = make_static!(smart_led_buffer!(config::LED_COUNT));
        let adapter = SmartLedsAdapter::new(rmt.channel0, pin, rmt_buffer);

        Self { adapter }
    }
}

impl LedDriver<{ config::LED_COUNT }> for EspLedDriver {
    type Error = <Adapter as SmartLedsWrite>::Error;

    fn write(&mut self, colors: &[ColorRecord; config::LED_COUNT]) -> Result<(), Self::Error> {
        interrupt::free(|| self.adapter.write(colors.iter().copied()))
    }
}
