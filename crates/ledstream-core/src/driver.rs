//! LED Driver abstraction layer
//!
//! Provides a trait-based abstraction for LED strip drivers,
//! allowing the render loop to be hardware-agnostic.

use core::fmt;

use crate::record::ColorRecord;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// A write is synchronous: it returns once the whole frame is on the strip.
pub trait LedDriver<const N: usize> {
    /// Hardware failure reported by the output transport
    type Error: fmt::Debug;

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[ColorRecord; N]) -> Result<(), Self::Error>;
}
