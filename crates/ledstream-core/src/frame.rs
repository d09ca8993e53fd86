use crate::record::ColorRecord;

const BLACK: ColorRecord = ColorRecord { r: 0, g: 0, b: 0 };

/// Fixed-size pixel buffer with a wrapping write cursor
///
/// The cursor persists for the lifetime of the frame, it is not tied to
/// connections.
pub struct PixelFrame<const N: usize> {
    pixels: [ColorRecord; N],
    cursor: usize,
}

impl<const N: usize> PixelFrame<N> {
    pub const fn new() -> Self {
        const { assert!(N > 0, "pixel frame must hold at least one pixel") };
        Self {
            pixels: [BLACK; N],
            cursor: 0,
        }
    }

    /// Write a record at the cursor and advance it
    ///
    /// Returns `true` when this write filled position `N - 1`, i.e. the cursor
    /// just wrapped back to zero and the frame is complete.
    pub fn write(&mut self, record: ColorRecord) -> bool {
        self.pixels[self.cursor] = record;
        self.cursor += 1;
        if self.cursor == N {
            self.cursor = 0;
            return true;
        }
        false
    }

    /// Next write position, always in `0..N`
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pixels(&self) -> &[ColorRecord; N] {
        &self.pixels
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl<const N: usize> Default for PixelFrame<N> {
    fn default() -> Self {
        Self::new()
    }
}
