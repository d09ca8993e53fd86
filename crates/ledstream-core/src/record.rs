use smart_leds::RGB8;

/// One pixel color as received from the wire, in `(r, g, b)` order
pub type ColorRecord = RGB8;

/// Number of bytes forming one [`ColorRecord`] on the wire
pub const RECORD_SIZE: usize = 3;

/// Build a record from a complete wire group
pub const fn record_from_bytes(bytes: [u8; RECORD_SIZE]) -> ColorRecord {
    RGB8 {
        r: bytes[0],
        g: bytes[1],
        b: bytes[2],
    }
}
