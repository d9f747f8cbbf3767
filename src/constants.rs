pub const MAX_DIGITS: usize = 8; // one select byte
pub const MIN_AGGREGATE_REFRESH_HZ: u32 = 60; // slot updates per second across all digits
pub const DEFAULT_REFRESH_HZ: u32 = 100; // full scan cycles per second
pub const MAX_BACKOFF_MS: u32 = 1_000;

// common-cathode, bit set = segment lit
pub const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

pub mod segments {
    pub const A: u8 = 0x01; // bit 0: top
    pub const B: u8 = 0x02; // bit 1: top right
    pub const C: u8 = 0x04; // bit 2: bottom right
    pub const D: u8 = 0x08; // bit 3: bottom
    pub const E: u8 = 0x10; // bit 4: bottom left
    pub const F: u8 = 0x20; // bit 5: top left
    pub const G: u8 = 0x40; // bit 6: middle
    pub const DP: u8 = 0x80; // bit 7: decimal point
}
