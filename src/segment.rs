use core::fmt;

use crate::constants::{segments, DIGITS};

/// Display wiring polarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Segment pins sink current, a low bit lights the segment.
    CommonAnode,
    /// Segment pins source current, a high bit lights the segment.
    #[default]
    CommonCathode,
}

/// Raw byte shifted into the segment register. Bit 0 is segment A, bit 7 the
/// decimal point; whether a set bit means lit depends on the [`Polarity`] the
/// pattern was encoded for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentPattern(u8);

impl SegmentPattern {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Every segment dark for the given polarity.
    pub const fn blank(polarity: Polarity) -> Self {
        match polarity {
            Polarity::CommonCathode => Self(0x00),
            Polarity::CommonAnode => Self(0xFF),
        }
    }

    pub const fn with_decimal_point(self, polarity: Polarity) -> Self {
        match polarity {
            Polarity::CommonCathode => Self(self.0 | segments::DP),
            Polarity::CommonAnode => Self(self.0 & !segments::DP),
        }
    }
}

impl From<SegmentPattern> for u8 {
    fn from(pattern: SegmentPattern) -> u8 {
        pattern.0
    }
}

/// A decimal digit, always in `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const fn new(value: u8) -> Result<Self, InvalidDigit> {
        if value > 9 {
            return Err(InvalidDigit(value));
        }
        Ok(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn pattern(self, polarity: Polarity) -> SegmentPattern {
        let cathode = DIGITS[self.0 as usize];
        match polarity {
            Polarity::CommonCathode => SegmentPattern(cathode),
            // plain 8-bit complement, so the unused DP bit ends up high (off)
            Polarity::CommonAnode => SegmentPattern(!cathode),
        }
    }
}

impl TryFrom<u8> for Digit {
    type Error = InvalidDigit;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value)
    }
}

/// Segment pattern for `digit`, failing for anything outside `0..=9`.
pub fn encode(digit: u8, polarity: Polarity) -> Result<SegmentPattern, InvalidDigit> {
    Ok(Digit::new(digit)?.pattern(polarity))
}

/// A digit value outside `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidDigit(pub u8);

impl fmt::Display for InvalidDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digit {} is outside 0..=9", self.0)
    }
}
