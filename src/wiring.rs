//! How the digit-select lines hang off the shift-register chain.
//!
//! Every deployment wires the common pins of its digits to some outputs of the
//! select register, possibly through inverting transistors, and puts that
//! register either before or after the segment register in the chain. Rather
//! than derive select bytes arithmetically from the position, a [`Wiring`]
//! carries an explicit lookup table, one select bit per digit position.

use core::fmt;

use crate::constants::MAX_DIGITS;
use crate::segment::SegmentPattern;

/// Logic level that turns a digit on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveLevel {
    #[default]
    High,
    /// e.g. PNP high-side switches or a common-cathode digit sunk directly
    Low,
}

/// Which register sits at the far end of the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChainOrder {
    /// Segment byte is shifted first and ends up in the far register.
    #[default]
    SegmentsFirst,
    /// Select byte is shifted first and ends up in the far register.
    SelectFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wiring<const N: usize> {
    select: [u8; N],
    level: ActiveLevel,
    order: ChainOrder,
}

impl<const N: usize> Wiring<N> {
    /// `select[i]` is the select-register bit (written active-high) that
    /// enables digit `i`. Each entry must be a single bit and no two
    /// positions may share one.
    pub fn new(
        select: [u8; N],
        level: ActiveLevel,
        order: ChainOrder,
    ) -> Result<Self, InvalidWiring> {
        if N == 0 || N > MAX_DIGITS {
            return Err(InvalidWiring::DigitCount(N));
        }
        let mut seen = 0u8;
        for (position, &bit) in select.iter().enumerate() {
            if bit.count_ones() != 1 {
                return Err(InvalidWiring::NotOneHot(position));
            }
            if seen & bit != 0 {
                return Err(InvalidWiring::SharedLine(position));
            }
            seen |= bit;
        }
        Ok(Self {
            select,
            level,
            order,
        })
    }

    /// Position `i` on output `Qi`, active high, segment register furthest.
    pub fn one_hot() -> Result<Self, InvalidWiring> {
        Self::new(
            core::array::from_fn(|i| 1u8.wrapping_shl(i as u32)),
            ActiveLevel::High,
            ChainOrder::SegmentsFirst,
        )
    }

    /// Position `i` on output `Q(N-1-i)`, for boards that route the leftmost
    /// digit to the highest output.
    pub fn one_hot_reversed() -> Result<Self, InvalidWiring> {
        Self::new(
            core::array::from_fn(|i| 1u8.wrapping_shl((N - 1 - i) as u32)),
            ActiveLevel::High,
            ChainOrder::SegmentsFirst,
        )
    }

    pub fn with_level(mut self, level: ActiveLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_order(mut self, order: ChainOrder) -> Self {
        self.order = order;
        self
    }

    pub fn level(&self) -> ActiveLevel {
        self.level
    }

    pub fn order(&self) -> ChainOrder {
        self.order
    }

    /// Select byte with only `position` active, `None` past the last digit.
    pub fn activation_mask(&self, position: usize) -> Option<u8> {
        self.select.get(position).map(|&bit| self.apply_level(bit))
    }

    /// Select byte with every digit active at once.
    pub fn all_mask(&self) -> u8 {
        self.apply_level(self.select.iter().fold(0, |acc, &bit| acc | bit))
    }

    /// Select byte with every digit inactive.
    pub fn idle_mask(&self) -> u8 {
        self.apply_level(0)
    }

    /// The two bytes for one slot, in chain order.
    pub fn frame_bytes(&self, pattern: SegmentPattern, position: usize) -> Option<[u8; 2]> {
        let select = self.activation_mask(position)?;
        Some(self.order_bytes(pattern.bits(), select))
    }

    pub(crate) fn order_bytes(&self, segments: u8, select: u8) -> [u8; 2] {
        match self.order {
            ChainOrder::SegmentsFirst => [segments, select],
            ChainOrder::SelectFirst => [select, segments],
        }
    }

    fn apply_level(&self, active_high: u8) -> u8 {
        match self.level {
            ActiveLevel::High => active_high,
            ActiveLevel::Low => !active_high,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidWiring {
    /// Digit count outside `1..=8`.
    DigitCount(usize),
    /// Table entry for this position has zero or several bits set.
    NotOneHot(usize),
    /// This position reuses a select line already taken by an earlier one.
    SharedLine(usize),
}

impl fmt::Display for InvalidWiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidWiring::DigitCount(n) => write!(f, "{n} digits do not fit one select byte"),
            InvalidWiring::NotOneHot(p) => write!(f, "select entry {p} is not a single bit"),
            InvalidWiring::SharedLine(p) => write!(f, "select entry {p} reuses a select line"),
        }
    }
}
