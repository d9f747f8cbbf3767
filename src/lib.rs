#![no_std]

//! Driver for multiplexed seven-segment displays hanging off a chain of
//! 74HC595-style shift registers: one register for the segment lines, one for
//! the digit-select lines, both fed by three GPIOs (data, clock, latch).
//!
//! Only one digit is lit at a time. [`DigitMultiplexer::run`] cycles through
//! the positions fast enough that all of them appear lit together.
//!
//! ```no_run
//! # use embedded_hal::{delay::DelayNs, digital::OutputPin};
//! # fn demo<P: OutputPin, D: DelayNs>(data: P, clock: P, latch: P, mut delay: D)
//! #     -> Result<(), hc595_mux::Error<P::Error>> {
//! use core::sync::atomic::AtomicBool;
//! use hc595_mux::{DigitMultiplexer, NoClock, Polarity, Wiring, DEFAULT_REFRESH_HZ};
//!
//! let wiring = Wiring::<4>::one_hot()?;
//! let mut display = DigitMultiplexer::new(data, clock, latch, wiring, Polarity::CommonCathode)?;
//! let stop = AtomicBool::new(false);
//! display.run(&mut [1u8, 2, 3, 4], DEFAULT_REFRESH_HZ, &stop, &mut delay, &mut NoClock)?;
//! # Ok(())
//! # }
//! ```

mod bus;
mod clock;
mod constants;
pub mod frame;
mod multiplexer;
pub mod rtc;
mod segment;
mod stop;
mod wiring;

use core::fmt;

pub use bus::{BitSerializer, ShiftRegisterBus};
pub use clock::{is_flicker_free, slot_duration_us, Monotonic, NoClock};
pub use constants::*;
pub use frame::{digits_of, FrameFault, FrameSource, NumberTooLarge};
pub use multiplexer::{DigitMultiplexer, ScanState, ScanStats};
pub use segment::{encode, Digit, InvalidDigit, Polarity, SegmentPattern};
pub use stop::{CycleLimit, StopSignal};
pub use wiring::{ActiveLevel, ChainOrder, InvalidWiring, Wiring};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// A GPIO write failed. The latch may be left low; treat as fatal.
    Pin(E),
    InvalidDigit(u8),
    InvalidPosition(usize),
    InvalidWiring(InvalidWiring),
    InvalidRefreshRate,
    NumberTooLarge,
    FrameSource,
}

impl<E> From<InvalidDigit> for Error<E> {
    fn from(error: InvalidDigit) -> Self {
        Error::InvalidDigit(error.0)
    }
}

impl<E> From<InvalidWiring> for Error<E> {
    fn from(error: InvalidWiring) -> Self {
        Error::InvalidWiring(error)
    }
}

impl<E> From<NumberTooLarge> for Error<E> {
    fn from(_: NumberTooLarge) -> Self {
        Error::NumberTooLarge
    }
}

impl<E> From<FrameFault> for Error<E> {
    fn from(_: FrameFault) -> Self {
        Error::FrameSource
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin(e) => write!(f, "pin write failed: {e:?}"),
            Error::InvalidDigit(d) => fmt::Display::fmt(&InvalidDigit(*d), f),
            Error::InvalidPosition(p) => write!(f, "no digit at position {p}"),
            Error::InvalidWiring(w) => fmt::Display::fmt(w, f),
            Error::InvalidRefreshRate => f.write_str("refresh rate must be non-zero"),
            Error::NumberTooLarge => fmt::Display::fmt(&NumberTooLarge, f),
            Error::FrameSource => fmt::Display::fmt(&FrameFault, f),
        }
    }
}
