//! Where the digits shown on each scan come from.

use core::cell::Cell;
use core::fmt;

use embedded_hal::delay::DelayNs;
use log::error;
use num_traits::ToPrimitive;

use crate::rtc::{read_time, RetryPolicy, TimeReadFault, TimeSource};

/// Supplies the digit for each position. The multiplexer asks again at the
/// start of every slot, so a source may change its digits at any time; a
/// change that lands mid-cycle shows up as one torn frame.
pub trait FrameSource<const N: usize> {
    fn digit(&mut self, position: usize) -> u8;

    /// Called after each full pass over all positions.
    fn cycle_complete(&mut self) -> Result<(), FrameFault> {
        Ok(())
    }
}

impl<const N: usize> FrameSource<N> for [u8; N] {
    fn digit(&mut self, position: usize) -> u8 {
        self[position]
    }
}

impl<const N: usize> FrameSource<N> for &Cell<[u8; N]> {
    fn digit(&mut self, position: usize) -> u8 {
        self.get()[position]
    }
}

/// The frame source could not produce digits any more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameFault;

impl fmt::Display for FrameFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("frame source failed")
    }
}

/// Decimal digits of `number`, most significant first, zero padded to `N`.
pub fn digits_of<T, const N: usize>(number: T) -> Result<[u8; N], NumberTooLarge>
where
    T: ToPrimitive,
{
    let mut num = number.to_u64().ok_or(NumberTooLarge)?;
    let mut digits = [0; N];
    for i in 0..N {
        digits[N - 1 - i] = (num % 10) as u8;
        num /= 10;
    }
    if num != 0 {
        return Err(NumberTooLarge);
    }
    Ok(digits)
}

/// Number is negative or has more than `N` decimal digits. Fractions are
/// truncated, not rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberTooLarge;

impl fmt::Display for NumberTooLarge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("number does not fit the display")
    }
}

/// Free-running counter, advancing by one every `cycles_per_step` refresh
/// cycles and wrapping back to zero after all nines.
#[derive(Clone, Debug)]
pub struct Counter<const N: usize> {
    value: u64,
    cycles_per_step: u32,
    cycles: u32,
    digits: [u8; N],
}

impl<const N: usize> Counter<N> {
    pub fn new(cycles_per_step: u32) -> Self {
        Self {
            value: 0,
            cycles_per_step: cycles_per_step.max(1),
            cycles: 0,
            digits: [0; N],
        }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn step(&mut self) {
        self.value += 1;
        self.digits = match digits_of(self.value) {
            Ok(digits) => digits,
            Err(NumberTooLarge) => {
                self.value = 0;
                [0; N]
            }
        };
    }
}

impl<const N: usize> FrameSource<N> for Counter<N> {
    fn digit(&mut self, position: usize) -> u8 {
        self.digits[position]
    }

    fn cycle_complete(&mut self) -> Result<(), FrameFault> {
        self.cycles += 1;
        if self.cycles >= self.cycles_per_step {
            self.cycles = 0;
            self.step();
        }
        Ok(())
    }
}

/// `HHMM` read from a real-time clock, refreshed every `cycles_per_read`
/// refresh cycles. An RTC read that exhausts its [`RetryPolicy`] fails the
/// scan; the fault is kept for [`last_fault`](Self::last_fault).
pub struct ClockFace<T: TimeSource, D> {
    source: T,
    delay: D,
    policy: RetryPolicy,
    cycles_per_read: u32,
    cycles: u32,
    digits: [u8; 4],
    fault: Option<TimeReadFault<T::Error>>,
}

impl<T, D> ClockFace<T, D>
where
    T: TimeSource,
    D: DelayNs,
{
    /// Reads the clock once so the first scan already shows the time.
    pub fn new(
        source: T,
        delay: D,
        policy: RetryPolicy,
        cycles_per_read: u32,
    ) -> Result<Self, TimeReadFault<T::Error>> {
        let mut face = Self {
            source,
            delay,
            policy,
            cycles_per_read: cycles_per_read.max(1),
            cycles: 0,
            digits: [0; 4],
            fault: None,
        };
        face.refresh()?;
        Ok(face)
    }

    pub fn refresh(&mut self) -> Result<(), TimeReadFault<T::Error>> {
        let time = read_time(&mut self.source, self.policy, &mut self.delay)?;
        self.digits = time.hhmm();
        Ok(())
    }

    pub fn last_fault(&self) -> Option<&TimeReadFault<T::Error>> {
        self.fault.as_ref()
    }

    pub fn release(self) -> (T, D) {
        (self.source, self.delay)
    }
}

impl<T, D> FrameSource<4> for ClockFace<T, D>
where
    T: TimeSource,
    D: DelayNs,
{
    fn digit(&mut self, position: usize) -> u8 {
        self.digits[position]
    }

    fn cycle_complete(&mut self) -> Result<(), FrameFault> {
        self.cycles += 1;
        if self.cycles < self.cycles_per_read {
            return Ok(());
        }
        self.cycles = 0;
        match self.refresh() {
            Ok(()) => Ok(()),
            Err(fault) => {
                error!("clock face lost its time source after {} attempts", fault.attempts);
                self.fault = Some(fault);
                Err(FrameFault)
            }
        }
    }
}
