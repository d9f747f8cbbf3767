use core::fmt;

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::constants::MAX_BACKOFF_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self {
            hour,
            minute,
            second,
        })
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// `[H, H, M, M]`
    pub const fn hhmm(&self) -> [u8; 4] {
        [
            self.hour / 10,
            self.hour % 10,
            self.minute / 10,
            self.minute % 10,
        ]
    }
}

/// A real-time clock chip read over some bus.
pub trait TimeSource {
    type Error;

    fn get_time(&mut self) -> Result<TimeOfDay, Self::Error>;
}

/// How often and how patiently to retry a failing RTC read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u8,
    /// Wait after the first failure; doubles on each further failure up to
    /// [`MAX_BACKOFF_MS`].
    pub backoff_ms: u32,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u8, backoff_ms: u32) -> Self {
        Self {
            max_attempts,
            backoff_ms,
        }
    }

    pub const fn once() -> Self {
        Self::new(1, 0)
    }

    fn backoff_after(&self, failures: u8) -> u32 {
        let shift = (failures.saturating_sub(1) as u32).min(16);
        self.backoff_ms
            .saturating_mul(1 << shift)
            .min(MAX_BACKOFF_MS)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

/// Reads `source`, retrying with backoff until `policy` is exhausted.
pub fn read_time<T, D>(
    source: &mut T,
    policy: RetryPolicy,
    delay: &mut D,
) -> Result<TimeOfDay, TimeReadFault<T::Error>>
where
    T: TimeSource,
    D: DelayNs,
{
    let mut attempts = 0u8;
    loop {
        attempts += 1;
        match source.get_time() {
            Ok(time) => return Ok(time),
            Err(last) if attempts >= policy.max_attempts => {
                warn!("rtc read failed, giving up after {} attempts", attempts);
                return Err(TimeReadFault { attempts, last });
            }
            Err(_) => {
                let backoff = policy.backoff_after(attempts);
                warn!("rtc read failed (attempt {}), retrying in {} ms", attempts, backoff);
                delay.delay_ms(backoff);
            }
        }
    }
}

/// The RTC kept failing for every attempt the policy allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeReadFault<E> {
    pub attempts: u8,
    pub last: E,
}

impl<E: fmt::Debug> fmt::Display for TimeReadFault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rtc read failed {} times, last error: {:?}",
            self.attempts, self.last
        )
    }
}
