use crate::constants::MIN_AGGREGATE_REFRESH_HZ;

/// Microsecond timestamps from a free-running monotonic timer.
pub trait Monotonic {
    fn now_us(&mut self) -> u64;
}

/// Clock that never advances: every slot sleeps its full duration.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClock;

impl Monotonic for NoClock {
    fn now_us(&mut self) -> u64 {
        0
    }
}

/// `1 / (refresh_hz * digits)` in microseconds, or `None` for a zero rate.
pub fn slot_duration_us(refresh_hz: u32, digits: usize) -> Option<u32> {
    let slots_per_second = refresh_hz.checked_mul(digits as u32)?;
    if slots_per_second == 0 {
        return None;
    }
    Some(1_000_000 / slots_per_second)
}

/// Whether `refresh_hz` full cycles per second over `digits` positions stays
/// at or above the aggregate rate below which the scan visibly flickers.
pub fn is_flicker_free(refresh_hz: u32, digits: usize) -> bool {
    (refresh_hz as u64) * (digits as u64) >= MIN_AGGREGATE_REFRESH_HZ as u64
}

/// Time left in a slot of `slot_us` that began at `start_us`.
pub(crate) fn remaining_us(slot_us: u32, start_us: u64, now_us: u64) -> u32 {
    let elapsed = now_us.saturating_sub(start_us);
    (slot_us as u64).saturating_sub(elapsed) as u32
}
