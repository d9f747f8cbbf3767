use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation, polled once per digit slot.
pub trait StopSignal {
    fn should_stop(&self) -> bool;
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl StopSignal for Cell<bool> {
    fn should_stop(&self) -> bool {
        self.get()
    }
}

impl<T: StopSignal + ?Sized> StopSignal for &T {
    fn should_stop(&self) -> bool {
        (**self).should_stop()
    }
}

/// Requests a stop once a fixed number of slots has been polled.
#[derive(Debug)]
pub struct CycleLimit {
    remaining: Cell<u32>,
}

impl CycleLimit {
    pub const fn slots(slots: u32) -> Self {
        Self {
            remaining: Cell::new(slots),
        }
    }

    pub const fn cycles<const N: usize>(cycles: u32) -> Self {
        Self::slots(cycles.saturating_mul(N as u32))
    }
}

impl StopSignal for CycleLimit {
    fn should_stop(&self) -> bool {
        match self.remaining.get() {
            0 => true,
            n => {
                self.remaining.set(n - 1);
                false
            }
        }
    }
}
