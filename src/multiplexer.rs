use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, error, warn};

use crate::bus::ShiftRegisterBus;
use crate::clock::{is_flicker_free, remaining_us, slot_duration_us, Monotonic};
use crate::frame::FrameSource;
use crate::segment::{encode, Polarity, SegmentPattern};
use crate::stop::StopSignal;
use crate::wiring::Wiring;
use crate::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Stopped,
    Scanning,
}

/// What a finished [`DigitMultiplexer::run`] got through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Full passes over every position.
    pub cycles: u32,
    /// Digit slots transmitted, including those of an unfinished cycle.
    pub slots: u32,
}

/// Time-multiplexes `N` digits over one segment register and one select
/// register, lighting a single digit per slot.
pub struct DigitMultiplexer<DATA, CLK, LATCH, const N: usize> {
    bus: ShiftRegisterBus<DATA, CLK, LATCH>,
    wiring: Wiring<N>,
    polarity: Polarity,
    state: ScanState,
}

impl<DATA, CLK, LATCH, E, const N: usize> DigitMultiplexer<DATA, CLK, LATCH, N>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    pub fn new(
        data: DATA,
        clock: CLK,
        latch: LATCH,
        wiring: Wiring<N>,
        polarity: Polarity,
    ) -> Result<Self, Error<E>> {
        let bus = ShiftRegisterBus::new(data, clock, latch)?;
        Ok(Self::from_bus(bus, wiring, polarity))
    }

    pub fn from_bus(
        bus: ShiftRegisterBus<DATA, CLK, LATCH>,
        wiring: Wiring<N>,
        polarity: Polarity,
    ) -> Self {
        Self {
            bus,
            wiring,
            polarity,
            state: ScanState::Stopped,
        }
    }

    pub fn destroy(self) -> (DATA, CLK, LATCH) {
        self.bus.release()
    }

    pub fn release(self) -> ShiftRegisterBus<DATA, CLK, LATCH> {
        self.bus
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn wiring(&self) -> &Wiring<N> {
        &self.wiring
    }

    /// Shows `frame`'s digit for `position` and selects that position only.
    /// Returns as soon as the latch is raised, without waiting out the slot.
    pub fn scan_slot<F>(&mut self, position: usize, frame: &mut F) -> Result<(), Error<E>>
    where
        F: FrameSource<N>,
    {
        let select = self
            .wiring
            .activation_mask(position)
            .ok_or(Error::InvalidPosition(position))?;
        let pattern = encode(frame.digit(position), self.polarity)?;
        self.bus
            .transmit(&self.wiring.order_bytes(pattern.bits(), select))
    }

    /// Turns every segment off and deselects every digit.
    pub fn blank(&mut self) -> Result<(), Error<E>> {
        let bytes = self.wiring.order_bytes(
            SegmentPattern::blank(self.polarity).bits(),
            self.wiring.idle_mask(),
        );
        self.bus.transmit(&bytes)
    }

    /// Lights every segment of every digit at once, or blanks the display
    /// again when `on` is false.
    pub fn lamp_test(&mut self, on: bool) -> Result<(), Error<E>> {
        if !on {
            return self.blank();
        }
        let bytes = self.wiring.order_bytes(
            !SegmentPattern::blank(self.polarity).bits(),
            self.wiring.all_mask(),
        );
        self.bus.transmit(&bytes)
    }

    /// One pass over every position, each slot lasting `slot_us` (see
    /// [`slot_duration_us`](crate::slot_duration_us)). `stop` is polled before
    /// each slot. Returns the number of slots transmitted; a full pass also
    /// tells `frame` its cycle is complete.
    pub fn scan_cycle<F, S, D, M>(
        &mut self,
        frame: &mut F,
        slot_us: u32,
        stop: &S,
        delay: &mut D,
        clock: &mut M,
    ) -> Result<usize, Error<E>>
    where
        F: FrameSource<N>,
        S: StopSignal + ?Sized,
        D: DelayNs,
        M: Monotonic,
    {
        for position in 0..N {
            if stop.should_stop() {
                return Ok(position);
            }
            let start = clock.now_us();
            self.scan_slot(position, frame)?;
            delay.delay_us(remaining_us(slot_us, start, clock.now_us()));
        }
        frame.cycle_complete()?;
        Ok(N)
    }

    /// Scans `frame` at `refresh_hz` full cycles per second until `stop`
    /// fires.
    ///
    /// Each slot re-reads its digit from `frame`, transmits it, then sleeps
    /// the rest of `1 / (refresh_hz * N)` as measured by `clock`. `stop` is
    /// polled before every slot, so a stop request lets the slot in flight
    /// finish and its wait run out. Rates below `60 / N` flicker visibly but
    /// are accepted.
    ///
    /// The last digit stays selected after a stop; call [`blank`](Self::blank)
    /// to switch the display off. An invalid digit or a pin fault ends the
    /// scan with the error.
    pub fn run<F, S, D, M>(
        &mut self,
        frame: &mut F,
        refresh_hz: u32,
        stop: &S,
        delay: &mut D,
        clock: &mut M,
    ) -> Result<ScanStats, Error<E>>
    where
        F: FrameSource<N>,
        S: StopSignal + ?Sized,
        D: DelayNs,
        M: Monotonic,
    {
        let slot_us = slot_duration_us(refresh_hz, N).ok_or(Error::InvalidRefreshRate)?;
        if !is_flicker_free(refresh_hz, N) {
            warn!(
                "{} Hz over {} digits is below the flicker-free rate",
                refresh_hz, N
            );
        }

        debug!("scan started: {} digits, {} us slots", N, slot_us);
        self.state = ScanState::Scanning;
        let mut stats = ScanStats::default();
        let result = self.scan(frame, slot_us, stop, delay, clock, &mut stats);
        self.state = ScanState::Stopped;

        match result {
            Ok(()) => {
                debug!("scan stopped after {} cycles", stats.cycles);
                Ok(stats)
            }
            Err(e) => {
                error!("scan aborted after {} cycles", stats.cycles);
                Err(e)
            }
        }
    }

    fn scan<F, S, D, M>(
        &mut self,
        frame: &mut F,
        slot_us: u32,
        stop: &S,
        delay: &mut D,
        clock: &mut M,
        stats: &mut ScanStats,
    ) -> Result<(), Error<E>>
    where
        F: FrameSource<N>,
        S: StopSignal + ?Sized,
        D: DelayNs,
        M: Monotonic,
    {
        loop {
            let slots = self.scan_cycle(frame, slot_us, stop, delay, clock)?;
            stats.slots += slots as u32;
            if slots < N {
                return Ok(());
            }
            stats.cycles += 1;
        }
    }
}
