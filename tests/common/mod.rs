#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use hc595_mux::Monotonic;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Data,
    Clock,
    Latch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    DelayUs(u32),
}

/// Shared record of every pin write and delay, in call order.
#[derive(Clone, Default)]
pub struct Harness {
    events: Rc<RefCell<Vec<Event>>>,
    // pin writes left before every pin starts failing
    budget: Rc<Cell<Option<usize>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pins(&self) -> (MockPin, MockPin, MockPin) {
        (self.pin(Line::Data), self.pin(Line::Clock), self.pin(Line::Latch))
    }

    pub fn pin(&self, line: Line) -> MockPin {
        MockPin {
            line,
            harness: self.clone(),
        }
    }

    pub fn delay(&self) -> MockDelay {
        MockDelay {
            harness: self.clone(),
        }
    }

    pub fn fail_after(&self, writes: usize) {
        self.budget.set(Some(writes));
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn delays(&self) -> Vec<u32> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::DelayUs(us) => Some(*us),
                _ => None,
            })
            .collect()
    }

    pub fn latch_edges(&self) -> Vec<bool> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Set(Line::Latch, level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Rebuilds the byte groups the registers saw, one per latch-low/latch-high
    /// pair, by sampling the data line on every rising clock edge.
    pub fn transmissions(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        let mut data = false;
        let mut clock = false;
        let mut bits: Option<Vec<bool>> = None;
        for event in self.events.borrow().iter() {
            match *event {
                Event::Set(Line::Data, level) => data = level,
                Event::Set(Line::Clock, level) => {
                    if level && !clock {
                        if let Some(bits) = bits.as_mut() {
                            bits.push(data);
                        }
                    }
                    clock = level;
                }
                Event::Set(Line::Latch, false) => bits = Some(Vec::new()),
                Event::Set(Line::Latch, true) => {
                    if let Some(bits) = bits.take() {
                        out.push(pack(&bits));
                    }
                }
                Event::DelayUs(_) => {}
            }
        }
        out
    }

    fn record(&self, event: Event) -> Result<(), ErrorKind> {
        if let Event::Set(..) = event {
            match self.budget.get() {
                Some(0) => return Err(ErrorKind::Other),
                Some(n) => self.budget.set(Some(n - 1)),
                None => {}
            }
        }
        self.events.borrow_mut().push(event);
        Ok(())
    }
}

fn pack(bits: &[bool]) -> Vec<u8> {
    assert_eq!(bits.len() % 8, 0, "partial byte on the bus");
    bits.chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect()
}

pub struct MockPin {
    line: Line,
    harness: Harness,
}

impl ErrorType for MockPin {
    type Error = ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.harness.record(Event::Set(self.line, false))
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.harness.record(Event::Set(self.line, true))
    }
}

pub struct MockDelay {
    harness: Harness,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.harness.events.borrow_mut().push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_us(ms * 1_000);
    }
}

/// Advances by a fixed step every time it is read.
pub struct SteppingClock {
    pub now: u64,
    pub step: u64,
}

impl SteppingClock {
    pub fn new(step: u64) -> Self {
        Self { now: 0, step }
    }
}

impl Monotonic for SteppingClock {
    fn now_us(&mut self) -> u64 {
        let now = self.now;
        self.now += self.step;
        now
    }
}
