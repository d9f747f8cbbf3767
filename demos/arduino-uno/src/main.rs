#![no_std]
#![no_main]

use arduino_hal::prelude::*;
use core::sync::atomic::AtomicBool;
use hc595_mux::frame::Counter;
use hc595_mux::{DigitMultiplexer, NoClock, Polarity, Wiring};
use panic_halt as _;

const NUM_DIGITS: usize = 4;
const REFRESH_HZ: u32 = 120;
const CYCLES_PER_COUNT: u32 = REFRESH_HZ / 10;

static STOP: AtomicBool = AtomicBool::new(false);

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, 57600);
    let mut delay = arduino_hal::Delay::new();

    // DS, SH_CP, ST_CP of the first 74HC595
    let data = pins.d2.into_output();
    let clock = pins.d3.into_output();
    let latch = pins.d4.into_output();

    let wiring: Wiring<NUM_DIGITS> = Wiring::one_hot().unwrap();
    let mut display =
        DigitMultiplexer::new(data, clock, latch, wiring, Polarity::CommonCathode).unwrap();

    ufmt::uwriteln!(&mut serial, "Counting up...").unwrap_infallible();
    let mut counter = Counter::<NUM_DIGITS>::new(CYCLES_PER_COUNT);
    if display
        .run(&mut counter, REFRESH_HZ, &STOP, &mut delay, &mut NoClock)
        .is_err()
    {
        ufmt::uwriteln!(&mut serial, "Scan aborted").unwrap_infallible();
    }
    display.blank().unwrap();

    loop {
        arduino_hal::delay_ms(1000);
    }
}
