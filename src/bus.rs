use embedded_hal::digital::OutputPin;
use log::trace;

use crate::Error;

/// Clocks bytes onto the serial data line, MSB first. Never touches the latch.
pub struct BitSerializer<DATA, CLK> {
    data: DATA,
    clock: CLK,
}

impl<DATA, CLK, E> BitSerializer<DATA, CLK>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
{
    pub fn new(mut data: DATA, mut clock: CLK) -> Result<Self, Error<E>> {
        data.set_low().map_err(Error::Pin)?;
        clock.set_low().map_err(Error::Pin)?;
        Ok(Self { data, clock })
    }

    pub fn release(self) -> (DATA, CLK) {
        (self.data, self.clock)
    }

    pub fn shift_byte(&mut self, value: u8) -> Result<(), Error<E>> {
        for i in 0..8 {
            if (value >> (7 - i)) & 1 == 1 {
                self.data.set_high().map_err(Error::Pin)?;
            } else {
                self.data.set_low().map_err(Error::Pin)?;
            }
            // register samples on the rising edge
            self.clock.set_high().map_err(Error::Pin)?;
            self.clock.set_low().map_err(Error::Pin)?;
        }
        Ok(())
    }
}

/// A daisy chain of 74HC595-style registers sharing data, clock and latch.
///
/// The first byte handed to [`transmit`](Self::transmit) is pushed furthest
/// down the chain, so callers must order bytes from the far register back to
/// the one wired to the MCU. This is not checked.
pub struct ShiftRegisterBus<DATA, CLK, LATCH> {
    serializer: BitSerializer<DATA, CLK>,
    latch: LATCH,
}

impl<DATA, CLK, LATCH, E> ShiftRegisterBus<DATA, CLK, LATCH>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    pub fn new(data: DATA, clock: CLK, mut latch: LATCH) -> Result<Self, Error<E>> {
        let serializer = BitSerializer::new(data, clock)?;
        latch.set_high().map_err(Error::Pin)?;
        Ok(Self { serializer, latch })
    }

    pub fn release(self) -> (DATA, CLK, LATCH) {
        let (data, clock) = self.serializer.release();
        (data, clock, self.latch)
    }

    /// Shifts `bytes` in order and commits them to the parallel outputs in one
    /// latch pulse. On error the latch may be left low; treat it as a hardware
    /// fault.
    pub fn transmit(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        trace!("transmit {:02x?}", bytes);
        self.latch.set_low().map_err(Error::Pin)?;
        for &byte in bytes {
            self.serializer.shift_byte(byte)?;
        }
        self.latch.set_high().map_err(Error::Pin)?;
        Ok(())
    }
}
