//! # Mock dummy structure for doc examples
//!
//! [ExampleSPIBus] emulates the register file and message RAM of the controller:
//! written bytes are stored and read back, mode requests are mirrored to the operation mode bits.
//! FIFOs report "not full"/"not empty" so that messages loaded into a TX FIFO can be read back
//! from a RX FIFO sharing the same user address.
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;
use core::convert::Infallible;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::clock::Error;
use embedded_time::duration::{Duration, Fraction};
use embedded_time::fixed_point::FixedPoint;
use embedded_time::timer::param::{Armed, OneShot};
use embedded_time::{Clock, Instant, Timer};

const MEMORY_SIZE: usize = 0x1000;

const FIFO_STATUS_BASE: usize = 0x054;

/// Operation mode byte of C1CON after reset (configuration mode)
const C1CON_MODE_RESET: u8 = 0b1001_0100;

#[derive(Debug)]
pub struct ExampleSPIBus {
    memory: Vec<u8>,
}

impl Default for ExampleSPIBus {
    fn default() -> Self {
        let mut memory = vec![0u8; MEMORY_SIZE];
        memory[0x002] = C1CON_MODE_RESET;

        for channel in 0..32 {
            // not full / not empty
            memory[FIFO_STATUS_BASE + 12 * channel] = 0x01;
        }

        Self { memory }
    }
}

impl Transfer<u8> for ExampleSPIBus {
    type Error = Infallible;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        if words.len() < 2 {
            return Ok(words);
        }

        let instruction = words[0] >> 4;
        let address = (((words[0] & 0x0F) as usize) << 8) | words[1] as usize;
        let end = (address + words.len() - 2).min(MEMORY_SIZE);
        let length = end - address;

        match instruction {
            // WRITE
            0b0010 => {
                self.memory[address..end].copy_from_slice(&words[2..2 + length]);

                // OPMOD is read-only and follows REQOP
                if address <= 0x003 && end > 0x002 {
                    self.memory[0x002] = (self.memory[0x002] & 0x1F) | ((self.memory[0x003] & 0x07) << 5);
                }
            }
            // READ
            0b0011 => words[2..2 + length].copy_from_slice(&self.memory[address..end]),
            _ => {}
        }

        Ok(words)
    }
}

#[derive(Default, Debug)]
pub struct ExampleCSPin {}

impl OutputPin for ExampleCSPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Clock advancing by 100 µs on every call
#[derive(Debug, PartialEq, Eq, Default)]
pub struct ExampleClock {
    pub now: Cell<u64>,
}

impl Clock for ExampleClock {
    type T = u64;
    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, Error> {
        let now = self.now.get();
        self.now.set(now + 100);

        Ok(Instant::new(now))
    }

    fn new_timer<Dur: Duration + FixedPoint>(&self, duration: Dur) -> Timer<OneShot, Armed, Self, Dur> {
        Timer::new(self, duration)
    }
}
