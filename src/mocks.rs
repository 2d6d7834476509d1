use crate::can::Controller;
use crate::config::Silicon;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::RefCell;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::clock::Error;
use embedded_time::duration::Duration;
use embedded_time::fixed_point::FixedPoint;
use embedded_time::fraction::Fraction;
use embedded_time::timer::param::{Armed, OneShot};
use embedded_time::{Clock, Instant, Timer};
use mockall::{mock, Sequence};

#[derive(Debug, PartialEq, Eq)]
pub struct TestClock {
    pub next_instants: RefCell<Vec<u64>>,
}

impl TestClock {
    pub fn new(next_instants: Vec<u64>) -> Self {
        Self {
            next_instants: RefCell::new(next_instants),
        }
    }
}

impl Clock for TestClock {
    type T = u64;
    const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

    fn try_now(&self) -> Result<Instant<Self>, Error> {
        if self.next_instants.borrow().len() == 0 {
            return Err(Error::Unspecified);
        }

        Ok(Instant::new(self.next_instants.borrow_mut().remove(0)))
    }

    fn new_timer<Dur>(&self, duration: Dur) -> Timer<OneShot, Armed, Self, Dur>
    where
        Dur: Duration + FixedPoint,
    {
        Timer::new(self, duration)
    }
}

mock! {
    pub SPIBus {}

    impl Transfer<u8> for SPIBus{
        type Error = u32;

        fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'static [u8], u32>;
    }
}

mock! {
    pub Pin {}

    impl OutputPin for Pin {
        type Error = u32;

        fn set_low(&mut self) -> Result<(), u32>;
        fn set_high(&mut self) -> Result<(), u32>;
    }
}

/// Bus and CS mocks with helpers asserting the exact bytes of every transaction
#[derive(Default)]
pub struct Mocks {
    pub bus: MockSPIBus,
    pub pin_cs: MockPin,
}

impl Mocks {
    pub fn into_controller(self) -> Controller<MockSPIBus, MockPin, TestClock> {
        Controller::new(self.bus, self.pin_cs)
    }

    pub fn into_controller_with(self, silicon: Silicon) -> Controller<MockSPIBus, MockPin, TestClock> {
        Controller::with_silicon(self.bus, self.pin_cs, silicon)
    }

    /// Expects a single transaction framed by CS, returning the given response
    pub fn expect_transfer(&mut self, expected: Vec<u8>, response: Vec<u8>, seq: &mut Sequence) {
        let response: &'static [u8] = Box::leak(response.into_boxed_slice());

        self.pin_cs.expect_set_low().times(1).return_const(Ok(())).in_sequence(seq);

        self.bus
            .expect_transfer()
            .times(1)
            .returning(move |data| {
                assert_eq!(expected, data.to_vec());
                Ok(response)
            })
            .in_sequence(seq);

        self.pin_cs.expect_set_high().times(1).return_const(Ok(())).in_sequence(seq);
    }

    /// Expects a READ instruction of `data.len()` bytes and answers with `data`
    pub fn expect_read(&mut self, address: u16, data: &[u8], seq: &mut Sequence) {
        let mut expected = command(0b0011, address);
        expected.resize(2 + data.len(), 0);

        let mut response = alloc::vec![0u8; 2];
        response.extend_from_slice(data);

        self.expect_transfer(expected, response, seq);
    }

    /// Expects a READ instruction of a little endian word
    pub fn expect_read_word(&mut self, address: u16, value: u32, seq: &mut Sequence) {
        self.expect_read(address, &value.to_le_bytes(), seq);
    }

    /// Expects a WRITE instruction of the given bytes
    pub fn expect_write(&mut self, address: u16, data: &[u8], seq: &mut Sequence) {
        let mut expected = command(0b0010, address);
        expected.extend_from_slice(data);

        let response = alloc::vec![0u8; expected.len()];
        self.expect_transfer(expected, response, seq);
    }

    /// Expects a WRITE instruction of a little endian word
    pub fn expect_write_word(&mut self, address: u16, value: u32, seq: &mut Sequence) {
        self.expect_write(address, &value.to_le_bytes(), seq);
    }

    /// Simulates a SPI transfer fault
    pub fn mock_transfer_error(&mut self) {
        self.bus.expect_transfer().times(1).return_const(Err(55));
        self.pin_cs.expect_set_low().times(1).return_const(Ok(()));
        self.pin_cs.expect_set_high().times(1).return_const(Ok(()));
    }

    /// Simulates a CS pin set error
    pub fn mock_cs_error(&mut self) {
        self.pin_cs.expect_set_low().times(1).return_const(Err(21));
    }
}

fn command(instruction: u16, address: u16) -> Vec<u8> {
    ((instruction << 12) | (address & 0x0FFF)).to_be_bytes().to_vec()
}
