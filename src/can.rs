//!# CAN Controller device
//!
//!```
//!# use mcp25xxfd::can::Controller;
//!# use mcp25xxfd::config::Configuration;
//!# use mcp25xxfd::example::*;
//!#
//! let clock = ExampleClock::default();
//! let spi_bus = ExampleSPIBus::default();
//! let cs_pin = ExampleCSPin {};
//!
//! // Initialize controller object
//! let mut can_controller = Controller::new(spi_bus, cs_pin);
//!
//! // Use default configuration settings
//! let can_config = Configuration::default();
//!
//! // Configure CAN controller
//! can_controller.configure(&can_config, &clock).unwrap();
//! ```

use crate::config::{ClockConfiguration, Configuration, Silicon};
use crate::crc::{calculate_crc16, update_crc16, SEED};
use crate::fifo::FifoError;
use crate::filter::Filter;
use crate::message::{RxMessage, TxMessage, MAX_MESSAGE_OBJECT_SIZE};
use crate::registers::{CanControlReg3, C1TSCON, DeviceIdReg};
use crate::status::{DeviceId, OperationMode, OperationStatus, OscillatorStatus, RxChannelStatus, TxChannelStatus};
use crate::timing::{BitRate, SysClk};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use core::marker::PhantomData;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::duration::Milliseconds;
use embedded_time::Clock;
use log::{debug, warn};

pub(crate) const REGISTER_C1CON: u16 = 0x000;
pub(crate) const REGISTER_C1NBTCFG: u16 = 0x004;
pub(crate) const REGISTER_C1DBTCFG: u16 = 0x008;
pub(crate) const REGISTER_C1TDC: u16 = 0x00C;
pub(crate) const REGISTER_C1TBC: u16 = 0x010;
pub(crate) const REGISTER_C1TSCON: u16 = 0x014;
pub(crate) const REGISTER_C1VEC: u16 = 0x018;
pub(crate) const REGISTER_C1INT: u16 = 0x01C;
pub(crate) const REGISTER_C1RXIF: u16 = 0x020;
pub(crate) const REGISTER_C1TXIF: u16 = 0x024;
pub(crate) const REGISTER_C1TREC: u16 = 0x034;
pub(crate) const REGISTER_C1BDIAG0: u16 = 0x038;
pub(crate) const REGISTER_C1BDIAG1: u16 = 0x03C;
pub(crate) const REGISTER_C1TEFCON: u16 = 0x040;
pub(crate) const REGISTER_C1TEFSTA: u16 = 0x044;
pub(crate) const REGISTER_C1TEFUA: u16 = 0x048;
pub(crate) const REGISTER_FIFO_BASE: u16 = 0x050;
pub(crate) const REGISTER_FLTCON_BASE: u16 = 0x1D0;
pub(crate) const REGISTER_FLTOBJ_BASE: u16 = 0x1F0;
pub(crate) const REGISTER_OSC: u16 = 0xE00;
pub(crate) const REGISTER_ECCCON: u16 = 0xE0C;
pub(crate) const REGISTER_DEVID: u16 = 0xE14;

/// Start of the message RAM
pub const RAM_BASE: u16 = 0x400;

/// Size of the message RAM in bytes
pub const RAM_SIZE: u16 = 2048;

/// Chunk size used for RAM initialization
const RAM_INIT_CHUNK: usize = 64;

/// Distance between the register triplets of two FIFOs
const FIFO_REGISTER_STRIDE: u16 = 12;

/// Command, optional length byte, largest message object and CRC
const SPI_BUFFER_SIZE: usize = 3 + MAX_MESSAGE_OBJECT_SIZE + 2;

/// Polls of the FIFO status done by [CanController::transmit] before giving up
pub(crate) const TRANSMIT_RETRIES: usize = 50;

/// SPI bus or chip select errors
#[derive(Debug, PartialEq, Eq)]
pub enum BusError<B, CS> {
    /// SPI transfer failed
    TransferError(B),
    /// Setting chip select pin failed
    CSError(CS),
    /// Transaction of the given length does not fit into the transfer buffer
    BufferOverflow(usize),
    /// Bus returned less bytes than the given transaction length
    ShortResponse(usize),
    /// CRC transfer of message RAM with a length not multiple of 4
    UnalignedRamAccess(usize),
}

/// Errors of mode requests
#[derive(Debug, PartialEq, Eq)]
pub enum ModeError<B, CS> {
    /// Reading the control register failed
    ReadFailed(BusError<B, CS>),
    /// Writing the mode request failed
    WriteFailed(BusError<B, CS>),
    /// Device reported an unknown mode
    InvalidMode(u8),
}

/// Possible errors during configuration
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError<B, CS> {
    /// SPI bus transfer error
    BusError(BusError<B, CS>),
    /// Mode request failed
    Mode(ModeError<B, CS>),
    /// Bit rate combination not feasible with the system clock
    UnsupportedBitRate(BitRate, SysClk),
    /// Transmit queue requested, but not present on silicon
    TxQueueUnsupported,
    /// Internal clock error
    ClockError,
    /// No configuration mode within timeout of 2 ms
    ConfigurationModeTimeout,
    /// Device did not enter given request mode within timeout of 2 ms
    RequestModeTimeout,
    /// Configuring TEF or TXQ failed
    Fifo(FifoError<B, CS>),
}

impl<B, CS> From<BusError<B, CS>> for ConfigError<B, CS> {
    fn from(value: BusError<B, CS>) -> Self {
        Self::BusError(value)
    }
}

impl<B, CS> From<ModeError<B, CS>> for ConfigError<B, CS> {
    fn from(value: ModeError<B, CS>) -> Self {
        Self::Mode(value)
    }
}

impl<B, CS> From<FifoError<B, CS>> for ConfigError<B, CS> {
    fn from(value: FifoError<B, CS>) -> Self {
        Self::Fifo(value)
    }
}

impl<B, CS> From<embedded_time::clock::Error> for ConfigError<B, CS> {
    fn from(_error: embedded_time::clock::Error) -> Self {
        Self::ClockError
    }
}

/// Main CAN controller device
pub struct Controller<B: Transfer<u8>, CS: OutputPin, CLK: Clock> {
    /// SPI bus
    bus: B,

    /// CS pin
    pin_cs: CS,

    /// Features of the connected silicon
    pub(crate) silicon: Silicon,

    /// System clock
    clock: PhantomData<CLK>,
}

/// Trait for CAN controller
pub trait CanController {
    type Error;

    /// Loads the message into the given TX FIFO and requests transmission.
    /// Polls the FIFO status a bounded number of times while it is full.
    fn transmit(&mut self, channel: u8, message: &TxMessage) -> Result<(), Self::Error>;

    /// Receives the next message of the given RX FIFO, None if the FIFO is empty
    fn receive(&mut self, channel: u8, max_bytes: usize) -> Result<Option<RxMessage>, Self::Error>;

    /// Writes filter and mask and links the filter to the given RX FIFO
    fn set_filter_object(&mut self, filter: Filter, channel: u8) -> Result<(), Self::Error>;
}

impl<B, CS, CLK> CanController for Controller<B, CS, CLK>
where
    B: Transfer<u8>,
    CS: OutputPin,
    CLK: Clock,
{
    type Error = FifoError<B::Error, CS::Error>;

    fn transmit(&mut self, channel: u8, message: &TxMessage) -> Result<(), Self::Error> {
        for _ in 0..TRANSMIT_RETRIES {
            let status = self.tx_channel_status(channel)?;

            if status.contains(TxChannelStatus::NOT_FULL) {
                return self.load(channel, message, true);
            }
        }

        debug!("TX FIFO {channel} still full after {TRANSMIT_RETRIES} attempts");
        Err(FifoError::TxFifoFull)
    }

    fn receive(&mut self, channel: u8, max_bytes: usize) -> Result<Option<RxMessage>, Self::Error> {
        let status = self.rx_channel_status(channel)?;

        if !status.contains(RxChannelStatus::NOT_EMPTY) {
            return Ok(None);
        }

        self.receive_message(channel, max_bytes).map(Some)
    }

    fn set_filter_object(&mut self, filter: Filter, channel: u8) -> Result<(), Self::Error> {
        self.disable_filter(filter.index)?;
        self.configure_filter(filter.index, u32::from(filter.filter_bits))?;
        self.configure_mask(filter.index, u32::from(filter.mask_bits))?;
        self.link_filter_to_channel(filter.index, channel, true)?;

        Ok(())
    }
}

impl<B, CS, CLK> Controller<B, CS, CLK>
where
    B: Transfer<u8>,
    CS: OutputPin,
    CLK: Clock,
{
    /// Creates a controller for Rev B silicon (MCP2518FD, MCP251863)
    pub fn new(bus: B, pin_cs: CS) -> Self {
        Self::with_silicon(bus, pin_cs, Silicon::default())
    }

    /// Creates a controller for the given silicon variant
    pub fn with_silicon(bus: B, pin_cs: CS, silicon: Silicon) -> Self {
        Self {
            bus,
            pin_cs,
            silicon,
            clock: Default::default(),
        }
    }

    /// Silicon variant the controller was created for
    pub fn silicon(&self) -> &Silicon {
        &self.silicon
    }

    /// Configures the controller with the given settings
    pub fn configure(&mut self, config: &Configuration, clock: &CLK) -> Result<(), ConfigError<B::Error, CS::Error>> {
        if config.tx_queue.is_some() && !self.silicon.tx_queue {
            debug!("Transmit queue requested, but not supported by silicon {:?}", self.silicon);
            return Err(ConfigError::TxQueueUnsupported);
        }

        if config.bit_rate.timing().is_none() {
            debug!("Bit rate configuration {:?} not feasible", config.bit_rate);
            return Err(ConfigError::UnsupportedBitRate(
                config.bit_rate.bit_rate,
                config.bit_rate.sys_clk,
            ));
        }

        self.enable_mode(OperationMode::Configuration, clock, ConfigError::ConfigurationModeTimeout)?;

        self.configure_oscillator(&config.clock)?;

        self.configure_bit_time(config.bit_rate.bit_rate, config.bit_rate.sys_clk)?;

        let mut options = 0u8;
        options |= (config.tx_queue.is_some() as u8) << 4;
        options |= (config.tef.is_some() as u8) << 3;
        options |= config.restrict_retransmission as u8;
        self.write_byte(REGISTER_C1CON + 2, options)?;

        self.configure_ecc(config.ecc)?;

        if let Some(tef) = &config.tef {
            self.tef_configure(tef)?;
        }

        if let Some(tx_queue) = &config.tx_queue {
            self.configure_tx_channel(0, tx_queue)?;
        }

        self.enable_mode(config.mode, clock, ConfigError::RequestModeTimeout)?;

        Ok(())
    }

    /// Requests the given operation mode. Does not wait for the mode to be reached.
    pub fn select_mode(&mut self, mode: OperationMode) -> Result<(), ModeError<B::Error, CS::Error>> {
        let register = self.read_byte(REGISTER_C1CON + 3).map_err(ModeError::ReadFailed)?;
        let register = CanControlReg3::from(register).with_reqop(mode as u8);

        self.write_byte(REGISTER_C1CON + 3, u8::from(register))
            .map_err(ModeError::WriteFailed)
    }

    /// Reads the current operation mode
    pub fn get_mode(&mut self) -> Result<OperationMode, ModeError<B::Error, CS::Error>> {
        let register = self.read_byte(REGISTER_C1CON + 2).map_err(ModeError::ReadFailed)?;

        OperationMode::try_from(register >> 5).map_err(ModeError::InvalidMode)
    }

    /// Waits max. 2 ms for the given mode to be reached
    pub fn wait_for_mode(&mut self, mode: OperationMode, clock: &CLK) -> Result<(), ConfigError<B::Error, CS::Error>> {
        self.await_mode(mode, clock, ConfigError::RequestModeTimeout)
    }

    /// Aborts all pending transmissions
    pub fn abort_all(&mut self) -> Result<(), BusError<B::Error, CS::Error>> {
        let register = self.read_byte(REGISTER_C1CON + 3)?;
        let register = CanControlReg3::from(register).with_abat(true);

        self.write_byte(REGISTER_C1CON + 3, u8::from(register))
    }

    /// Reads and returns the operation status
    pub fn read_operation_status(&mut self) -> Result<OperationStatus, BusError<B::Error, CS::Error>> {
        let data = self.read_byte(REGISTER_C1CON + 2)?;

        Ok(OperationStatus::from_register(data))
    }

    /// Writes the oscillator configuration
    pub fn configure_oscillator(&mut self, config: &ClockConfiguration) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_byte(REGISTER_OSC, config.as_register())
    }

    /// Reads and returns the oscillator status
    pub fn read_oscillator_status(&mut self) -> Result<OscillatorStatus, BusError<B::Error, CS::Error>> {
        let data = self.read_byte(REGISTER_OSC + 1)?;

        Ok(OscillatorStatus::from_register(data))
    }

    /// Reads and returns the current clock configuration
    pub fn read_clock_configuration(&mut self) -> Result<ClockConfiguration, BusError<B::Error, CS::Error>> {
        let data = self.read_byte(REGISTER_OSC)?;

        Ok(ClockConfiguration::from_register(data))
    }

    /// Enables or disables ECC of the message RAM
    pub fn configure_ecc(&mut self, enable: bool) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_byte(REGISTER_ECCCON, enable as u8)
    }

    /// Fills the entire message RAM with the given value.
    /// Required after enabling ECC, as reading uninitialized RAM raises ECC errors.
    pub fn initialize_ram(&mut self, value: u8) -> Result<(), BusError<B::Error, CS::Error>> {
        let chunk = [value; RAM_INIT_CHUNK];

        for offset in (0..RAM_SIZE).step_by(RAM_INIT_CHUNK) {
            self.write_byte_array(RAM_BASE + offset, &chunk)?;
        }

        Ok(())
    }

    /// Reads device ID and silicon revision
    pub fn read_device_id(&mut self) -> Result<DeviceId, BusError<B::Error, CS::Error>> {
        let register = DeviceIdReg::from(self.read_word(REGISTER_DEVID)?);

        Ok(DeviceId {
            id: register.id(),
            revision: register.rev(),
        })
    }

    /// Configures the time base counter. Counter increments every `divider` (1-1024) system clocks.
    pub fn configure_timestamp(&mut self, divider: u16, enable: bool) -> Result<(), BusError<B::Error, CS::Error>> {
        let register = C1TSCON::new()
            .with_tbcen(enable)
            .with_tbcpre(divider.clamp(1, 1024) - 1);

        self.write_word(REGISTER_C1TSCON, u32::from(register))
    }

    /// Current value of the time base counter
    pub fn read_time_base_counter(&mut self) -> Result<u32, BusError<B::Error, CS::Error>> {
        self.read_word(REGISTER_C1TBC)
    }

    /// Reset internal register to default and switch to Configuration mode
    pub fn reset(&mut self) -> Result<(), BusError<B::Error, CS::Error>> {
        let mut buffer = command(0, Operation::Reset);
        self.transfer(&mut buffer)?;

        Ok(())
    }

    /// Requests the given mode and waits max. 2 ms for it
    fn enable_mode(
        &mut self,
        mode: OperationMode,
        clock: &CLK,
        timeout_error: ConfigError<B::Error, CS::Error>,
    ) -> Result<(), ConfigError<B::Error, CS::Error>> {
        self.select_mode(mode)?;
        self.await_mode(mode, clock, timeout_error)
    }

    fn await_mode(
        &mut self,
        mode: OperationMode,
        clock: &CLK,
        timeout_error: ConfigError<B::Error, CS::Error>,
    ) -> Result<(), ConfigError<B::Error, CS::Error>> {
        let target = clock
            .try_now()?
            .checked_add(Milliseconds::new(2))
            .ok_or(ConfigError::ClockError)?;

        loop {
            let current_mode = self.get_mode()?;

            if current_mode == mode {
                return Ok(());
            }

            if clock.try_now()? > target {
                debug!("Device did not enter mode {mode:?} within timeout. Current mode: {current_mode:?}");
                return Err(timeout_error);
            }
        }
    }

    /// Reads a single byte
    pub fn read_byte(&mut self, address: u16) -> Result<u8, BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 1];
        self.read_byte_array(address, &mut data)?;

        Ok(data[0])
    }

    /// Reads a little endian half word
    pub fn read_half_word(&mut self, address: u16) -> Result<u16, BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 2];
        self.read_byte_array(address, &mut data)?;

        Ok(LittleEndian::read_u16(&data))
    }

    /// Reads a little endian word
    pub fn read_word(&mut self, address: u16) -> Result<u32, BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 4];
        self.read_byte_array(address, &mut data)?;

        Ok(LittleEndian::read_u32(&data))
    }

    /// Reads `data.len()` bytes starting at the given address in one transaction
    pub fn read_byte_array(&mut self, address: u16, data: &mut [u8]) -> Result<(), BusError<B::Error, CS::Error>> {
        let length = 2 + data.len();
        let mut staging = [0u8; SPI_BUFFER_SIZE];
        let buffer = staging.get_mut(..length).ok_or(BusError::BufferOverflow(length))?;

        buffer[..2].copy_from_slice(&command(address, Operation::Read));

        let response = self.transfer(buffer)?;
        data.copy_from_slice(response_bytes(response, 2, data.len())?);

        Ok(())
    }

    /// Writes a single byte
    pub fn write_byte(&mut self, address: u16, value: u8) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_byte_array(address, &[value])
    }

    /// Writes a little endian half word
    pub fn write_half_word(&mut self, address: u16, value: u16) -> Result<(), BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 2];
        LittleEndian::write_u16(&mut data, value);

        self.write_byte_array(address, &data)
    }

    /// Writes a little endian word
    pub fn write_word(&mut self, address: u16, value: u32) -> Result<(), BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 4];
        LittleEndian::write_u32(&mut data, value);

        self.write_byte_array(address, &data)
    }

    /// Writes all bytes starting at the given address in one transaction
    pub fn write_byte_array(&mut self, address: u16, data: &[u8]) -> Result<(), BusError<B::Error, CS::Error>> {
        let length = 2 + data.len();
        let mut staging = [0u8; SPI_BUFFER_SIZE];
        let buffer = staging.get_mut(..length).ok_or(BusError::BufferOverflow(length))?;

        buffer[..2].copy_from_slice(&command(address, Operation::Write));
        buffer[2..].copy_from_slice(data);

        self.transfer(buffer)?;
        Ok(())
    }

    /// Writes a single byte, device discards the write on CRC mismatch
    pub fn write_byte_safe(&mut self, address: u16, value: u8) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_safe(address, &[value])
    }

    /// Writes a half word, device discards the write on CRC mismatch
    pub fn write_half_word_safe(&mut self, address: u16, value: u16) -> Result<(), BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 2];
        LittleEndian::write_u16(&mut data, value);

        self.write_safe(address, &data)
    }

    /// Writes a word, device discards the write on CRC mismatch
    pub fn write_word_safe(&mut self, address: u16, value: u32) -> Result<(), BusError<B::Error, CS::Error>> {
        let mut data = [0u8; 4];
        LittleEndian::write_u32(&mut data, value);

        self.write_safe(address, &data)
    }

    /// CRC protected write of multiple bytes. Length of RAM writes has to be a multiple of 4.
    pub fn write_byte_array_with_crc(&mut self, address: u16, data: &[u8]) -> Result<(), BusError<B::Error, CS::Error>> {
        let length = 3 + data.len() + 2;
        let mut staging = [0u8; SPI_BUFFER_SIZE];
        let buffer = staging.get_mut(..length).ok_or(BusError::BufferOverflow(length))?;
        check_ram_alignment(address, data.len())?;

        let header = crc_header(address, Operation::WriteCrc, data.len());
        buffer[..3].copy_from_slice(&header);
        buffer[3..3 + data.len()].copy_from_slice(data);

        let crc = calculate_crc16(&buffer[..3 + data.len()]);
        BigEndian::write_u16(&mut buffer[3 + data.len()..], crc);

        self.transfer(buffer)?;
        Ok(())
    }

    /// CRC protected read of multiple bytes. Returns false if the CRC sent by the device does not match.
    /// Data is copied in both cases.
    pub fn read_byte_array_with_crc(
        &mut self,
        address: u16,
        data: &mut [u8],
    ) -> Result<bool, BusError<B::Error, CS::Error>> {
        let length = 3 + data.len() + 2;
        let mut staging = [0u8; SPI_BUFFER_SIZE];
        let buffer = staging.get_mut(..length).ok_or(BusError::BufferOverflow(length))?;
        check_ram_alignment(address, data.len())?;

        let header = crc_header(address, Operation::ReadCrc, data.len());
        buffer[..3].copy_from_slice(&header);

        let response = self.transfer(buffer)?;
        let response = response_bytes(response, 0, length)?;

        data.copy_from_slice(&response[3..3 + data.len()]);
        let received_crc = BigEndian::read_u16(&response[3 + data.len()..]);

        let expected_crc = update_crc16(update_crc16(SEED, &header), data);

        if received_crc != expected_crc {
            warn!("CRC mismatch reading 0x{address:03X}: received 0x{received_crc:04X}, expected 0x{expected_crc:04X}");
            return Ok(false);
        }

        Ok(true)
    }

    fn write_safe(&mut self, address: u16, data: &[u8]) -> Result<(), BusError<B::Error, CS::Error>> {
        let length = 2 + data.len() + 2;
        let mut staging = [0u8; SPI_BUFFER_SIZE];
        let buffer = staging.get_mut(..length).ok_or(BusError::BufferOverflow(length))?;

        buffer[..2].copy_from_slice(&command(address, Operation::WriteSafe));
        buffer[2..2 + data.len()].copy_from_slice(data);

        let crc = calculate_crc16(&buffer[..2 + data.len()]);
        BigEndian::write_u16(&mut buffer[2 + data.len()..], crc);

        self.transfer(buffer)?;
        Ok(())
    }

    /// Executes a SPI transfer framed by chip select and returns the received bytes
    fn transfer<'a>(&mut self, buffer: &'a mut [u8]) -> Result<&'a [u8], BusError<B::Error, CS::Error>> {
        self.pin_cs.set_low().map_err(BusError::CSError)?;
        let result = self.bus.transfer(buffer).map_err(BusError::TransferError);
        self.pin_cs.set_high().map_err(BusError::CSError)?;

        result
    }
}

/// Returns the control register address of the given FIFO (channel 0 is TXQ if present)
pub(crate) fn fifo_control_register(channel: u8) -> u16 {
    REGISTER_FIFO_BASE + FIFO_REGISTER_STRIDE * channel as u16
}

/// Returns the status register address of the given FIFO
pub(crate) fn fifo_status_register(channel: u8) -> u16 {
    fifo_control_register(channel) + 4
}

/// Returns the user address register address of the given FIFO
pub(crate) fn fifo_user_address_register(channel: u8) -> u16 {
    fifo_control_register(channel) + 8
}

/// Returns the filter control register byte of the given filter
pub(crate) fn filter_control_register_byte(filter_index: u8) -> u16 {
    REGISTER_FLTCON_BASE + filter_index as u16
}

/// Returns the filter object register address of the given filter
pub(crate) fn filter_object_register(filter_index: u8) -> u16 {
    REGISTER_FLTOBJ_BASE + 8 * filter_index as u16
}

/// Returns the filter mask register address of the given filter
pub(crate) fn filter_mask_register(filter_index: u8) -> u16 {
    filter_object_register(filter_index) + 4
}

/// True if the address is part of the message RAM
pub(crate) fn is_ram_address(address: u16) -> bool {
    (RAM_BASE..RAM_BASE + RAM_SIZE).contains(&address)
}

/// Register operation type
#[derive(Copy, Clone)]
enum Operation {
    Reset = 0b0000,
    Write = 0b0010,
    Read = 0b0011,
    WriteCrc = 0b1010,
    ReadCrc = 0b1011,
    WriteSafe = 0b1100,
}

/// Creates the two command bytes (4 bit instruction, 12 bit address)
fn command(address: u16, operation: Operation) -> [u8; 2] {
    let command = (address & 0x0FFF) | ((operation as u16) << 12);

    command.to_be_bytes()
}

/// Command bytes followed by the length field of CRC array instructions,
/// which counts words for RAM addresses and bytes otherwise
fn crc_header(address: u16, operation: Operation, length: usize) -> [u8; 3] {
    let command = command(address, operation);
    let count = if is_ram_address(address) { length / 4 } else { length };

    [command[0], command[1], count as u8]
}

/// Length field of RAM CRC transfers counts words
fn check_ram_alignment<B, CS>(address: u16, length: usize) -> Result<(), BusError<B, CS>> {
    if is_ram_address(address) && length % 4 != 0 {
        debug!("CRC transfer of {length} bytes at 0x{address:03X} is not word aligned");
        return Err(BusError::UnalignedRamAccess(length));
    }

    Ok(())
}

fn response_bytes<B, CS>(response: &[u8], offset: usize, length: usize) -> Result<&[u8], BusError<B, CS>> {
    response
        .get(offset..offset + length)
        .ok_or(BusError::ShortResponse(response.len()))
}
