//!# FIFO handling
//! Message objects are exchanged through FIFOs located in the message RAM. Each FIFO is
//! configured once (in configuration mode) as either transmit or receive FIFO. Channel 0 is
//! the transmit queue on silicon supporting it.
//!
//! A message object is written to or read from the RAM address given by the FIFO user address
//! register. Afterwards the FIFO head/tail is incremented by setting `UINC`.
//!
//!```
//!# use bytes::Bytes;
//!# use embedded_can::{Id, StandardId};
//!# use mcp25xxfd::can::Controller;
//!# use mcp25xxfd::config::{PayloadSize, TxFifoConfiguration};
//!# use mcp25xxfd::example::*;
//!# use mcp25xxfd::message::TxMessage;
//!#
//!# let mut controller: Controller<_, _, ExampleClock> = Controller::new(ExampleSPIBus::default(), ExampleCSPin {});
//! controller.configure_tx_channel(2, &TxFifoConfiguration {
//!     size: 8,
//!     payload_size: PayloadSize::EightBytes,
//!     priority: 1,
//!     ..Default::default()
//! }).unwrap();
//!
//! let message = TxMessage::new(Id::Standard(StandardId::new(0x100).unwrap()), Bytes::from_static(b"Mikro"), false, false).unwrap();
//! controller.load(2, &message, true).unwrap();
//! ```
use crate::can::{
    fifo_control_register, fifo_status_register, BusError, Controller, RAM_BASE, RAM_SIZE, REGISTER_C1TEFCON,
    REGISTER_C1TEFSTA,
};
use crate::config::{PayloadSize, RxFifoConfiguration, TefConfiguration, TxFifoConfiguration};
use crate::message::{
    padded_length, RxHeader, RxMessage, TefMessage, TxHeader, TxMessage, HEADER_SIZE, MAX_MESSAGE_OBJECT_SIZE,
    TIMESTAMP_SIZE,
};
use crate::registers::{FifoControl, FifoControlReg1, TefControl};
use crate::status::{RxChannelStatus, TefStatus, TxChannelStatus};
use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::Clock;
use log::debug;

/// Highest FIFO channel
pub const MAX_CHANNEL: u8 = 31;

/// Bit of the first status byte signaling a RX overflow
const RX_OVERFLOW_FLAG: u8 = 1 << 3;

/// Possible errors of FIFO operations
#[derive(Debug, PartialEq, Eq)]
pub enum FifoError<B, CS> {
    /// SPI bus error outside of a message transfer
    BusError(BusError<B, CS>),
    /// Reading control, status and user address registers failed
    ReadFailed(BusError<B, CS>),
    /// FIFO is configured for the other direction
    WrongDirection(u8),
    /// Channel is reserved for the transmit queue
    ReservedChannel(u8),
    /// Channel number out of range
    InvalidChannel(u8),
    /// DLC encodes less bytes than the payload
    DlcTooSmall { dlc_bytes: usize, payload: usize },
    /// Payload exceeds the configured payload size of the FIFO
    PayloadTooLarge { payload: usize, slot: usize },
    /// Message object would not be located within the message RAM
    InvalidRamAddress(u16),
    /// Reading or writing the message object failed
    RamAccessFailed(BusError<B, CS>),
    /// Setting UINC failed
    PointerUpdateFailed(BusError<B, CS>),
    /// TX FIFO did not get ready for a new message
    TxFifoFull,
}

impl<B, CS> From<BusError<B, CS>> for FifoError<B, CS> {
    fn from(value: BusError<B, CS>) -> Self {
        Self::BusError(value)
    }
}

/// Control and user address register of a FIFO
#[derive(Copy, Clone, Debug)]
struct FifoRegisters {
    control: FifoControl,
    user_address: u16,
}

impl FifoRegisters {
    /// Decodes the burst read of control, status and user address register
    fn from_bytes(data: &[u8; 12]) -> Self {
        Self {
            control: FifoControl::from(LittleEndian::read_u32(&data[0..4])),
            user_address: (LittleEndian::read_u32(&data[8..12]) & 0xFFF) as u16,
        }
    }
}

impl<B, CS, CLK> Controller<B, CS, CLK>
where
    B: Transfer<u8>,
    CS: OutputPin,
    CLK: Clock,
{
    /// Configures the given FIFO for transmission. Channel 0 configures the transmit queue.
    pub fn configure_tx_channel(
        &mut self,
        channel: u8,
        config: &TxFifoConfiguration,
    ) -> Result<(), FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        self.write_word(fifo_control_register(channel), u32::from(config.as_register()))?;
        Ok(())
    }

    /// Configures the given FIFO for reception
    pub fn configure_rx_channel(
        &mut self,
        channel: u8,
        config: &RxFifoConfiguration,
    ) -> Result<(), FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        if channel == 0 && self.silicon.tx_queue {
            debug!("Channel 0 is reserved for the transmit queue");
            return Err(FifoError::ReservedChannel(channel));
        }

        self.write_word(fifo_control_register(channel), u32::from(config.as_register()))?;
        Ok(())
    }

    /// Writes the message into the next free slot of the given TX FIFO.
    /// If `flush` is true, transmission is requested within the same register write incrementing the FIFO.
    pub fn load(&mut self, channel: u8, message: &TxMessage, flush: bool) -> Result<(), FifoError<B::Error, CS::Error>> {
        let registers = self.read_fifo_registers(channel)?;

        if !registers.control.txen() {
            debug!("Unable to load message, FIFO {channel} is configured for reception");
            return Err(FifoError::WrongDirection(channel));
        }

        let payload = message.get_payload().len();
        let dlc_bytes = message.length();

        if dlc_bytes < payload {
            debug!("DLC encodes {dlc_bytes} bytes, payload has {payload} bytes");
            return Err(FifoError::DlcTooSmall { dlc_bytes, payload });
        }

        let slot = PayloadSize::from_register(registers.control.plsize()).bytes();

        if payload > slot {
            debug!("Payload of {payload} bytes exceeds payload size {slot} of FIFO {channel}");
            return Err(FifoError::PayloadTooLarge { payload, slot });
        }

        let header = message
            .header
            .with_sequence(message.header.sequence() & self.silicon.sequence_mask());

        let mut object = [0u8; MAX_MESSAGE_OBJECT_SIZE];
        let length = message.write_object(header, &mut object);

        let address = self.ram_address(registers.user_address);
        verify_ram_address(address, length)?;

        self.write_byte_array(address, &object[..length])
            .map_err(FifoError::RamAccessFailed)?;

        let control = FifoControlReg1::new().with_uinc(true).with_txreq(flush);

        self.write_byte(fifo_control_register(channel) + 1, u8::from(control))
            .map_err(FifoError::PointerUpdateFailed)?;

        Ok(())
    }

    /// Reads the next message of the given RX FIFO and increments the FIFO tail.
    /// At most `max_bytes` payload bytes are read.
    pub fn receive_message(&mut self, channel: u8, max_bytes: usize) -> Result<RxMessage, FifoError<B::Error, CS::Error>> {
        let registers = self.read_fifo_registers(channel)?;

        if registers.control.txen() {
            debug!("Unable to receive message, FIFO {channel} is configured for transmission");
            return Err(FifoError::WrongDirection(channel));
        }

        let timestamp_size = if registers.control.rxtsen() { TIMESTAMP_SIZE } else { 0 };
        let payload_limit = max_bytes.min(PayloadSize::from_register(registers.control.plsize()).bytes());
        let length = padded_length(HEADER_SIZE + timestamp_size + payload_limit).min(MAX_MESSAGE_OBJECT_SIZE);

        let address = self.ram_address(registers.user_address);
        verify_ram_address(address, length)?;

        let mut object = [0u8; MAX_MESSAGE_OBJECT_SIZE];
        self.read_byte_array(address, &mut object[..length])
            .map_err(FifoError::RamAccessFailed)?;

        let header = RxHeader::from_wire(&object);
        let timestamp = registers
            .control
            .rxtsen()
            .then(|| LittleEndian::read_u32(&object[HEADER_SIZE..HEADER_SIZE + TIMESTAMP_SIZE]));

        let payload_start = HEADER_SIZE + timestamp_size;
        let payload_length = header.data_length_code().bytes().min(payload_limit);

        self.increment_fifo(channel)?;

        Ok(RxMessage {
            header,
            timestamp,
            buff: Bytes::copy_from_slice(&object[payload_start..payload_start + payload_length]),
        })
    }

    /// Status of a TX FIFO, [TxChannelStatus::TRANSMITTING] is set while TXREQ is pending.
    /// Fails with [FifoError::WrongDirection] for RX FIFOs.
    pub fn tx_channel_status(&mut self, channel: u8) -> Result<TxChannelStatus, FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        let mut data = [0u8; 8];
        self.read_byte_array(fifo_control_register(channel), &mut data)
            .map_err(FifoError::ReadFailed)?;

        let control = FifoControl::from(LittleEndian::read_u32(&data[0..4]));

        if !control.txen() {
            debug!("FIFO {channel} is configured for reception");
            return Err(FifoError::WrongDirection(channel));
        }

        let mut status = TxChannelStatus::from_bits_truncate(data[4] as u16);

        if control.txreq() {
            status |= TxChannelStatus::TRANSMITTING;
        }

        Ok(status)
    }

    /// Status of a RX FIFO
    pub fn rx_channel_status(&mut self, channel: u8) -> Result<RxChannelStatus, FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        let status = self
            .read_byte(fifo_status_register(channel))
            .map_err(FifoError::ReadFailed)?;

        Ok(RxChannelStatus::from_bits_truncate(status))
    }

    /// Resets the FIFO to empty state
    pub fn reset_channel(&mut self, channel: u8) -> Result<(), FifoError<B::Error, CS::Error>> {
        self.write_fifo_control(channel, FifoControlReg1::new().with_freset(true))
    }

    /// Requests transmission of all messages of the TX FIFO
    pub fn flush(&mut self, channel: u8) -> Result<(), FifoError<B::Error, CS::Error>> {
        self.write_fifo_control(channel, FifoControlReg1::new().with_txreq(true))
    }

    /// Aborts pending transmissions of the TX FIFO by clearing TXREQ
    pub fn abort_channel(&mut self, channel: u8) -> Result<(), FifoError<B::Error, CS::Error>> {
        self.write_fifo_control(channel, FifoControlReg1::new())
    }

    /// Clears the overflow flag of a RX FIFO
    pub fn clear_rx_overflow(&mut self, channel: u8) -> Result<(), FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        let register = fifo_status_register(channel);
        let status = self.read_byte(register).map_err(FifoError::ReadFailed)?;

        self.write_byte(register, status & !RX_OVERFLOW_FLAG)?;
        Ok(())
    }

    /// Configures the transmit event FIFO, only possible in configuration mode
    pub fn tef_configure(&mut self, config: &TefConfiguration) -> Result<(), FifoError<B::Error, CS::Error>> {
        self.write_word(REGISTER_C1TEFCON, u32::from(config.as_register()))?;
        Ok(())
    }

    /// Status of the transmit event FIFO
    pub fn tef_status(&mut self) -> Result<TefStatus, FifoError<B::Error, CS::Error>> {
        let status = self.read_byte(REGISTER_C1TEFSTA).map_err(FifoError::ReadFailed)?;

        Ok(TefStatus::from_bits_truncate(status))
    }

    /// Reads the next transmit event and increments the TEF tail
    pub fn tef_message_get(&mut self) -> Result<TefMessage, FifoError<B::Error, CS::Error>> {
        let mut data = [0u8; 12];
        self.read_byte_array(REGISTER_C1TEFCON, &mut data)
            .map_err(FifoError::ReadFailed)?;

        let control = TefControl::from(LittleEndian::read_u32(&data[0..4]));
        let user_address = (LittleEndian::read_u32(&data[8..12]) & 0xFFF) as u16;

        let timestamp_size = if control.teftsen() { TIMESTAMP_SIZE } else { 0 };
        let length = HEADER_SIZE + timestamp_size;

        let address = self.ram_address(user_address);
        verify_ram_address(address, length)?;

        let mut object = [0u8; HEADER_SIZE + TIMESTAMP_SIZE];
        self.read_byte_array(address, &mut object[..length])
            .map_err(FifoError::RamAccessFailed)?;

        let timestamp = control
            .teftsen()
            .then(|| LittleEndian::read_u32(&object[HEADER_SIZE..]));

        self.tef_update()?;

        Ok(TefMessage {
            header: TxHeader::from_wire(&object),
            timestamp,
        })
    }

    /// Increments the TEF tail
    pub fn tef_update(&mut self) -> Result<(), FifoError<B::Error, CS::Error>> {
        let control = FifoControlReg1::new().with_uinc(true);

        self.write_byte(REGISTER_C1TEFCON + 1, u8::from(control))
            .map_err(FifoError::PointerUpdateFailed)
    }

    /// Resets the TEF to empty state
    pub fn tef_reset(&mut self) -> Result<(), FifoError<B::Error, CS::Error>> {
        let control = FifoControlReg1::new().with_freset(true);

        self.write_byte(REGISTER_C1TEFCON + 1, u8::from(control))?;
        Ok(())
    }

    /// Absolute RAM address of the given user address
    pub(crate) fn ram_address(&self, user_address: u16) -> u16 {
        if self.silicon.user_address_times_four {
            RAM_BASE + 4 * user_address
        } else {
            RAM_BASE + user_address
        }
    }

    fn read_fifo_registers(&mut self, channel: u8) -> Result<FifoRegisters, FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        let mut data = [0u8; 12];
        self.read_byte_array(fifo_control_register(channel), &mut data)
            .map_err(FifoError::ReadFailed)?;

        Ok(FifoRegisters::from_bytes(&data))
    }

    fn increment_fifo(&mut self, channel: u8) -> Result<(), FifoError<B::Error, CS::Error>> {
        let control = FifoControlReg1::new().with_uinc(true);

        self.write_byte(fifo_control_register(channel) + 1, u8::from(control))
            .map_err(FifoError::PointerUpdateFailed)
    }

    fn write_fifo_control(&mut self, channel: u8, control: FifoControlReg1) -> Result<(), FifoError<B::Error, CS::Error>> {
        check_channel(channel)?;

        self.write_byte(fifo_control_register(channel) + 1, u8::from(control))?;
        Ok(())
    }
}

fn check_channel<B, CS>(channel: u8) -> Result<(), FifoError<B, CS>> {
    if channel > MAX_CHANNEL {
        return Err(FifoError::InvalidChannel(channel));
    }

    Ok(())
}

/// Verify message object within RAM bounds
fn verify_ram_address<B, CS>(address: u16, length: usize) -> Result<(), FifoError<B, CS>> {
    if address < RAM_BASE || address as usize + length > (RAM_BASE + RAM_SIZE) as usize {
        debug!("Message object of {length} bytes at 0x{address:03X} exceeds message RAM");
        return Err(FifoError::InvalidRamAddress(address));
    }

    Ok(())
}
