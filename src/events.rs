//!# Module events and error state
//! Module level interrupt flags/enables, interrupt vector decoding, error counters and bus diagnostics.
//!
//! ```
//!# use mcp25xxfd::events::ModuleEvents;
//! let events = ModuleEvents::RX | ModuleEvents::RX_OBJECT_OVERFLOW;
//! assert_eq!(0x0802, events.bits());
//! ```
use crate::can::{
    BusError, Controller, REGISTER_C1BDIAG0, REGISTER_C1BDIAG1, REGISTER_C1INT, REGISTER_C1RXIF, REGISTER_C1TREC,
    REGISTER_C1TXIF, REGISTER_C1VEC,
};
use crate::registers::C1VEC;
use bitflags::bitflags;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::Clock;

bitflags! {
    /// Module interrupt flags (lower half of C1INT), same layout for the enable bits
    pub struct ModuleEvents: u16 {
        const TX = 0x0001;
        const RX = 0x0002;
        const TIME_COUNTER = 0x0004;
        const MODE_CHANGE = 0x0008;
        const TEF = 0x0010;
        const ECC = 0x0100;
        const SPI_CRC = 0x0200;
        const TX_ATTEMPTS = 0x0400;
        const RX_OBJECT_OVERFLOW = 0x0800;
        const SYSTEM_ERROR = 0x1000;
        const BUS_ERROR = 0x2000;
        const BUS_WAKEUP = 0x4000;
        const RX_INVALID_MESSAGE = 0x8000;
    }
}

bitflags! {
    /// Error state flags of the C1TREC register
    pub struct ErrorState: u8 {
        const WARNING = 0x01;
        const RX_WARNING = 0x02;
        const TX_WARNING = 0x04;
        const RX_PASSIVE = 0x08;
        const TX_PASSIVE = 0x10;
        const TX_BUS_OFF = 0x20;
    }
}

bitflags! {
    /// Error flags of the C1BDIAG1 register (upper half word)
    pub struct BusDiagnosticFlags: u16 {
        const NOMINAL_BIT0_ERROR = 0x0001;
        const NOMINAL_BIT1_ERROR = 0x0002;
        const NOMINAL_ACK_ERROR = 0x0004;
        const NOMINAL_FORM_ERROR = 0x0008;
        const NOMINAL_STUFF_ERROR = 0x0010;
        const NOMINAL_CRC_ERROR = 0x0020;
        const TX_BUS_OFF = 0x0080;
        const DATA_BIT0_ERROR = 0x0100;
        const DATA_BIT1_ERROR = 0x0200;
        const DATA_FORM_ERROR = 0x0800;
        const DATA_STUFF_ERROR = 0x1000;
        const DATA_CRC_ERROR = 0x2000;
        const ESI = 0x4000;
        const DLC_MISMATCH = 0x8000;
    }
}

/// Transmit/receive error counters and error state
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ErrorCounters {
    pub tx_error_count: u8,
    pub rx_error_count: u8,
    pub state: ErrorState,
}

impl ErrorCounters {
    pub(crate) fn from_register(register: u32) -> Self {
        let bytes = register.to_le_bytes();

        Self {
            rx_error_count: bytes[0],
            tx_error_count: bytes[1],
            state: ErrorState::from_bits_truncate(bytes[2]),
        }
    }
}

/// Content of the bus diagnostic registers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BusDiagnostics {
    pub nominal_rx_error_count: u8,
    pub nominal_tx_error_count: u8,
    pub data_rx_error_count: u8,
    pub data_tx_error_count: u8,
    /// Messages received or transmitted without error
    pub error_free_messages: u16,
    pub flags: BusDiagnosticFlags,
}

impl BusDiagnostics {
    pub(crate) fn from_registers(bdiag0: u32, bdiag1: u32) -> Self {
        let counters = bdiag0.to_le_bytes();

        Self {
            nominal_rx_error_count: counters[0],
            nominal_tx_error_count: counters[1],
            data_rx_error_count: counters[2],
            data_tx_error_count: counters[3],
            error_free_messages: (bdiag1 & 0xFFFF) as u16,
            flags: BusDiagnosticFlags::from_bits_truncate((bdiag1 >> 16) as u16),
        }
    }

    /// Packed record: counters word followed by flags (lower half) and error free message count (upper half).
    /// The halves of the second word are swapped compared to C1BDIAG1.
    pub fn to_words(&self) -> [u32; 2] {
        let counters = u32::from_le_bytes([
            self.nominal_rx_error_count,
            self.nominal_tx_error_count,
            self.data_rx_error_count,
            self.data_tx_error_count,
        ]);

        [
            counters,
            ((self.error_free_messages as u32) << 16) | self.flags.bits() as u32,
        ]
    }
}

/// Source of the highest priority pending interrupt
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InterruptCode {
    /// FIFO interrupt of the given channel
    Fifo(u8),
    None,
    Error,
    WakeUp,
    ReceiveOverflow,
    AddressError,
    RxTxMabError,
    TimeBaseCounter,
    ModeChange,
    InvalidMessage,
    TransmitEvent,
    TransmitAttempts,
    Reserved(u8),
}

impl InterruptCode {
    pub(crate) fn from_register(code: u8) -> Self {
        match code {
            0x00..=0x1F => Self::Fifo(code),
            0x40 => Self::None,
            0x41 => Self::Error,
            0x42 => Self::WakeUp,
            0x43 => Self::ReceiveOverflow,
            0x44 => Self::AddressError,
            0x45 => Self::RxTxMabError,
            0x46 => Self::TimeBaseCounter,
            0x47 => Self::ModeChange,
            0x48 => Self::InvalidMessage,
            0x49 => Self::TransmitEvent,
            0x4A => Self::TransmitAttempts,
            _ => Self::Reserved(code),
        }
    }
}

/// Decoded interrupt vector (C1VEC)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InterruptVector {
    pub code: InterruptCode,
    /// Filter which matched the last received message
    pub filter_hit: u8,
    /// Highest priority pending TX interrupt
    pub tx_code: InterruptCode,
    /// Highest priority pending RX interrupt
    pub rx_code: InterruptCode,
}

impl<B, CS, CLK> Controller<B, CS, CLK>
where
    B: Transfer<u8>,
    CS: OutputPin,
    CLK: Clock,
{
    /// Pending module events
    pub fn module_events(&mut self) -> Result<ModuleEvents, BusError<B::Error, CS::Error>> {
        let flags = self.read_half_word(REGISTER_C1INT)?;

        Ok(ModuleEvents::from_bits_truncate(flags))
    }

    /// Enables the given module interrupts, others stay untouched
    pub fn enable_events(&mut self, events: ModuleEvents) -> Result<(), BusError<B::Error, CS::Error>> {
        let enabled = self.enabled_events()?;

        self.write_half_word(REGISTER_C1INT + 2, (enabled | events).bits())
    }

    /// Disables the given module interrupts, others stay untouched
    pub fn disable_events(&mut self, events: ModuleEvents) -> Result<(), BusError<B::Error, CS::Error>> {
        let enabled = self.enabled_events()?;

        self.write_half_word(REGISTER_C1INT + 2, (enabled - events).bits())
    }

    /// Clears the given module event flags. Writing 0 clears a flag, writing 1 keeps it.
    pub fn clear_events(&mut self, events: ModuleEvents) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_half_word(REGISTER_C1INT, (ModuleEvents::all() - events).bits())
    }

    /// Currently enabled module interrupts
    pub fn enabled_events(&mut self) -> Result<ModuleEvents, BusError<B::Error, CS::Error>> {
        let enabled = self.read_half_word(REGISTER_C1INT + 2)?;

        Ok(ModuleEvents::from_bits_truncate(enabled))
    }

    /// Reads and decodes the interrupt vector
    pub fn read_interrupt_vector(&mut self) -> Result<InterruptVector, BusError<B::Error, CS::Error>> {
        let register = C1VEC::from(self.read_word(REGISTER_C1VEC)?);

        Ok(InterruptVector {
            code: InterruptCode::from_register(register.icode()),
            filter_hit: register.filhit(),
            tx_code: InterruptCode::from_register(register.txcode()),
            rx_code: InterruptCode::from_register(register.rxcode()),
        })
    }

    /// Bitmask of RX FIFOs with pending interrupt (bit n = channel n)
    pub fn receive_pending_channels(&mut self) -> Result<u32, BusError<B::Error, CS::Error>> {
        self.read_word(REGISTER_C1RXIF)
    }

    /// Bitmask of TX FIFOs with pending interrupt (bit n = channel n)
    pub fn transmit_pending_channels(&mut self) -> Result<u32, BusError<B::Error, CS::Error>> {
        self.read_word(REGISTER_C1TXIF)
    }

    /// Reads transmit/receive error counters and error state
    pub fn get_error_counters(&mut self) -> Result<ErrorCounters, BusError<B::Error, CS::Error>> {
        let register = self.read_word(REGISTER_C1TREC)?;

        Ok(ErrorCounters::from_register(register))
    }

    /// Reads both bus diagnostic registers
    pub fn get_bus_diagnostics(&mut self) -> Result<BusDiagnostics, BusError<B::Error, CS::Error>> {
        let bdiag0 = self.read_word(REGISTER_C1BDIAG0)?;
        let bdiag1 = self.read_word(REGISTER_C1BDIAG1)?;

        Ok(BusDiagnostics::from_registers(bdiag0, bdiag1))
    }

    /// Resets all bus diagnostic counters and flags
    pub fn clear_bus_diagnostics(&mut self) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_word(REGISTER_C1BDIAG0, 0)?;
        self.write_word(REGISTER_C1BDIAG1, 0)
    }
}
