use crate::registers::{FifoControl, TefControl};
use crate::status::OperationMode;
use crate::timing::BitRateConfig;
use serde::{Deserialize, Serialize};

/// Entire configuration applied by [Controller::configure](crate::can::Controller::configure)
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct Configuration {
    pub clock: ClockConfiguration,

    /// Nominal and data bit rate
    pub bit_rate: BitRateConfig,

    /// Enables ECC of the message RAM
    pub ecc: bool,

    /// Transmit queue (channel 0), requires silicon with TXQ
    pub tx_queue: Option<TxFifoConfiguration>,

    /// Transmit event FIFO, disabled if None
    pub tef: Option<TefConfiguration>,

    /// Limit retransmission attempts to TXAT of the FIFOs
    pub restrict_retransmission: bool,

    /// Mode requested at the end of the configuration
    pub mode: OperationMode,
}

/// Silicon revision
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Revision {
    A,
    B,
}

/// Features of the controller silicon, consulted at runtime
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Silicon {
    pub revision: Revision,

    /// Channel 0 is the hardware transmit queue
    pub tx_queue: bool,

    /// FIFO user address registers report word offsets
    pub user_address_times_four: bool,
}

impl Silicon {
    pub const fn mcp2517fd_rev_a() -> Self {
        Self {
            revision: Revision::A,
            tx_queue: false,
            user_address_times_four: true,
        }
    }

    pub const fn mcp2518fd() -> Self {
        Self {
            revision: Revision::B,
            tx_queue: true,
            user_address_times_four: false,
        }
    }

    pub const fn mcp251863() -> Self {
        Self::mcp2518fd()
    }

    /// Mask of the TX sequence field (7 bits on Rev A)
    pub fn sequence_mask(&self) -> u32 {
        match self.revision {
            Revision::A => 0x7F,
            Revision::B => crate::message::SEQUENCE_MASK,
        }
    }
}

impl Default for Silicon {
    fn default() -> Self {
        Self::mcp2518fd()
    }
}

/// Oscillator/Clock configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockConfiguration {
    /// Divisor for clock output
    pub clock_output: ClockOutputDivisor,

    /// Divisor for system clock
    pub system_clock: SystemClockDivisor,

    /// Disable clock/oscillator?
    pub disable_clock: bool,

    /// PLL configuration
    pub pll: PLLSetting,
}

impl ClockConfiguration {
    /// Maps register values to configuration
    pub(crate) fn from_register(register: u8) -> Self {
        Self {
            clock_output: ClockOutputDivisor::from_register(register),
            system_clock: SystemClockDivisor::from_register(register),
            disable_clock: register & (1 << 2) != 0,
            pll: PLLSetting::from_register(register),
        }
    }

    /// Encodes the configuration to register byte
    pub(crate) fn as_register(&self) -> u8 {
        let mut register = 0x0;

        register |= (self.clock_output as u8) << 5;
        register |= (self.system_clock as u8) << 4;
        register |= (self.disable_clock as u8) << 2;
        register |= self.pll as u8;

        register
    }
}

/// Divisor for clock output
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ClockOutputDivisor {
    DivideBy10 = 0b11,
    DivideBy4 = 0b10,
    DivideBy2 = 0b01,
    DivideBy1 = 0b00,
}

impl Default for ClockOutputDivisor {
    fn default() -> Self {
        Self::DivideBy1
    }
}

impl ClockOutputDivisor {
    pub(crate) fn from_register(register: u8) -> Self {
        match (register >> 5) & 0b11 {
            0b11 => Self::DivideBy10,
            0b10 => Self::DivideBy4,
            0b01 => Self::DivideBy2,
            _ => Self::DivideBy1,
        }
    }
}

/// Divisor for system clock
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SystemClockDivisor {
    DivideBy2 = 0b1,
    DivideBy1 = 0b0,
}

impl Default for SystemClockDivisor {
    fn default() -> Self {
        Self::DivideBy1
    }
}

impl SystemClockDivisor {
    pub(crate) fn from_register(register: u8) -> Self {
        if register & (1 << 4) != 0 {
            Self::DivideBy2
        } else {
            Self::DivideBy1
        }
    }
}

/// PLL configuration
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PLLSetting {
    /// System clock from 10x PLL
    TenTimesPLL = 0b1,
    /// System clock comes directly from XTAL oscillator
    DirectXTALOscillator = 0b0,
}

impl Default for PLLSetting {
    fn default() -> Self {
        Self::DirectXTALOscillator
    }
}

impl PLLSetting {
    pub(crate) fn from_register(register: u8) -> Self {
        if register & 1 != 0 {
            Self::TenTimesPLL
        } else {
            Self::DirectXTALOscillator
        }
    }
}

/// Payload width of a FIFO slot
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadSize {
    EightBytes = 0b000,
    TwelveBytes = 0b001,
    SixteenBytes = 0b010,
    TwentyBytes = 0b011,
    TwentyFourBytes = 0b100,
    ThirtyTwoBytes = 0b101,
    FortyEightBytes = 0b110,
    SixtyFourBytes = 0b111,
}

impl Default for PayloadSize {
    fn default() -> Self {
        Self::EightBytes
    }
}

impl PayloadSize {
    /// Number of data bytes per slot
    pub fn bytes(&self) -> usize {
        match self {
            Self::EightBytes => 8,
            Self::TwelveBytes => 12,
            Self::SixteenBytes => 16,
            Self::TwentyBytes => 20,
            Self::TwentyFourBytes => 24,
            Self::ThirtyTwoBytes => 32,
            Self::FortyEightBytes => 48,
            Self::SixtyFourBytes => 64,
        }
    }

    pub(crate) fn from_register(register: u8) -> Self {
        match register & 0b111 {
            0b000 => Self::EightBytes,
            0b001 => Self::TwelveBytes,
            0b010 => Self::SixteenBytes,
            0b011 => Self::TwentyBytes,
            0b100 => Self::TwentyFourBytes,
            0b101 => Self::ThirtyTwoBytes,
            0b110 => Self::FortyEightBytes,
            _ => Self::SixtyFourBytes,
        }
    }
}

/// Retransmission attempts of a TX FIFO, only used if retransmission is restricted
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetransmissionAttempts {
    Disabled = 0b00,
    Three = 0b01,
    Unlimited = 0b11,
}

impl Default for RetransmissionAttempts {
    fn default() -> Self {
        Self::Unlimited
    }
}

/// Configuration of a transmit FIFO or of the transmit queue
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxFifoConfiguration {
    /// Number of message slots (1-32)
    pub size: u8,

    pub payload_size: PayloadSize,

    /// Message transmit priority (0-31), higher value is sent first
    pub priority: u8,

    pub attempts: RetransmissionAttempts,

    /// Auto remote frame response
    pub rtr_enable: bool,
}

impl Default for TxFifoConfiguration {
    fn default() -> Self {
        Self {
            size: 1,
            payload_size: PayloadSize::default(),
            priority: 0,
            attempts: RetransmissionAttempts::default(),
            rtr_enable: false,
        }
    }
}

impl TxFifoConfiguration {
    pub(crate) fn as_register(&self) -> FifoControl {
        FifoControl::new()
            .with_plsize(self.payload_size as u8)
            .with_fifo_size(self.size)
            .with_txat(self.attempts as u8)
            .with_txpri(self.priority & 0x1F)
            .with_txen(true)
            .with_rtren(self.rtr_enable)
    }
}

/// Configuration of a receive FIFO
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxFifoConfiguration {
    /// Number of message slots (1-32)
    pub size: u8,

    pub payload_size: PayloadSize,

    /// Capture a time stamp for every received message
    pub timestamp: bool,

    /// Raise the FIFO interrupt if not empty
    pub not_empty_interrupt: bool,

    /// Raise the FIFO interrupt on overflow
    pub overflow_interrupt: bool,
}

impl Default for RxFifoConfiguration {
    fn default() -> Self {
        Self {
            size: 1,
            payload_size: PayloadSize::default(),
            timestamp: false,
            not_empty_interrupt: false,
            overflow_interrupt: false,
        }
    }
}

impl RxFifoConfiguration {
    pub(crate) fn as_register(&self) -> FifoControl {
        FifoControl::new()
            .with_plsize(self.payload_size as u8)
            .with_fifo_size(self.size)
            .with_txen(false)
            .with_rxtsen(self.timestamp)
            .with_rxovie(self.overflow_interrupt)
            .with_tfnrfnie(self.not_empty_interrupt)
    }
}

/// Configuration of the transmit event FIFO
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TefConfiguration {
    /// Number of event slots (1-32)
    pub size: u8,

    /// Capture a time stamp for every event
    pub timestamp: bool,

    /// Raise the TEF interrupt if not empty
    pub not_empty_interrupt: bool,
}

impl Default for TefConfiguration {
    fn default() -> Self {
        Self {
            size: 8,
            timestamp: false,
            not_empty_interrupt: false,
        }
    }
}

impl TefConfiguration {
    pub(crate) fn as_register(&self) -> TefControl {
        TefControl::new()
            .with_fifo_size(self.size)
            .with_teftsen(self.timestamp)
            .with_tefneie(self.not_empty_interrupt)
    }
}
