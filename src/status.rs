use bitflags::bitflags;
use serde::{Deserialize, Serialize};

///  Operation status read from C1CON register
#[derive(Copy, Clone, Debug)]
pub struct OperationStatus {
    /// Current operation mode
    pub mode: OperationMode,

    /// True if TXQ is enabled an reserves space in RAM
    pub txq_reserved: bool,

    /// True if transmitted messages are stored in TEF and RAM space is reserved
    pub store_transmit_event: bool,

    /// True => Transition to listen-only mode on system error bit
    /// False => Transition to restricted-operation mode on system error bit
    pub error_trans_listen_only_mode: bool,

    /// True => ESI is transmitted recessive when ESI of message is high or CAN controller error passive
    /// False => ESI reflects error stratus of CAN controller
    pub transmit_esi_gateway: bool,

    /// True => Restricted retransmission attempts. TXAT is used
    /// False => Unlimited number of retransmission attempts, TXAT will be ignored
    pub restrict_retransmission: bool,
}

impl OperationStatus {
    pub(crate) fn from_register(register: u8) -> Self {
        Self {
            mode: OperationMode::from_register(register),
            txq_reserved: register & (1 << 4) != 0,
            store_transmit_event: register & (1 << 3) != 0,
            error_trans_listen_only_mode: register & (1 << 2) != 0,
            transmit_esi_gateway: register & (1 << 1) != 0,
            restrict_retransmission: register & 1 != 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationMode {
    /// Module is in normal CAN FD mode, supports mixing of CAN FD and classic CAN 2.0 frames
    NormalCANFD = 0b000,
    /// Module is in sleep mode
    Sleep = 0b001,
    /// Module is in internal loopback mode
    InternalLoopback = 0b010,
    /// Module is in listen-only mode
    ListenOnly = 0b011,
    /// Module is in configuration mode
    Configuration = 0b100,
    /// Module is in external loopback mode
    ExternalLoopback = 0b101,
    /// Module is in normal CAN 2.0 mode, possible error frames on CAN FD frames
    NormalCAN2_0 = 0b110,
    /// Module is in restricted operation mode
    RestrictedOperation = 0b111,
}

impl Default for OperationMode {
    fn default() -> Self {
        Self::NormalCANFD
    }
}

impl OperationMode {
    /// Decodes the OPMOD field (bits 7-5) of the third C1CON byte
    pub(crate) fn from_register(register: u8) -> Self {
        match register >> 5 {
            0b000 => Self::NormalCANFD,
            0b001 => Self::Sleep,
            0b010 => Self::InternalLoopback,
            0b011 => Self::ListenOnly,
            0b100 => Self::Configuration,
            0b101 => Self::ExternalLoopback,
            0b110 => Self::NormalCAN2_0,
            _ => Self::RestrictedOperation,
        }
    }
}

impl TryFrom<u8> for OperationMode {
    type Error = u8;

    /// Maps a raw 3-bit mode value, values above 7 are rejected
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > 0b111 {
            return Err(value);
        }

        Ok(Self::from_register(value << 5))
    }
}

/// Oscillator status read from second OSC register byte
#[derive(Copy, Clone, Debug)]
pub struct OscillatorStatus {
    /// Synchronized SCLKDIV bit
    pub sclk_ready: bool,

    /// Clock (oscillator) is running and stable
    pub clock_ready: bool,

    /// PLL is locked
    pub pll_ready: bool,
}

impl OscillatorStatus {
    pub(crate) fn from_register(register: u8) -> Self {
        Self {
            sclk_ready: register & (1 << 4) != 0,
            clock_ready: register & (1 << 2) != 0,
            pll_ready: register & 1 != 0,
        }
    }
}

/// Content of the device ID register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeviceId {
    /// Device ID
    pub id: u8,
    /// Silicon revision
    pub revision: u8,
}

bitflags! {
    /// Status of a transmit FIFO
    pub struct TxChannelStatus: u16 {
        const NOT_FULL = 0x0001;
        const HALF_FULL = 0x0002;
        const EMPTY = 0x0004;
        const ATTEMPTS_EXHAUSTED = 0x0010;
        const ERROR = 0x0020;
        const ARBITRATION_LOST = 0x0040;
        const ABORTED = 0x0080;
        /// Not part of the status register, mirrors TXREQ of the FIFO control register
        const TRANSMITTING = 0x0400;
    }
}

bitflags! {
    /// Status of a receive FIFO
    pub struct RxChannelStatus: u8 {
        const NOT_EMPTY = 0x01;
        const HALF_FULL = 0x02;
        const FULL = 0x04;
        const OVERFLOW = 0x08;
    }
}

bitflags! {
    /// Status of the Transmit Event FIFO
    pub struct TefStatus: u8 {
        const NOT_EMPTY = 0x01;
        const HALF_FULL = 0x02;
        const FULL = 0x04;
        const OVERFLOW = 0x08;
    }
}
