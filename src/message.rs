//!# CAN Message
//! This library supports both CAN2.0 (up to 8 data bytes per CAN Frame)
//! and CAN FD (up to 64 data bytes per CAN frame)
//! formats with both standard and extended frame ID formats
//!
//! ## CAN 2.0 message construction example
//! ```
//!# use bytes::Bytes;
//!# use mcp25xxfd::message::TxMessage;
//!# use embedded_can::{Id,StandardId};
//!#
//! // Frame ID
//! let message_id = Id::Standard(StandardId::new(0x123).unwrap());
//! // Create payload buffer of 3 data bytes. DLC determined by length of payload buffer.
//! let payload = Bytes::copy_from_slice(&[0x1, 0x2, 0x3]);
//! // Create message object
//! let tx_message = TxMessage::new(message_id, payload, false, false).unwrap();
//! assert_eq!(3, tx_message.length());
//!```
//! ## CAN FD message construction example
//! ```
//!# use bytes::Bytes;
//!# use mcp25xxfd::message::{TxMessage, DLC};
//!# use embedded_can::{Id,StandardId};
//!#
//! let message_id = Id::Standard(StandardId::new(0x123).unwrap());
//! // Create payload buffer with 22 data bytes (here DLC will be 24 because 22 is not a supported DLC code)
//! let payload = Bytes::copy_from_slice(&[0u8; 22]);
//! // CAN FD frame with bit rate switch enabled
//! let tx_message = TxMessage::new(message_id, payload, true, true).unwrap().with_sequence(7);
//! assert_eq!(DLC::TwentyFour, tx_message.dlc());
//! ```

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::Bytes;
use embedded_can::{ExtendedId, Id, StandardId};
use log::debug;
use modular_bitfield_msb::prelude::*;

pub const STANDARD_IDENTIFIER_MASK: u16 = 0x7FF;

pub const EXTENDED_IDENTIFIER_MASK: u32 = 0x3FFFF;

pub const MAX_PAYLOAD_CAN_2_0: usize = 8;

pub const MAX_PAYLOAD_CAN_FD: usize = 64;

/// Size of the message object header (ID word + control word)
pub const HEADER_SIZE: usize = 8;

/// Size of the optional time stamp word
pub const TIMESTAMP_SIZE: usize = 4;

/// Largest message object: header, time stamp and 64 data bytes
pub const MAX_MESSAGE_OBJECT_SIZE: usize = HEADER_SIZE + TIMESTAMP_SIZE + MAX_PAYLOAD_CAN_FD;

/// Maximum value of the TX sequence field (23 bits on Rev B silicon)
pub const SEQUENCE_MASK: u32 = 0x7F_FFFF;

/// Data length code
#[derive(BitfieldSpecifier, Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
#[allow(clippy::upper_case_acronyms)]
#[bits = 4]
pub enum DLC {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Twelve,
    Sixteen,
    Twenty,
    TwentyFour,
    ThirtyTwo,
    FortyEight,
    SixtyFour,
}

/// Possible errors when creating a [TxMessage] object
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum DLCError {
    /// Payload length invalid
    InvalidLength(usize),
}

impl DLC {
    /// Maps an exact payload length to its DLC
    pub fn from_length(value: usize) -> Result<Self, DLCError> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            12 => Ok(Self::Twelve),
            16 => Ok(Self::Sixteen),
            20 => Ok(Self::Twenty),
            24 => Ok(Self::TwentyFour),
            32 => Ok(Self::ThirtyTwo),
            48 => Ok(Self::FortyEight),
            64 => Ok(Self::SixtyFour),
            val => Err(DLCError::InvalidLength(val)),
        }
    }

    /// Number of data bytes encoded by this DLC
    pub fn bytes(&self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Twelve => 12,
            Self::Sixteen => 16,
            Self::Twenty => 20,
            Self::TwentyFour => 24,
            Self::ThirtyTwo => 32,
            Self::FortyEight => 48,
            Self::SixtyFour => 64,
        }
    }
}

/// Returns the number of data bytes of the given DLC
pub fn dlc_to_bytes(dlc: DLC) -> usize {
    dlc.bytes()
}

/// Returns the smallest DLC able to carry `length` bytes
pub fn bytes_to_dlc(length: usize) -> Result<DLC, DLCError> {
    if length > MAX_PAYLOAD_CAN_FD {
        return Err(DLCError::InvalidLength(length));
    }

    let mut payload_length = length;

    // length used to choose the next supported DLC
    while let Err(DLCError::InvalidLength(_)) = DLC::from_length(payload_length) {
        payload_length += 1;
    }

    DLC::from_length(payload_length)
}

/// Transmit message object header, also used for Transmit Event FIFO objects
#[bitfield(bits = 64)]
#[derive(BitfieldSpecifier, Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Default)]
pub struct TxHeader {
    // T0
    #[skip]
    __: B2,
    /// standard ID in FD mode can be extended to 12 bits if sid11 is set
    pub sid11: bool,
    /// 18 lsb of extended ID
    pub extended_identifier: B18,
    /// standard ID bits or msb 11 bits of extended ID
    pub standard_identifier: B11,
    // T1
    /// Sequence keeping track of transmitted messages in Transmit Event FIFO
    pub sequence: B23,
    /// In normal ESI mode, set if node is error passive, cleared if node is error active
    pub error_status_indicator: bool,
    /// Bit distinguishing between CAN and CAN FD formats
    pub fd_frame: bool,
    /// Enables bit rate switching in CAN FD frames
    pub bit_rate_switch: bool,
    /// Set if the frame is a RTR frame
    pub remote_transmission_request: bool,
    /// Set if extended ID is used
    pub identifier_extension_flag: bool,
    /// 4 bits identifying the payload length
    pub data_length_code: DLC,
}

impl TxHeader {
    /// Returns the identifier encoded in the header
    pub fn id(&self) -> Id {
        join_id(
            self.standard_identifier(),
            self.extended_identifier(),
            self.identifier_extension_flag(),
        )
    }

    /// Header bytes in wire order (two little endian words)
    pub(crate) fn to_wire(self) -> [u8; HEADER_SIZE] {
        swap_word_order(self.into_bytes())
    }

    pub(crate) fn from_wire(data: &[u8]) -> Self {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&data[..HEADER_SIZE]);

        Self::from_bytes(swap_word_order(bytes))
    }
}

/// Receive message object header
#[bitfield(bits = 64)]
#[derive(Default, PartialEq, Eq, Debug, Copy, Clone)]
#[repr(u64)]
pub struct RxHeader {
    // R0
    #[skip]
    __: B2,
    /// In FD mode the standard ID can be extended to 12 bit using r1
    pub sid11: bool,
    /// Extended Identifier
    pub extended_identifier: B18,
    /// Standard Identifier
    pub standard_identifier: B11,
    #[skip]
    __: B16,
    /// Filter Hit, number of filter that matched
    pub filter_hit: B5,
    #[skip]
    __: B2,
    /// Error Status Indicator
    pub error_status_indicator: bool,
    /// FD Frame; distinguishes between CAN and CAN FD formats
    pub fd_frame: bool,
    /// Bit Rate Switch; indicates if data bit rate was switched
    pub bit_rate_switch: bool,
    /// Remote Transmission Request; not used in CAN FD
    pub remote_transmission_request: bool,
    /// Identifier Extension Flag; distinguishes between base and extended format
    pub identifier_extension_flag: bool,
    /// Data Length Code
    pub data_length_code: DLC,
}

impl RxHeader {
    /// Returns the identifier encoded in the header
    pub fn id(&self) -> Id {
        join_id(
            self.standard_identifier(),
            self.extended_identifier(),
            self.identifier_extension_flag(),
        )
    }

    /// Header bytes in wire order (two little endian words)
    pub(crate) fn to_wire(self) -> [u8; HEADER_SIZE] {
        swap_word_order(self.into_bytes())
    }

    pub(crate) fn from_wire(data: &[u8]) -> Self {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&data[..HEADER_SIZE]);

        Self::from_bytes(swap_word_order(bytes))
    }

    #[cfg(test)]
    pub fn new_test_cfg(identifier: Id, dlc: DLC) -> Self {
        let (sid, eid, ide) = split_id(identifier);

        Self::new()
            .with_data_length_code(dlc)
            .with_standard_identifier(sid)
            .with_extended_identifier(eid)
            .with_identifier_extension_flag(ide)
    }
}

/// Transmit Message Object
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxMessage {
    /// first 2 words of Transmit Message Object
    pub(crate) header: TxHeader,
    /// Payload bytes of Message Object
    pub(crate) buff: Bytes,
    /// Number of bytes encoded by the DLC
    pub(crate) length: usize,
}

impl TxMessage {
    /// Create new CAN message. DLC is rounded up to the next code able to carry the payload.
    pub fn new(identifier: Id, data: impl Into<Bytes>, can_fd: bool, bitrate_switch: bool) -> Result<Self, DLCError> {
        let data: Bytes = data.into();
        let payload_length = data.len();

        if !can_fd && payload_length > MAX_PAYLOAD_CAN_2_0 {
            debug!("Maximum of 8 data bytes allowed for CAN2.0 frame. Current size: {payload_length}");
            return Err(DLCError::InvalidLength(payload_length));
        }

        if payload_length > MAX_PAYLOAD_CAN_FD {
            debug!("Maximum of 64 data bytes allowed for CAN FD frame. Current size: {payload_length}");
            return Err(DLCError::InvalidLength(payload_length));
        }

        let dlc = bytes_to_dlc(payload_length)?;

        let (sid, eid, ide) = split_id(identifier);
        let mut header = TxHeader::new();
        header.set_standard_identifier(sid);
        header.set_extended_identifier(eid);
        header.set_identifier_extension_flag(ide);
        header.set_data_length_code(dlc);
        header.set_fd_frame(can_fd);
        header.set_bit_rate_switch(can_fd && bitrate_switch);

        Ok(TxMessage {
            header,
            buff: data,
            length: dlc.bytes(),
        })
    }

    /// Overrides the DLC. Loading fails if the DLC encodes less bytes than the payload.
    pub fn with_dlc(mut self, dlc: DLC) -> Self {
        self.header.set_data_length_code(dlc);
        self.length = dlc.bytes();
        self
    }

    /// Sets the sequence echoed in the Transmit Event FIFO
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.header.set_sequence(sequence & SEQUENCE_MASK);
        self
    }

    /// Marks the message as remote frame
    pub fn with_remote_transmission_request(mut self, rtr: bool) -> Self {
        self.header.set_remote_transmission_request(rtr);
        self
    }

    /// Sets the error status indicator (only effective in ESI gateway mode)
    pub fn with_error_status_indicator(mut self, esi: bool) -> Self {
        self.header.set_error_status_indicator(esi);
        self
    }

    /// Returns payload as a `&[u8]`
    pub fn get_payload(&self) -> &[u8] {
        self.buff.as_ref()
    }

    /// Returns Header register of Transmit Message Object
    pub fn get_header(&self) -> &TxHeader {
        &self.header
    }

    /// Data length code of the message
    pub fn dlc(&self) -> DLC {
        self.header.data_length_code()
    }

    /// Number of bytes encoded by the DLC
    pub fn length(&self) -> usize {
        self.length
    }

    /// Serializes header and payload into `buffer`, padding the payload with zeros
    /// to the next 4 byte boundary. Returns the number of bytes of the message object.
    pub(crate) fn write_object(&self, header: TxHeader, buffer: &mut [u8]) -> usize {
        let payload = self.get_payload();
        let object_length = HEADER_SIZE + padded_length(payload.len());

        buffer[..HEADER_SIZE].copy_from_slice(&header.to_wire());
        buffer[HEADER_SIZE..HEADER_SIZE + payload.len()].copy_from_slice(payload);
        buffer[HEADER_SIZE + payload.len()..object_length].fill(0);

        object_length
    }
}

/// Receive Message Object
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RxMessage {
    pub(crate) header: RxHeader,
    pub(crate) timestamp: Option<u32>,
    pub(crate) buff: Bytes,
}

impl RxMessage {
    pub fn id(&self) -> Id {
        self.header.id()
    }

    pub fn dlc(&self) -> DLC {
        self.header.data_length_code()
    }

    /// Received data bytes, limited to the DLC and the requested maximum
    pub fn get_payload(&self) -> &[u8] {
        self.buff.as_ref()
    }

    pub fn get_header(&self) -> &RxHeader {
        &self.header
    }

    /// Time stamp, if enabled for the RX FIFO
    pub fn timestamp(&self) -> Option<u32> {
        self.timestamp
    }

    /// Index of the filter which accepted the message
    pub fn filter_hit(&self) -> u8 {
        self.header.filter_hit()
    }

    pub fn is_fd_frame(&self) -> bool {
        self.header.fd_frame()
    }

    pub fn is_remote_frame(&self) -> bool {
        self.header.remote_transmission_request()
    }
}

/// Transmit Event FIFO object
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TefMessage {
    pub(crate) header: TxHeader,
    pub(crate) timestamp: Option<u32>,
}

impl TefMessage {
    pub fn id(&self) -> Id {
        self.header.id()
    }

    /// Sequence given to the transmitted message
    pub fn sequence(&self) -> u32 {
        self.header.sequence()
    }

    pub fn dlc(&self) -> DLC {
        self.header.data_length_code()
    }

    pub fn get_header(&self) -> &TxHeader {
        &self.header
    }

    pub fn timestamp(&self) -> Option<u32> {
        self.timestamp
    }
}

/// Rounds length up to the next multiple of 4
pub(crate) fn padded_length(length: usize) -> usize {
    (length + 3) & !3
}

/// Bitfield bytes are big endian per word, the device expects little endian words
fn swap_word_order(mut bytes: [u8; HEADER_SIZE]) -> [u8; HEADER_SIZE] {
    for word in bytes.chunks_exact_mut(4) {
        let num = BigEndian::read_u32(word);
        LittleEndian::write_u32(word, num);
    }

    bytes
}

/// Splits identifier into SID, EID and IDE bit
pub(crate) fn split_id(identifier: Id) -> (u16, u32, bool) {
    match identifier {
        Id::Standard(sid) => (sid.as_raw(), 0, false),
        Id::Extended(eid) => (
            (eid.as_raw() >> 18) as u16 & STANDARD_IDENTIFIER_MASK,
            eid.as_raw() & EXTENDED_IDENTIFIER_MASK,
            true,
        ),
    }
}

fn join_id(sid: u16, eid: u32, ide: bool) -> Id {
    if ide {
        let id = ((sid as u32) << 18) | eid;
        Id::Extended(ExtendedId::new(id).unwrap_or(ExtendedId::ZERO))
    } else {
        Id::Standard(StandardId::new(sid).unwrap_or(StandardId::ZERO))
    }
}
