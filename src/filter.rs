//!# CAN Filter
//! The [Filter] object is used to create a CAN filter. The controller has 32 filter/mask registers.
//! Lower index of the filter means higher priority (highest priority =0, lowest priority = 31).
//! Received messages matching a filter are stored in the RX FIFO linked to the filter.
//!
//! ```
//!# use mcp25xxfd::filter::Filter;
//!# use embedded_can::{Id,ExtendedId};
//!
//! // ID to match
//! let id = Id::Extended(ExtendedId::new(0xC672).unwrap());
//! // Create filter with index 2
//! let mut filter = Filter::new(id, 2).unwrap();
//! // Set mask MSB bits, so that only the MSB of the message ID needs to match the filter
//! filter.set_mask_extended_id(0xFF00);
//! // Ignore standard frames
//! filter.match_extended_only();
//! ```
use crate::can::{
    filter_control_register_byte, filter_mask_register, filter_object_register, BusError, Controller,
};
use crate::message::split_id;
use crate::message::{EXTENDED_IDENTIFIER_MASK, STANDARD_IDENTIFIER_MASK};
use crate::registers::{FilterControlReg, FilterMaskReg, FilterObjectReg};
use embedded_can::Id;
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::Clock;

/// Highest filter index
pub const MAX_FILTER_INDEX: u8 = 31;

/// Struct representing a filter object
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    /// filter & mask index
    pub(crate) index: u8,
    /// mask register bitfield
    pub(crate) mask_bits: FilterMaskReg,
    /// filter register bitfield
    pub(crate) filter_bits: FilterObjectReg,
}

impl Filter {
    /// Create new filter from [embedded_can::Id] and index, no mask
    pub fn new(identifier: Id, index: u8) -> Option<Self> {
        if index > MAX_FILTER_INDEX {
            return None;
        }

        let mut filter = Self {
            index,
            ..Self::default()
        };
        filter.set_id(identifier);

        Some(filter)
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    /// Set mask for extended Id (29 bits)
    pub fn set_mask_extended_id(&mut self, mask: u32) {
        self.mask_bits.set_meid(mask & EXTENDED_IDENTIFIER_MASK);
        self.mask_bits
            .set_msid((mask >> 18) as u16 & STANDARD_IDENTIFIER_MASK);
    }

    /// Set mask for standard Id (11 bits)
    pub fn set_mask_standard_id(&mut self, mask: u16) {
        self.mask_bits.set_msid(mask & STANDARD_IDENTIFIER_MASK);
    }

    /// Set filter and mask so that only messages with Standard Id match
    pub fn match_standard_only(&mut self) {
        self.mask_bits.set_mide(true);
        self.filter_bits.set_exide(false);
    }

    /// Set filter and mask so that only messages with Extended Id match
    pub fn match_extended_only(&mut self) {
        self.mask_bits.set_mide(true);
        self.filter_bits.set_exide(true);
    }

    /// Filter object register value
    pub fn filter_value(&self) -> u32 {
        u32::from(self.filter_bits)
    }

    /// Mask register value
    pub fn mask_value(&self) -> u32 {
        u32::from(self.mask_bits)
    }

    fn set_id(&mut self, identifier: Id) {
        let (sid, eid, _) = split_id(identifier);

        self.filter_bits.set_sid(sid);
        self.filter_bits.set_eid(eid);
    }
}

impl<B, CS, CLK> Controller<B, CS, CLK>
where
    B: Transfer<u8>,
    CS: OutputPin,
    CLK: Clock,
{
    /// Writes the filter object register
    pub fn configure_filter(&mut self, filter_index: u8, value: u32) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_word(filter_object_register(filter_index), value)
    }

    /// Writes the mask register
    pub fn configure_mask(&mut self, filter_index: u8, value: u32) -> Result<(), BusError<B::Error, CS::Error>> {
        self.write_word(filter_mask_register(filter_index), value)
    }

    /// Links the filter to the given RX FIFO
    pub fn link_filter_to_channel(
        &mut self,
        filter_index: u8,
        channel: u8,
        enable: bool,
    ) -> Result<(), BusError<B::Error, CS::Error>> {
        let register = FilterControlReg::new().with_flten(enable).with_fbp(channel & 0x1F);

        self.write_byte(filter_control_register_byte(filter_index), u8::from(register))
    }

    /// Enables the filter, keeps the linked FIFO
    pub fn enable_filter(&mut self, filter_index: u8) -> Result<(), BusError<B::Error, CS::Error>> {
        self.update_filter_enable(filter_index, true)
    }

    /// Disables the filter, keeps the linked FIFO
    pub fn disable_filter(&mut self, filter_index: u8) -> Result<(), BusError<B::Error, CS::Error>> {
        self.update_filter_enable(filter_index, false)
    }

    fn update_filter_enable(&mut self, filter_index: u8, enable: bool) -> Result<(), BusError<B::Error, CS::Error>> {
        let address = filter_control_register_byte(filter_index);
        let register = FilterControlReg::from(self.read_byte(address)?).with_flten(enable);

        self.write_byte(address, u8::from(register))
    }
}
