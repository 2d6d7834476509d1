#![allow(unused_braces)]
use modular_bitfield_msb::prelude::*;

#[bitfield]
#[derive(Default, Debug, Copy, Clone)]
#[repr(u32)]
/// FIFO Control register (C1FIFOCONm, C1TXQCON for channel 0)
pub struct FifoControl {
    /// Payload size bits
    pub plsize: B3,
    fsize: B5,
    #[skip]
    __: B1,
    /// Retransmission attempts bits
    pub txat: B2,
    /// Message transmit priority bits
    pub txpri: B5,
    #[skip]
    __: B5,
    /// FIFO Reset bit
    pub freset: bool,
    /// Message Send Request bit
    pub txreq: bool,
    /// Increment FIFO Head/Tail bit
    pub uinc: bool,
    /// TX/RX FIFO Selection bit
    pub txen: bool,
    /// Auto RTR Enable bit
    pub rtren: bool,
    /// Received Message Time Stamp Enable bit
    pub rxtsen: bool,
    /// Transmit Attempts Exhausted Interrupt Enable bit
    pub txatie: bool,
    /// Overflow Interrupt Enable bit
    pub rxovie: bool,
    /// Transmit/Receive FIFO Empty/Full Interrupt Enable bit
    pub tferffie: bool,
    /// Transmit/Receive FIFO Half Empty/Half Full Interrupt Enable bit
    pub tfhrfhie: bool,
    /// Transmit/Receive FIFO Not Full/Not Empty Interrupt Enable bit
    pub tfnrfnie: bool,
}

impl FifoControl {
    /// set FIFO size (number of messages 1-32)
    pub fn with_fifo_size(mut self, value: u8) -> Self {
        let size = value.clamp(1, 32);
        self.set_fsize(size - 1);
        self
    }

    /// get FIFO size
    pub fn get_fifo_size(&self) -> u8 {
        self.fsize() + 1
    }
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// Second byte of FIFO Control register
pub struct FifoControlReg1 {
    #[skip]
    __: B5,
    /// FIFO Reset bit
    pub freset: bool,
    /// Message Send Request bit
    pub txreq: bool,
    /// Increment FIFO Head/Tail bit
    pub uinc: bool,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone)]
#[repr(u32)]
/// Transmit Event FIFO Control register (C1TEFCON)
pub struct TefControl {
    #[skip]
    __: B3,
    fsize: B5,
    #[skip]
    __: B13,
    /// FIFO Reset bit
    pub freset: bool,
    #[skip]
    __: B1,
    /// Increment Tail bit
    pub uinc: bool,
    #[skip]
    __: B2,
    /// Transmit Event FIFO Time Stamp Enable bit
    pub teftsen: bool,
    #[skip]
    __: B1,
    /// Transmit Event FIFO Overflow Interrupt Enable bit
    pub tefovie: bool,
    /// Transmit Event FIFO Full Interrupt Enable bit
    pub teffie: bool,
    /// Transmit Event FIFO Half Full Interrupt Enable bit
    pub tefhie: bool,
    /// Transmit Event FIFO Not Empty Interrupt Enable bit
    pub tefneie: bool,
}

impl TefControl {
    /// set TEF size (number of objects 1-32)
    pub fn with_fifo_size(mut self, value: u8) -> Self {
        let size = value.clamp(1, 32);
        self.set_fsize(size - 1);
        self
    }

    /// get TEF size
    pub fn get_fifo_size(&self) -> u8 {
        self.fsize() + 1
    }
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// Fourth byte of CAN Control register
pub struct CanControlReg3 {
    /// Transmit Bandwidth Sharing bits
    pub txbws: B4,
    /// Abort All Pending Transmissions bit
    pub abat: bool,
    /// Request Operation Mode bits
    pub reqop: B3,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
/// Nominal Bit Time Configuration register
pub struct C1NBTCFG {
    /// Baud Rate Prescaler bits
    pub brp: B8,
    /// Time Segment 1 bits (Propagation Segment + Phase Segment 1)
    pub tseg1: B8,
    #[skip]
    __: B1,
    /// Time Segment 2 bits (Phase Segment 2)
    pub tseg2: B7,
    #[skip]
    __: B1,
    /// Synchronization Jump Width bits
    pub sjw: B7,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
/// Data Bit Time Configuration register
pub struct C1DBTCFG {
    /// Baud Rate Prescaler bits
    pub brp: B8,
    #[skip]
    __: B3,
    /// Time Segment 1 bits
    pub tseg1: B5,
    #[skip]
    __: B4,
    /// Time Segment 2 bits
    pub tseg2: B4,
    #[skip]
    __: B4,
    /// Synchronization Jump Width bits
    pub sjw: B4,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
/// Transmitter Delay Compensation register
pub struct C1TDC {
    #[skip]
    __: B6,
    /// Enable Edge Filtering during Bus Integration state bit
    pub edgflten: bool,
    /// Enable 12-Bit SID in CAN FD Base Format Messages bit
    pub sid11en: bool,
    #[skip]
    __: B6,
    /// Transmitter Delay Compensation Mode bits
    pub tdcmod: B2,
    #[skip]
    __: B1,
    /// Transmitter Delay Compensation Offset bits
    pub tdco: B7,
    #[skip]
    __: B2,
    /// Transmitter Delay Compensation Value bits
    pub tdcv: B6,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone)]
#[repr(u32)]
/// Time Stamp Control register
pub struct C1TSCON {
    #[skip]
    __: B13,
    /// Time Stamp res bit (FD frames only)
    pub tsres: bool,
    /// Time Stamp EOF bit
    pub tseof: bool,
    /// Time Base Counter Enable bit
    pub tbcen: bool,
    #[skip]
    __: B6,
    /// Time Base Counter Prescaler bits
    pub tbcpre: B10,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
/// Filter object register
pub struct FilterObjectReg {
    #[skip]
    __: B1,
    /// Extended Identifier Enable bit
    pub exide: bool,
    /// Standard Identifier filter bit 11 (FD mode)
    pub sid11: bool,
    /// Extended Identifier filter bits
    pub eid: B18,
    /// Standard Identifier filter bits
    pub sid: B11,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
/// Filter mask register
pub struct FilterMaskReg {
    #[skip]
    __: B1,
    /// Identifier Receive mode bit
    pub mide: bool,
    /// Standard Identifier mask bit 11 (FD mode)
    pub msid11: bool,
    /// Extended Identifier mask bits
    pub meid: B18,
    /// Standard Identifier mask bits
    pub msid: B11,
}

#[bitfield]
#[derive(Default)]
#[repr(u8)]
/// Single byte of a Filter Control register
pub struct FilterControlReg {
    /// Enable Filter to Accept Messages bit
    pub flten: bool,
    #[skip]
    __: B2,
    /// Pointer to FIFO when Filter hits bits
    pub fbp: B5,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone)]
#[repr(u32)]
/// Interrupt Code register (C1VEC)
pub struct C1VEC {
    #[skip]
    __: B1,
    /// Receive Interrupt Flag Code bits
    pub rxcode: B7,
    #[skip]
    __: B1,
    /// Transmit Interrupt Flag Code bits
    pub txcode: B7,
    #[skip]
    __: B3,
    /// Filter Hit Number bits
    pub filhit: B5,
    #[skip]
    __: B1,
    /// Interrupt Flag Code bits
    pub icode: B7,
}

#[bitfield]
#[derive(Default, Debug, Copy, Clone)]
#[repr(u32)]
/// Device ID register
pub struct DeviceIdReg {
    #[skip]
    __: B24,
    /// Device ID bits
    pub id: B4,
    /// Silicon Revision bits
    pub rev: B4,
}
