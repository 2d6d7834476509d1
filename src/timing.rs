//!# Bit timing
//! Nominal and data phase bit timing is taken from a table of validated register settings
//! for the supported system clocks. Combinations without an entry (e.g. 250 kbit/s / 3 Mbit/s
//! at 10 MHz) can not be reached with an integer number of time quanta and are rejected.
//!
//! ```
//!# use mcp25xxfd::timing::{BitRate, BitRateConfig, SysClk};
//! let config = BitRateConfig { sys_clk: SysClk::MHz40, bit_rate: BitRate::Rate500K2M };
//! let timing = config.timing().unwrap();
//!
//! assert_eq!(62, timing.nominal.tseg1);
//! assert_eq!(14, timing.data.tseg1);
//! assert_eq!(15, timing.tdc.offset);
//!
//! assert!(BitRateConfig { sys_clk: SysClk::MHz10, bit_rate: BitRate::Rate250K3M }.timing().is_none());
//! ```
use crate::can::{ConfigError, Controller, REGISTER_C1DBTCFG, REGISTER_C1NBTCFG, REGISTER_C1TDC};
use crate::config::Revision;
use crate::registers::{C1DBTCFG, C1NBTCFG, C1TDC};
use embedded_hal::blocking::spi::Transfer;
use embedded_hal::digital::v2::OutputPin;
use embedded_time::Clock;
use log::debug;
use serde::{Deserialize, Serialize};

/// System clock of the CAN controller
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SysClk {
    MHz10,
    MHz20,
    MHz40,
}

impl Default for SysClk {
    fn default() -> Self {
        Self::MHz40
    }
}

/// Supported nominal (arbitration) / data bit rate combinations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitRate {
    Rate500K1M,
    Rate500K2M,
    Rate500K3M,
    Rate500K4M,
    Rate500K5M,
    Rate500K6M7,
    Rate500K8M,
    Rate500K10M,
    Rate250K500K,
    Rate250K833K,
    Rate250K1M,
    Rate250K1M5,
    Rate250K2M,
    Rate250K3M,
    Rate250K4M,
    Rate1000K4M,
    Rate1000K8M,
    Rate125K500K,
}

impl Default for BitRate {
    fn default() -> Self {
        Self::Rate500K2M
    }
}

/// Nominal bit rate of a [BitRate] combination
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NominalRate {
    Kbps125,
    Kbps250,
    Kbps500,
    Kbps1000,
}

impl BitRate {
    /// All supported combinations
    pub const ALL: [BitRate; 18] = [
        Self::Rate500K1M,
        Self::Rate500K2M,
        Self::Rate500K3M,
        Self::Rate500K4M,
        Self::Rate500K5M,
        Self::Rate500K6M7,
        Self::Rate500K8M,
        Self::Rate500K10M,
        Self::Rate250K500K,
        Self::Rate250K833K,
        Self::Rate250K1M,
        Self::Rate250K1M5,
        Self::Rate250K2M,
        Self::Rate250K3M,
        Self::Rate250K4M,
        Self::Rate1000K4M,
        Self::Rate1000K8M,
        Self::Rate125K500K,
    ];

    pub fn nominal(&self) -> NominalRate {
        match self {
            Self::Rate500K1M
            | Self::Rate500K2M
            | Self::Rate500K3M
            | Self::Rate500K4M
            | Self::Rate500K5M
            | Self::Rate500K6M7
            | Self::Rate500K8M
            | Self::Rate500K10M => NominalRate::Kbps500,
            Self::Rate250K500K
            | Self::Rate250K833K
            | Self::Rate250K1M
            | Self::Rate250K1M5
            | Self::Rate250K2M
            | Self::Rate250K3M
            | Self::Rate250K4M => NominalRate::Kbps250,
            Self::Rate1000K4M | Self::Rate1000K8M => NominalRate::Kbps1000,
            Self::Rate125K500K => NominalRate::Kbps125,
        }
    }
}

/// Transmitter delay compensation mode
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TdcMode {
    Disabled = 0b00,
    Manual = 0b01,
    Auto = 0b10,
}

/// Prescaler and segment values of one bit phase (register encoding, i.e. value - 1)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseTiming {
    pub brp: u8,
    pub tseg1: u8,
    pub tseg2: u8,
    pub sjw: u8,
}

const fn phase(brp: u8, tseg1: u8, tseg2: u8, sjw: u8) -> PhaseTiming {
    PhaseTiming { brp, tseg1, tseg2, sjw }
}

/// Transmitter delay compensation settings
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TdcConfig {
    pub mode: TdcMode,
    pub offset: u8,
    pub value: u8,
}

const fn tdc(mode: TdcMode, offset: u8, value: u8) -> TdcConfig {
    TdcConfig { mode, offset, value }
}

/// Complete bit timing of nominal and data phase
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitTiming {
    pub nominal: PhaseTiming,
    pub data: PhaseTiming,
    pub tdc: TdcConfig,
}

impl BitTiming {
    pub(crate) fn nominal_register(&self) -> C1NBTCFG {
        C1NBTCFG::new()
            .with_brp(self.nominal.brp)
            .with_tseg1(self.nominal.tseg1)
            .with_tseg2(self.nominal.tseg2)
            .with_sjw(self.nominal.sjw)
    }

    pub(crate) fn data_register(&self) -> C1DBTCFG {
        C1DBTCFG::new()
            .with_brp(self.data.brp)
            .with_tseg1(self.data.tseg1)
            .with_tseg2(self.data.tseg2)
            .with_sjw(self.data.sjw)
    }

    /// TDC register; Rev A silicon requires offset and value to stay zero
    pub(crate) fn tdc_register(&self, revision: Revision) -> C1TDC {
        let (offset, value) = match revision {
            Revision::A => (0, 0),
            Revision::B => (self.tdc.offset, self.tdc.value),
        };

        C1TDC::new()
            .with_tdcmod(self.tdc.mode as u8)
            .with_tdco(offset)
            .with_tdcv(value)
    }
}

/// Requested bit rate combination for the given system clock
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitRateConfig {
    pub sys_clk: SysClk,
    pub bit_rate: BitRate,
}

impl BitRateConfig {
    /// Looks up the bit timing, None if the combination is not feasible for the clock
    pub fn timing(&self) -> Option<BitTiming> {
        let (data, tdc) = data_timing(self.bit_rate, self.sys_clk)?;

        Some(BitTiming {
            nominal: nominal_timing(self.bit_rate.nominal(), self.sys_clk),
            data,
            tdc,
        })
    }
}

fn nominal_timing(rate: NominalRate, sys_clk: SysClk) -> PhaseTiming {
    match (sys_clk, rate) {
        (SysClk::MHz40, NominalRate::Kbps125) => phase(0, 254, 63, 63),
        (SysClk::MHz40, NominalRate::Kbps250) => phase(0, 126, 31, 31),
        (SysClk::MHz40, NominalRate::Kbps500) => phase(0, 62, 15, 15),
        (SysClk::MHz40, NominalRate::Kbps1000) => phase(0, 30, 7, 7),

        (SysClk::MHz20, NominalRate::Kbps125) => phase(0, 126, 31, 31),
        (SysClk::MHz20, NominalRate::Kbps250) => phase(0, 62, 15, 15),
        (SysClk::MHz20, NominalRate::Kbps500) => phase(0, 30, 7, 7),
        (SysClk::MHz20, NominalRate::Kbps1000) => phase(0, 14, 3, 3),

        (SysClk::MHz10, NominalRate::Kbps125) => phase(0, 62, 15, 15),
        (SysClk::MHz10, NominalRate::Kbps250) => phase(0, 30, 7, 7),
        (SysClk::MHz10, NominalRate::Kbps500) => phase(0, 14, 3, 3),
        (SysClk::MHz10, NominalRate::Kbps1000) => phase(0, 6, 1, 1),
    }
}

fn data_timing(bit_rate: BitRate, sys_clk: SysClk) -> Option<(PhaseTiming, TdcConfig)> {
    use BitRate::*;
    use TdcMode::{Auto, Disabled};

    let entry = match sys_clk {
        SysClk::MHz40 => match bit_rate {
            Rate500K1M => (phase(0, 30, 7, 7), tdc(Auto, 31, 0)),
            Rate500K2M => (phase(0, 14, 3, 3), tdc(Auto, 15, 0)),
            Rate500K3M => (phase(0, 8, 2, 2), tdc(Auto, 9, 0)),
            Rate500K4M | Rate1000K4M => (phase(0, 6, 1, 1), tdc(Auto, 7, 0)),
            Rate500K5M => (phase(0, 4, 1, 1), tdc(Auto, 5, 0)),
            Rate500K6M7 => (phase(0, 3, 0, 0), tdc(Auto, 4, 0)),
            Rate500K8M | Rate1000K8M => (phase(0, 2, 0, 0), tdc(Auto, 3, 1)),
            Rate500K10M => (phase(0, 1, 0, 0), tdc(Auto, 2, 0)),
            Rate250K500K | Rate125K500K => (phase(1, 30, 7, 7), tdc(Disabled, 31, 0)),
            Rate250K833K => (phase(1, 17, 4, 4), tdc(Disabled, 18, 0)),
            Rate250K1M => (phase(0, 30, 7, 7), tdc(Auto, 31, 0)),
            Rate250K1M5 => (phase(0, 18, 5, 5), tdc(Auto, 19, 0)),
            Rate250K2M => (phase(0, 14, 3, 3), tdc(Auto, 15, 0)),
            Rate250K3M => (phase(0, 8, 2, 2), tdc(Auto, 9, 0)),
            Rate250K4M => (phase(0, 6, 1, 1), tdc(Auto, 7, 0)),
        },
        SysClk::MHz20 => match bit_rate {
            Rate500K1M => (phase(0, 14, 3, 3), tdc(Auto, 15, 0)),
            Rate500K2M => (phase(0, 6, 1, 1), tdc(Auto, 7, 0)),
            Rate500K4M | Rate1000K4M => (phase(0, 2, 0, 0), tdc(Auto, 3, 0)),
            Rate500K5M => (phase(0, 1, 0, 0), tdc(Auto, 2, 0)),
            Rate250K500K | Rate125K500K => (phase(0, 30, 7, 7), tdc(Disabled, 31, 0)),
            Rate250K833K => (phase(0, 17, 4, 4), tdc(Disabled, 18, 0)),
            Rate250K1M => (phase(0, 14, 3, 3), tdc(Auto, 15, 0)),
            Rate250K1M5 => (phase(0, 8, 2, 2), tdc(Auto, 9, 0)),
            Rate250K2M => (phase(0, 6, 1, 1), tdc(Auto, 7, 0)),
            Rate250K4M => (phase(0, 2, 0, 0), tdc(Auto, 3, 0)),
            Rate500K3M | Rate500K6M7 | Rate500K8M | Rate500K10M | Rate250K3M | Rate1000K8M => return None,
        },
        SysClk::MHz10 => match bit_rate {
            Rate500K1M => (phase(0, 6, 1, 1), tdc(Auto, 7, 0)),
            Rate500K2M => (phase(0, 2, 0, 0), tdc(Auto, 3, 0)),
            Rate250K500K | Rate125K500K => (phase(0, 14, 3, 3), tdc(Disabled, 15, 0)),
            Rate250K833K => (phase(0, 7, 2, 2), tdc(Disabled, 8, 0)),
            Rate250K1M => (phase(0, 6, 1, 1), tdc(Auto, 7, 0)),
            Rate250K2M => (phase(0, 2, 0, 0), tdc(Auto, 3, 0)),
            Rate500K3M | Rate500K4M | Rate500K5M | Rate500K6M7 | Rate500K8M | Rate500K10M | Rate250K1M5
            | Rate250K3M | Rate250K4M | Rate1000K4M | Rate1000K8M => return None,
        },
    };

    Some(entry)
}

impl<B, CS, CLK> Controller<B, CS, CLK>
where
    B: Transfer<u8>,
    CS: OutputPin,
    CLK: Clock,
{
    /// Writes nominal, data and TDC bit timing registers for the given combination.
    /// Nothing is written if the combination is not supported for the clock.
    pub fn configure_bit_time(
        &mut self,
        bit_rate: BitRate,
        sys_clk: SysClk,
    ) -> Result<(), ConfigError<B::Error, CS::Error>> {
        let config = BitRateConfig { sys_clk, bit_rate };

        let timing = config.timing().ok_or_else(|| {
            debug!("Bit rate {bit_rate:?} not feasible with system clock {sys_clk:?}");
            ConfigError::UnsupportedBitRate(bit_rate, sys_clk)
        })?;

        self.write_word(REGISTER_C1NBTCFG, u32::from(timing.nominal_register()))?;
        self.write_word(REGISTER_C1DBTCFG, u32::from(timing.data_register()))?;
        self.write_word(REGISTER_C1TDC, u32::from(timing.tdc_register(self.silicon.revision)))?;

        Ok(())
    }
}
