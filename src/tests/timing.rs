use crate::can::ConfigError;
use crate::config::Silicon;
use crate::mocks::Mocks;
use crate::timing::{BitRate, BitRateConfig, NominalRate, SysClk, TdcMode};
use mockall::Sequence;

#[test]
fn test_all_combinations_feasible_at_40mhz() {
    for bit_rate in BitRate::ALL {
        let config = BitRateConfig {
            sys_clk: SysClk::MHz40,
            bit_rate,
        };

        assert!(config.timing().is_some(), "{bit_rate:?}");
    }
}

#[test]
fn test_infeasible_combinations_20mhz() {
    let infeasible = [
        BitRate::Rate500K3M,
        BitRate::Rate500K6M7,
        BitRate::Rate500K8M,
        BitRate::Rate500K10M,
        BitRate::Rate250K3M,
        BitRate::Rate1000K8M,
    ];

    for bit_rate in BitRate::ALL {
        let config = BitRateConfig {
            sys_clk: SysClk::MHz20,
            bit_rate,
        };

        assert_eq!(infeasible.contains(&bit_rate), config.timing().is_none(), "{bit_rate:?}");
    }
}

#[test]
fn test_feasible_combinations_10mhz() {
    let feasible = [
        BitRate::Rate500K1M,
        BitRate::Rate500K2M,
        BitRate::Rate250K500K,
        BitRate::Rate250K833K,
        BitRate::Rate250K1M,
        BitRate::Rate250K2M,
        BitRate::Rate125K500K,
    ];

    for bit_rate in BitRate::ALL {
        let config = BitRateConfig {
            sys_clk: SysClk::MHz10,
            bit_rate,
        };

        assert_eq!(feasible.contains(&bit_rate), config.timing().is_some(), "{bit_rate:?}");
    }
}

#[test]
fn test_nominal_rate() {
    assert_eq!(NominalRate::Kbps500, BitRate::Rate500K6M7.nominal());
    assert_eq!(NominalRate::Kbps250, BitRate::Rate250K833K.nominal());
    assert_eq!(NominalRate::Kbps1000, BitRate::Rate1000K8M.nominal());
    assert_eq!(NominalRate::Kbps125, BitRate::Rate125K500K.nominal());
}

#[test]
fn test_timing_table_entries() {
    let timing = BitRateConfig {
        sys_clk: SysClk::MHz40,
        bit_rate: BitRate::Rate125K500K,
    }
    .timing()
    .unwrap();

    assert_eq!(254, timing.nominal.tseg1);
    assert_eq!(63, timing.nominal.tseg2);
    assert_eq!(1, timing.data.brp);
    assert_eq!(TdcMode::Disabled, timing.tdc.mode);

    let timing = BitRateConfig {
        sys_clk: SysClk::MHz40,
        bit_rate: BitRate::Rate1000K8M,
    }
    .timing()
    .unwrap();

    assert_eq!(30, timing.nominal.tseg1);
    assert_eq!(2, timing.data.tseg1);
    assert_eq!(3, timing.tdc.offset);
    assert_eq!(1, timing.tdc.value);
}

#[test]
fn test_configure_bit_time_500k_2m() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_write(0x004, &[0x0F, 0x0F, 0x3E, 0x00], &mut seq);
    mocks.expect_write(0x008, &[0x03, 0x03, 0x0E, 0x00], &mut seq);
    mocks.expect_write(0x00C, &[0x00, 0x0F, 0x02, 0x00], &mut seq);

    let mut controller = mocks.into_controller();
    controller
        .configure_bit_time(BitRate::Rate500K2M, SysClk::MHz40)
        .unwrap();
}

#[test]
fn test_configure_bit_time_rev_a_without_tdc_offset() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_write(0x004, &[0x0F, 0x0F, 0x3E, 0x00], &mut seq);
    mocks.expect_write(0x008, &[0x03, 0x03, 0x0E, 0x00], &mut seq);
    mocks.expect_write(0x00C, &[0x00, 0x00, 0x02, 0x00], &mut seq);

    let mut controller = mocks.into_controller_with(Silicon::mcp2517fd_rev_a());
    controller
        .configure_bit_time(BitRate::Rate500K2M, SysClk::MHz40)
        .unwrap();
}

#[test]
fn test_configure_bit_time_unsupported_writes_nothing() {
    let mut controller = Mocks::default().into_controller();

    assert_eq!(
        ConfigError::UnsupportedBitRate(BitRate::Rate250K3M, SysClk::MHz10),
        controller
            .configure_bit_time(BitRate::Rate250K3M, SysClk::MHz10)
            .unwrap_err()
    );
}

#[test]
fn test_configure_bit_time_transfer_error() {
    let mut mocks = Mocks::default();
    mocks.mock_transfer_error();

    let mut controller = mocks.into_controller();

    assert!(matches!(
        controller.configure_bit_time(BitRate::Rate500K1M, SysClk::MHz20),
        Err(ConfigError::BusError(_))
    ));
}
