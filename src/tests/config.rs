use crate::config::{
    ClockConfiguration, ClockOutputDivisor, PLLSetting, PayloadSize, Revision, RetransmissionAttempts,
    RxFifoConfiguration, Silicon, SystemClockDivisor, TefConfiguration, TxFifoConfiguration,
};

#[test]
fn test_clock_from_register() {
    assert_eq!(
        ClockOutputDivisor::DivideBy10,
        ClockConfiguration::from_register(0b0110_0100).clock_output
    );
    assert_eq!(
        ClockOutputDivisor::DivideBy4,
        ClockConfiguration::from_register(0b0100_0100).clock_output
    );
    assert_eq!(
        ClockOutputDivisor::DivideBy2,
        ClockConfiguration::from_register(0b0010_0100).clock_output
    );
    assert_eq!(
        ClockOutputDivisor::DivideBy1,
        ClockConfiguration::from_register(0b0000_0100).clock_output
    );

    assert_eq!(
        SystemClockDivisor::DivideBy2,
        ClockConfiguration::from_register(0b0011_0100).system_clock
    );
    assert_eq!(
        SystemClockDivisor::DivideBy1,
        ClockConfiguration::from_register(0b0000_0100).system_clock
    );

    assert!(ClockConfiguration::from_register(0b0011_0100).disable_clock);
    assert!(!ClockConfiguration::from_register(0b0011_0000).disable_clock);

    assert_eq!(
        PLLSetting::TenTimesPLL,
        ClockConfiguration::from_register(0b0011_0101).pll
    );
    assert_eq!(
        PLLSetting::DirectXTALOscillator,
        ClockConfiguration::from_register(0b0000_0100).pll
    );
}

#[test]
fn test_clock_configuration_to_register() {
    assert_eq!(0x0, ClockConfiguration::default().as_register());

    assert_eq!(
        0b0101_0001,
        ClockConfiguration {
            clock_output: ClockOutputDivisor::DivideBy4,
            system_clock: SystemClockDivisor::DivideBy2,
            disable_clock: false,
            pll: PLLSetting::TenTimesPLL
        }
        .as_register()
    );

    assert_eq!(
        0b0110_0100,
        ClockConfiguration {
            clock_output: ClockOutputDivisor::DivideBy10,
            system_clock: SystemClockDivisor::DivideBy1,
            disable_clock: true,
            pll: PLLSetting::DirectXTALOscillator
        }
        .as_register()
    );

    assert_eq!(
        0b0000_0100,
        ClockConfiguration {
            clock_output: ClockOutputDivisor::DivideBy1,
            system_clock: SystemClockDivisor::DivideBy1,
            disable_clock: true,
            pll: PLLSetting::DirectXTALOscillator
        }
        .as_register()
    );

    assert_eq!(
        0b0010_0100,
        ClockConfiguration {
            clock_output: ClockOutputDivisor::DivideBy2,
            system_clock: SystemClockDivisor::DivideBy1,
            disable_clock: true,
            pll: PLLSetting::DirectXTALOscillator
        }
        .as_register()
    );
}

#[test]
fn test_tx_fifo_configuration_as_register() {
    let config = TxFifoConfiguration {
        size: 8,
        payload_size: PayloadSize::EightBytes,
        priority: 1,
        attempts: RetransmissionAttempts::Unlimited,
        rtr_enable: false,
    };

    assert_eq!(0x0761_0080, u32::from(config.as_register()));

    let config = TxFifoConfiguration {
        size: 32,
        payload_size: PayloadSize::SixtyFourBytes,
        priority: 31,
        attempts: RetransmissionAttempts::Three,
        rtr_enable: true,
    };

    assert_eq!(0xFF3F_00C0, u32::from(config.as_register()));
}

#[test]
fn test_tx_fifo_configuration_priority_masked() {
    let config = TxFifoConfiguration {
        priority: 0x21,
        ..Default::default()
    };

    assert_eq!(1, config.as_register().txpri());
}

#[test]
fn test_rx_fifo_configuration_as_register() {
    let config = RxFifoConfiguration {
        size: 8,
        payload_size: PayloadSize::EightBytes,
        timestamp: false,
        not_empty_interrupt: false,
        overflow_interrupt: false,
    };

    assert_eq!(0x0700_0000, u32::from(config.as_register()));

    let config = RxFifoConfiguration {
        size: 1,
        payload_size: PayloadSize::TwentyFourBytes,
        timestamp: true,
        not_empty_interrupt: true,
        overflow_interrupt: true,
    };

    assert_eq!(0x8000_0029, u32::from(config.as_register()));
}

#[test]
fn test_fifo_size_clamped() {
    assert_eq!(1, RxFifoConfiguration { size: 0, ..Default::default() }.as_register().get_fifo_size());
    assert_eq!(32, RxFifoConfiguration { size: 33, ..Default::default() }.as_register().get_fifo_size());
}

#[test]
fn test_tef_configuration_as_register() {
    let config = TefConfiguration {
        size: 8,
        timestamp: true,
        not_empty_interrupt: false,
    };

    assert_eq!(0x0700_0020, u32::from(config.as_register()));
    assert_eq!(0x0000_0001, u32::from(TefConfiguration { size: 1, timestamp: false, not_empty_interrupt: true }.as_register()));
}

#[test]
fn test_payload_size() {
    assert_eq!(8, PayloadSize::EightBytes.bytes());
    assert_eq!(20, PayloadSize::TwentyBytes.bytes());
    assert_eq!(64, PayloadSize::SixtyFourBytes.bytes());

    assert_eq!(PayloadSize::FortyEightBytes, PayloadSize::from_register(0b110));
    assert_eq!(PayloadSize::TwelveBytes, PayloadSize::from_register(0b1001));
}

#[test]
fn test_silicon_presets() {
    let rev_a = Silicon::mcp2517fd_rev_a();
    assert_eq!(Revision::A, rev_a.revision);
    assert!(!rev_a.tx_queue);
    assert!(rev_a.user_address_times_four);
    assert_eq!(0x7F, rev_a.sequence_mask());

    let rev_b = Silicon::mcp251863();
    assert_eq!(Revision::B, rev_b.revision);
    assert!(rev_b.tx_queue);
    assert!(!rev_b.user_address_times_four);
    assert_eq!(0x7F_FFFF, rev_b.sequence_mask());

    assert_eq!(Silicon::mcp2518fd(), Silicon::default());
}
