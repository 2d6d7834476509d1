use crate::events::{BusDiagnosticFlags, ErrorState, InterruptCode, ModuleEvents};
use crate::mocks::Mocks;
use mockall::Sequence;

#[test]
fn test_module_events() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read(0x01C, &[0x02, 0x08], &mut seq);

    let mut controller = mocks.into_controller();

    assert_eq!(
        ModuleEvents::RX | ModuleEvents::RX_OBJECT_OVERFLOW,
        controller.module_events().unwrap()
    );
}

#[test]
fn test_enable_disable_events() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read(0x01E, &[0x02, 0x00], &mut seq);
    mocks.expect_write(0x01E, &[0x03, 0x00], &mut seq);

    mocks.expect_read(0x01E, &[0x03, 0x20], &mut seq);
    mocks.expect_write(0x01E, &[0x01, 0x00], &mut seq);

    let mut controller = mocks.into_controller();
    controller.enable_events(ModuleEvents::TX).unwrap();
    controller
        .disable_events(ModuleEvents::RX | ModuleEvents::BUS_ERROR)
        .unwrap();
}

#[test]
fn test_clear_events_keeps_others() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_write(0x01C, &[0x1D, 0xFF], &mut seq);

    let mut controller = mocks.into_controller();
    controller.clear_events(ModuleEvents::RX).unwrap();
}

#[test]
fn test_read_interrupt_vector() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read_word(0x018, 0x0102_0340, &mut seq);
    mocks.expect_read_word(0x018, 0x4040_1F4A, &mut seq);

    let mut controller = mocks.into_controller();

    let vector = controller.read_interrupt_vector().unwrap();
    assert_eq!(InterruptCode::None, vector.code);
    assert_eq!(3, vector.filter_hit);
    assert_eq!(InterruptCode::Fifo(2), vector.tx_code);
    assert_eq!(InterruptCode::Fifo(1), vector.rx_code);

    let vector = controller.read_interrupt_vector().unwrap();
    assert_eq!(InterruptCode::TransmitAttempts, vector.code);
    assert_eq!(31, vector.filter_hit);
    assert_eq!(InterruptCode::None, vector.tx_code);
}

#[test]
fn test_interrupt_code_from_register() {
    assert_eq!(InterruptCode::Fifo(0), InterruptCode::from_register(0x00));
    assert_eq!(InterruptCode::Fifo(31), InterruptCode::from_register(0x1F));
    assert_eq!(InterruptCode::Error, InterruptCode::from_register(0x41));
    assert_eq!(InterruptCode::ModeChange, InterruptCode::from_register(0x47));
    assert_eq!(InterruptCode::Reserved(0x20), InterruptCode::from_register(0x20));
    assert_eq!(InterruptCode::Reserved(0x4B), InterruptCode::from_register(0x4B));
}

#[test]
fn test_pending_channels() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read_word(0x020, 0x0000_0006, &mut seq);
    mocks.expect_read_word(0x024, 0x8000_0001, &mut seq);

    let mut controller = mocks.into_controller();

    assert_eq!(0x0000_0006, controller.receive_pending_channels().unwrap());
    assert_eq!(0x8000_0001, controller.transmit_pending_channels().unwrap());
}

#[test]
fn test_get_error_counters() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read(0x034, &[0x05, 0x80, 0x15, 0x00], &mut seq);

    let mut controller = mocks.into_controller();
    let counters = controller.get_error_counters().unwrap();

    assert_eq!(0x05, counters.rx_error_count);
    assert_eq!(0x80, counters.tx_error_count);
    assert_eq!(
        ErrorState::WARNING | ErrorState::TX_WARNING | ErrorState::TX_PASSIVE,
        counters.state
    );
}

#[test]
fn test_get_bus_diagnostics() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read(0x038, &[0x01, 0x02, 0x03, 0x04], &mut seq);
    mocks.expect_read(0x03C, &[0x34, 0x12, 0x21, 0x00], &mut seq);

    let mut controller = mocks.into_controller();
    let diagnostics = controller.get_bus_diagnostics().unwrap();

    assert_eq!(1, diagnostics.nominal_rx_error_count);
    assert_eq!(2, diagnostics.nominal_tx_error_count);
    assert_eq!(3, diagnostics.data_rx_error_count);
    assert_eq!(4, diagnostics.data_tx_error_count);
    assert_eq!(0x1234, diagnostics.error_free_messages);
    assert_eq!(
        BusDiagnosticFlags::NOMINAL_BIT0_ERROR | BusDiagnosticFlags::NOMINAL_CRC_ERROR,
        diagnostics.flags
    );

    // halves of the second word are swapped
    assert_eq!([0x0403_0201, 0x1234_0021], diagnostics.to_words());
}

#[test]
fn test_clear_bus_diagnostics() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_write_word(0x038, 0, &mut seq);
    mocks.expect_write_word(0x03C, 0, &mut seq);

    let mut controller = mocks.into_controller();
    controller.clear_bus_diagnostics().unwrap();
}
