use crate::config::{PayloadSize, RetransmissionAttempts};
use crate::registers::*;

#[test]
fn test_fifo_control_reg1() {
    assert_eq!(
        [0b0000_0011],
        FifoControlReg1::new().with_uinc(true).with_txreq(true).into_bytes()
    );
    assert_eq!([0b0000_0100], FifoControlReg1::new().with_freset(true).into_bytes());
}

#[test]
fn test_fifo_control() {
    let register = FifoControl::new()
        .with_plsize(PayloadSize::TwentyFourBytes as u8)
        .with_fifo_size(32)
        .with_txat(RetransmissionAttempts::Unlimited as u8)
        .with_txpri(3)
        .with_txen(true);

    assert_eq!(32, register.get_fifo_size());
    assert_eq!(0x9F63_0080, u32::from(register));
}

#[test]
fn test_fifo_size_clamped() {
    assert_eq!(1, FifoControl::new().with_fifo_size(0).get_fifo_size());
    assert_eq!(32, FifoControl::new().with_fifo_size(200).get_fifo_size());
    assert_eq!(32, TefControl::new().with_fifo_size(64).get_fifo_size());
}

#[test]
fn test_tef_control() {
    let register = TefControl::new().with_fifo_size(4).with_teftsen(true).with_tefneie(true);

    assert_eq!(0x0300_0021, u32::from(register));
}

#[test]
fn test_can_control_reg3() {
    assert_eq!([0b0000_0100], CanControlReg3::new().with_reqop(0b100).into_bytes());
    assert_eq!([0b0000_1000], CanControlReg3::new().with_abat(true).into_bytes());
    assert_eq!(0b110, CanControlReg3::from(0b0000_1110).reqop());
    assert!(CanControlReg3::from(0b0000_1110).abat());
}

#[test]
fn test_filter_control_reg() {
    assert_eq!([0b1000_0001], FilterControlReg::new().with_flten(true).with_fbp(1).into_bytes());
    assert!(!FilterControlReg::from(0b0001_1111).flten());
    assert_eq!(31, FilterControlReg::from(0b1001_1111).fbp());
}

#[test]
fn test_filter_mask_reg() {
    let register = FilterMaskReg::new().with_msid(0x7FF).with_mide(true);

    assert_eq!(0x4000_07FF, u32::from(register));
}

#[test]
fn test_interrupt_vector_reg() {
    let register = C1VEC::from(0x4143_0240);

    assert_eq!(0x41, register.rxcode());
    assert_eq!(0x43, register.txcode());
    assert_eq!(2, register.filhit());
    assert_eq!(0x40, register.icode());
}

#[test]
fn test_device_id_reg() {
    let register = DeviceIdReg::from(0x0000_0014);

    assert_eq!(1, register.id());
    assert_eq!(4, register.rev());
}
