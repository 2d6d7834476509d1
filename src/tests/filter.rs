use crate::can::{BusError, CanController};
use crate::fifo::FifoError;
use crate::filter::Filter;
use crate::mocks::Mocks;
use embedded_can::{ExtendedId, Id, StandardId};
use mockall::Sequence;

const EXTENDED_ID: u32 = 0x14C92A2B; //0b000(1_0100_1100_10)(01_0010_1010_0010_1011)
const STANDARD_ID: u16 = 0x6A5;

#[test]
fn test_filter_index_out_of_range() {
    let id = Id::Standard(StandardId::new(STANDARD_ID).unwrap());

    assert!(Filter::new(id, 31).is_some());
    assert!(Filter::new(id, 32).is_none());
}

#[test]
fn test_filter_values_standard_id() {
    let mut filter = Filter::new(Id::Standard(StandardId::new(STANDARD_ID).unwrap()), 1).unwrap();

    assert_eq!(0x0000_06A5, filter.filter_value());
    assert_eq!(0, filter.mask_value());

    filter.set_mask_standard_id(0xFFFF);
    assert_eq!(0x0000_07FF, filter.mask_value());

    filter.match_standard_only();
    assert_eq!(0x4000_07FF, filter.mask_value());
    assert_eq!(0x0000_06A5, filter.filter_value());
}

#[test]
fn test_filter_values_extended_id() {
    let mut filter = Filter::new(Id::Extended(ExtendedId::new(EXTENDED_ID).unwrap()), 0).unwrap();

    assert_eq!(0x0951_5D32, filter.filter_value());

    filter.set_mask_extended_id(0xFFFF_FFFF);
    filter.match_extended_only();

    assert_eq!(0x4951_5D32, filter.filter_value());
    assert_eq!(0x5FFF_FFFF, filter.mask_value());
}

#[test]
fn test_set_filter_object_standard_id() {
    let mut filter = Filter::new(Id::Standard(StandardId::new(STANDARD_ID).unwrap()), 1).unwrap();

    // mask 2 lsb of standard id -> MSID <1:0> should be set
    filter.set_mask_standard_id(0b000_0000_0011);

    // MIDE should be set and EXIDE should be cleared
    filter.match_standard_only();

    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    // disable filter 1, FIFO pointer stays
    mocks.expect_read(0x1D1, &[0x83], &mut seq);
    mocks.expect_write(0x1D1, &[0x03], &mut seq);

    mocks.expect_write(0x1F8, &[0xA5, 0x06, 0x00, 0x00], &mut seq);
    mocks.expect_write(0x1FC, &[0x03, 0x00, 0x00, 0x40], &mut seq);

    // enabled and linked to FIFO 2
    mocks.expect_write(0x1D1, &[0x82], &mut seq);

    let mut controller = mocks.into_controller();
    controller.set_filter_object(filter, 2).unwrap();
}

#[test]
fn test_set_filter_object_extended_id() {
    let mut filter = Filter::new(Id::Extended(ExtendedId::new(EXTENDED_ID).unwrap()), 0).unwrap();
    filter.set_mask_extended_id(0x1FFF_FFFF);
    filter.match_extended_only();

    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read(0x1D0, &[0x00], &mut seq);
    mocks.expect_write(0x1D0, &[0x00], &mut seq);
    mocks.expect_write(0x1F0, &[0x32, 0x5D, 0x51, 0x49], &mut seq);
    mocks.expect_write(0x1F4, &[0xFF, 0xFF, 0xFF, 0x5F], &mut seq);
    mocks.expect_write(0x1D0, &[0x81], &mut seq);

    let mut controller = mocks.into_controller();
    controller.set_filter_object(filter, 1).unwrap();
}

#[test]
fn test_set_filter_object_transfer_error() {
    let filter = Filter::new(Id::Standard(StandardId::new(STANDARD_ID).unwrap()), 1).unwrap();

    let mut mocks = Mocks::default();
    mocks.mock_transfer_error();

    let mut controller = mocks.into_controller();

    assert_eq!(
        FifoError::BusError(BusError::TransferError(55)),
        controller.set_filter_object(filter, 2).unwrap_err()
    );
}

#[test]
fn test_link_filter_to_channel() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_write(0x1EF, &[0x9F], &mut seq);
    mocks.expect_write(0x1EF, &[0x1F], &mut seq);

    let mut controller = mocks.into_controller();
    controller.link_filter_to_channel(31, 31, true).unwrap();
    controller.link_filter_to_channel(31, 31, false).unwrap();
}

#[test]
fn test_enable_filter() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_read(0x1D5, &[0x04], &mut seq);
    mocks.expect_write(0x1D5, &[0x84], &mut seq);

    let mut controller = mocks.into_controller();
    controller.enable_filter(5).unwrap();
}

#[test]
fn test_configure_filter_and_mask() {
    let mut mocks = Mocks::default();
    let mut seq = Sequence::new();

    mocks.expect_write_word(0x208, 0x0000_00DA, &mut seq);
    mocks.expect_write_word(0x20C, 0x4000_07FF, &mut seq);

    let mut controller = mocks.into_controller();
    controller.configure_filter(3, 0xDA).unwrap();
    controller.configure_mask(3, 0x4000_07FF).unwrap();
}
