#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]
#![allow(dead_code)]
#![allow(clippy::identity_op)]

//! # Library for MCP2518FD, MCP251863 and MCP2517FD CAN FD controllers
//!
//! Crate currently offer the following features:
//! * CAN2.0 and CAN FD format support
//! * Standard and extended ID formats for CAN frames
//! * TX FIFOs, transmit queue, RX FIFOs and transmit event FIFO
//! * Bit timing tables for 10, 20 and 40 MHz system clocks
//! * CRC protected SPI register access
//! * Filters and masks
//! * Module events, error counters and bus diagnostics
//! * no_std support
//!
//!## CAN Tx/Rx example
//!
//!```
//!use mcp25xxfd::example::{ExampleClock,ExampleCSPin,ExampleSPIBus};
//!use mcp25xxfd::can::{CanController, Controller};
//!use mcp25xxfd::message::TxMessage;
//!use mcp25xxfd::filter::Filter;
//!use mcp25xxfd::config::*;
//!use mcp25xxfd::status::OperationMode;
//!use mcp25xxfd::timing::{BitRate, BitRateConfig, SysClk};
//!use bytes::Bytes;
//!use embedded_can::{Id,StandardId};
//!
//!let cs_pin = ExampleCSPin{};
//!let spi_bus = ExampleSPIBus::default();
//!let clock = ExampleClock::default();
//!
//!let mut controller = Controller::new(spi_bus, cs_pin);
//! // configure CAN controller, stay in configuration mode for FIFO setup
//!controller
//!    .configure(
//!        &Configuration {
//!            clock: ClockConfiguration {
//!                clock_output: ClockOutputDivisor::DivideBy10,
//!                system_clock: SystemClockDivisor::DivideBy1,
//!                disable_clock: false,
//!                pll: PLLSetting::TenTimesPLL,
//!            },
//!            bit_rate: BitRateConfig {
//!                sys_clk: SysClk::MHz40,
//!                bit_rate: BitRate::Rate500K2M,
//!            },
//!            mode: OperationMode::Configuration,
//!            ..Default::default()
//!        },
//!        &clock,
//!    ).unwrap();
//!
//!controller.configure_tx_channel(2, &TxFifoConfiguration { size: 8, priority: 1, ..Default::default() }).unwrap();
//!controller.configure_rx_channel(1, &RxFifoConfiguration { size: 8, ..Default::default() }).unwrap();
//!
//! // Create and set filter object
//!let can_id = Id::Standard(StandardId::new(0x55).unwrap());
//!let mut filter = Filter::new(can_id, 0).unwrap();
//!filter.match_standard_only();
//!controller.set_filter_object(filter, 1).unwrap();
//!
//!controller.select_mode(OperationMode::NormalCANFD).unwrap();
//!controller.wait_for_mode(OperationMode::NormalCANFD, &clock).unwrap();
//!
//! // Create message frame
//!let payload = Bytes::copy_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
//!let can_message = TxMessage::new(can_id, payload, false, false).unwrap();
//!
//!// Transmit CAN message
//!controller.transmit(2, &can_message).unwrap();
//!
//!// Receive CAN message
//!let message = controller.receive(1, 8).unwrap().unwrap();
//!assert_eq!(can_id, message.id());
//!assert_eq!(&[1, 2, 3, 4, 5, 6, 7, 8], message.get_payload());
//!```

extern crate alloc;

pub mod can;
pub mod config;
pub mod crc;
pub mod events;
pub mod fifo;
pub mod status;
pub mod timing;

pub mod filter;
pub mod message;

pub mod example;
#[cfg(test)]
pub(crate) mod mocks;
mod registers;
#[cfg(test)]
mod tests;
