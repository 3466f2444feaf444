//! sramprog-core - Core library for parallel SRAM programming
//!
//! This crate implements the memory-chip access protocol and the
//! transfer/verification pipeline for a 64KiB byte-wide parallel SRAM
//! addressed through a serial-to-parallel shift register. It is
//! designed to be `no_std` compatible so the same core can drive real
//! pins on a microcontroller or a simulated bus on a host.
//!
//! # Features
//!
//! - `std` - Enable standard library support (`std::error::Error` impls)
//!
//! # Example
//!
//! ```ignore
//! use sramprog_core::bus::BusPins;
//! use sramprog_core::chip::SramChip;
//!
//! fn checkerboard<P: BusPins>(pins: P) {
//!     let mut chip = SramChip::new(pins);
//!     chip.select(true);
//!     chip.set_data_direction(sramprog_core::bus::Direction::Output);
//!     chip.write_byte(0x0000, 0x55);
//!     chip.write_byte(0x0001, 0xAA);
//!     chip.select(false);
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod bus;
pub mod chip;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod storage;
pub mod transfer;

pub use error::{Error, Result};
