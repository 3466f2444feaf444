//! sramprog-sim - In-memory board emulation for testing
//!
//! This crate provides pin-level and collaborator test doubles for the
//! programmer: [`SimBus`] emulates the shift register, latch, data
//! lines and the 64KiB SRAM array behind them, so the core's bit-level
//! protocol is exercised for real; [`MemStorage`] and [`ScriptConsole`]
//! stand in for the storage medium and the serial channel. Useful for
//! testing and development without real hardware.

mod bus;
mod console;
mod storage;

pub use bus::SimBus;
pub use console::ScriptConsole;
pub use storage::MemStorage;
