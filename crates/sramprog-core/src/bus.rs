//! Pin-level protocol for the SRAM address and data buses
//!
//! This module provides the trait for driving the physical lines of the
//! programmer and the helper routines that implement the wire protocol
//! on top of it.
//!
//! ## Electrical interface
//!
//! - 16 address lines, driven through a 2-stage serial shift register
//!   (data/clock/latch). There is no address cache: every single-byte
//!   access re-sends the full 16 bits.
//! - 8 bidirectional data lines D0..D7, direction-switched as a group.
//! - Output enable (active low): when asserted the chip drives the
//!   data lines with the addressed byte.
//! - Write enable (active low strobe): commits the data lines into the
//!   addressed cell. The pin is dual-role - a control signal while the
//!   chip is selected, tri-stated when it is not, so other hardware
//!   sharing the bus can take over (see [`crate::chip::SramChip::select`]).
//! - Chip select (active low).
//!
//! ## Timing
//!
//! The write strobe and the shift-register latch pulse need a minimal
//! settle interval between consecutive edges. [`BusPins::settle`] is
//! that primitive; it is an explicit no-op delay, never a scheduler
//! yield. The edge ordering (latch low->high->low, strobe
//! low-settle-high) is deliberately spelled out in the helpers below
//! rather than hidden behind an abstraction.

/// Direction of the 8 data lines (and of the dual-role write-enable pin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Lines are inputs (read phase, or tri-stated release)
    Input,
    /// Lines are outputs (write phase)
    Output,
}

/// Trait for low-level pin operations
///
/// This is the minimal set of operations the protocol helpers need.
/// Implementations drive real GPIOs on hardware or a simulated bus in
/// tests; all levels are raw electrical levels (`true` = high), the
/// active-low conventions live in the protocol layer above.
pub trait BusPins {
    /// Set the shift-register serial data line
    fn set_shift_data(&mut self, high: bool);

    /// Set the shift-register clock line (bits shift in on the rising edge)
    fn set_shift_clock(&mut self, high: bool);

    /// Set the shift-register latch line (parallel outputs update on the
    /// rising edge)
    fn set_shift_latch(&mut self, high: bool);

    /// Set the chip output-enable line (active low)
    fn set_output_enable(&mut self, high: bool);

    /// Set the chip-select line (active low)
    fn set_chip_select(&mut self, high: bool);

    /// Set the write-enable line level (active low strobe)
    ///
    /// Only meaningful while the pin is configured as an output.
    fn set_write_enable(&mut self, high: bool);

    /// Configure the write-enable pin direction
    ///
    /// `Input` tri-states the line so other hardware on the bus can
    /// drive it while the chip is deselected.
    fn set_write_enable_direction(&mut self, direction: Direction);

    /// Configure all 8 data lines at once
    fn set_data_direction(&mut self, direction: Direction);

    /// Drive data line `line` (0 = D0 .. 7 = D7) to the given level
    fn set_data_pin(&mut self, line: u8, high: bool);

    /// Sample data line `line` (0 = D0 .. 7 = D7)
    fn data_pin(&self, line: u8) -> bool;

    /// Minimal settle delay between consecutive pin transitions
    fn settle(&self);
}

/// Address-bus helpers: shift-register encoding and latching
pub mod address {
    use super::BusPins;

    /// Present `address` on the parallel outputs of the shift register
    /// and drive the chip output-enable line.
    ///
    /// The address is sent high byte first, each byte shifted MSB-first,
    /// then latched with a low->high->low pulse. The output-enable line
    /// is driven to the *inverse* of `output_enable` (active-low
    /// convention). Must be called before every single-byte access.
    pub fn set_address<P: BusPins + ?Sized>(pins: &mut P, address: u16, output_enable: bool) {
        shift_out(pins, (address >> 8) as u8);
        shift_out(pins, address as u8);
        pins.set_output_enable(!output_enable);
        pins.set_shift_latch(false);
        pins.settle();
        pins.set_shift_latch(true);
        pins.settle();
        pins.set_shift_latch(false);
    }

    /// Clock one byte into the shift register, MSB first
    fn shift_out<P: BusPins + ?Sized>(pins: &mut P, byte: u8) {
        for i in (0..8).rev() {
            pins.set_shift_data((byte >> i) & 1 != 0);
            pins.set_shift_clock(true);
            pins.set_shift_clock(false);
        }
    }
}

/// Data-bus helpers: byte assembly and the write-strobe sequence
pub mod data {
    use super::{address, BusPins, Direction};

    /// Configure all 8 data lines for the given direction
    ///
    /// The direction must match the access that follows (never write
    /// while configured as input or vice versa). This is caller
    /// discipline; it is not separately enforced here.
    pub fn set_direction<P: BusPins + ?Sized>(pins: &mut P, direction: Direction) {
        pins.set_data_direction(direction);
    }

    /// Sample D7..D0 and assemble a byte, D7 as the most significant bit
    ///
    /// The address must already be latched with output enable asserted.
    pub fn read_byte<P: BusPins + ?Sized>(pins: &mut P) -> u8 {
        let mut byte = 0u8;
        for line in (0..8).rev() {
            byte = (byte << 1) | pins.data_pin(line) as u8;
        }
        byte
    }

    /// Write one byte to `address` with the full strobe sequence
    ///
    /// Latches the address with output enable deasserted, drives the
    /// byte LSB-first onto D0.., then strobes write enable low, settles,
    /// and returns the strobe high.
    pub fn write_byte<P: BusPins + ?Sized>(pins: &mut P, address: u16, byte: u8) {
        address::set_address(pins, address, false);
        for line in 0..8 {
            pins.set_data_pin(line, (byte >> line) & 1 != 0);
        }
        pins.set_write_enable(false);
        pins.settle();
        pins.set_write_enable(true);
    }
}
