//! Memory chip controller
//!
//! [`SramChip`] composes the address and data bus helpers into
//! single-byte accesses plus chip select / power-gate control. It owns
//! the bus-direction and chip-select state; exactly one chip may be
//! selected at a time and the bus must be deselected before yielding
//! the shared lines back to other hardware.

use crate::bus::{address, data, BusPins, Direction};

/// Total addressable capacity of the chip in bytes (16-bit space)
pub const CHIP_CAPACITY: usize = 65536;

/// One fixed 64KiB-addressable byte-wide memory chip behind a
/// shift-register address bus.
pub struct SramChip<P: BusPins> {
    pins: P,
}

impl<P: BusPins> SramChip<P> {
    /// Create a controller over the given pins
    pub fn new(pins: P) -> Self {
        Self { pins }
    }

    /// Select or deselect the chip.
    ///
    /// Selecting makes the write-enable pin an output held high
    /// (strobe inactive) and pulls chip select low. Deselecting
    /// returns write enable to an input - tri-stated so other hardware
    /// sharing the bus can drive the line - and raises chip select.
    /// The dual role of the write-enable pin is a deliberate
    /// bus-sharing convention, not an oversight.
    pub fn select(&mut self, enable: bool) {
        if enable {
            self.pins.set_write_enable_direction(Direction::Output);
            self.pins.set_write_enable(true);
            self.pins.set_chip_select(false);
        } else {
            self.pins.set_write_enable_direction(Direction::Input);
            self.pins.set_chip_select(true);
        }
    }

    /// Configure the 8 data lines for the accesses that follow
    pub fn set_data_direction(&mut self, direction: Direction) {
        data::set_direction(&mut self.pins, direction);
    }

    /// Read one byte. The data bus must already be in input direction.
    pub fn read_byte(&mut self, addr: u16) -> u8 {
        address::set_address(&mut self.pins, addr, true);
        data::read_byte(&mut self.pins)
    }

    /// Write one byte with the full write-strobe sequence. The data bus
    /// must already be in output direction.
    pub fn write_byte(&mut self, addr: u16, byte: u8) {
        data::write_byte(&mut self.pins, addr, byte);
    }

    /// Borrow the underlying pins
    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Mutably borrow the underlying pins
    pub fn pins_mut(&mut self) -> &mut P {
        &mut self.pins
    }
}
