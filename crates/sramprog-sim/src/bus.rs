//! Pin-level simulation of the SRAM board
//!
//! [`SimBus`] implements [`BusPins`] over an in-memory model of the
//! actual circuit: a 16-bit serial shift register with an output latch,
//! eight bidirectional data lines, and the 64KiB array behind them.
//! Address bits are captured on rising clock edges, presented on the
//! rising latch edge, and a byte is committed on the falling
//! write-enable edge - so the core's edge ordering is verified, not
//! assumed.

use bitflags::bitflags;

use sramprog_core::bus::{BusPins, Direction};
use sramprog_core::chip::CHIP_CAPACITY;

bitflags! {
    /// Raw levels of the control lines (true = high)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Levels: u8 {
        const SHIFT_DATA    = 1 << 0;
        const SHIFT_CLOCK   = 1 << 1;
        const SHIFT_LATCH   = 1 << 2;
        const OUTPUT_ENABLE = 1 << 3;
        const CHIP_SELECT   = 1 << 4;
        const WRITE_ENABLE  = 1 << 5;
    }
}

/// Simulated board: shift register, latch, data lines, SRAM array
pub struct SimBus {
    levels: Levels,
    data_levels: u8,
    data_direction: Direction,
    write_enable_direction: Direction,
    shift_register: u16,
    address: u16,
    sram: Vec<u8>,
    stuck_low: u8,
}

impl SimBus {
    /// Create a board with zeroed memory and all control lines idle
    /// (chip select, output enable and write enable high)
    pub fn new() -> Self {
        Self {
            levels: Levels::OUTPUT_ENABLE | Levels::CHIP_SELECT | Levels::WRITE_ENABLE,
            data_levels: 0,
            data_direction: Direction::Input,
            write_enable_direction: Direction::Input,
            shift_register: 0,
            address: 0,
            sram: vec![0; CHIP_CAPACITY],
            stuck_low: 0,
        }
    }

    /// Create a board with memory pre-filled from `image`
    pub fn with_image(image: &[u8]) -> Self {
        let mut bus = Self::new();
        let len = image.len().min(bus.sram.len());
        bus.sram[..len].copy_from_slice(&image[..len]);
        bus
    }

    /// Get a reference to the memory array
    pub fn sram(&self) -> &[u8] {
        &self.sram
    }

    /// Get a mutable reference to the memory array
    pub fn sram_mut(&mut self) -> &mut [u8] {
        &mut self.sram
    }

    /// Address currently presented on the latch outputs
    pub fn latched_address(&self) -> u16 {
        self.address
    }

    /// Fault injection: force the given data lines to read back low on
    /// every committed write, emulating lines shorted to ground. A mask
    /// of 0 clears the fault.
    pub fn set_stuck_low_mask(&mut self, mask: u8) {
        self.stuck_low = mask;
    }

    fn selected(&self) -> bool {
        !self.levels.contains(Levels::CHIP_SELECT)
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BusPins for SimBus {
    fn set_shift_data(&mut self, high: bool) {
        self.levels.set(Levels::SHIFT_DATA, high);
    }

    fn set_shift_clock(&mut self, high: bool) {
        let rising = high && !self.levels.contains(Levels::SHIFT_CLOCK);
        if rising {
            let bit = self.levels.contains(Levels::SHIFT_DATA) as u16;
            self.shift_register = (self.shift_register << 1) | bit;
        }
        self.levels.set(Levels::SHIFT_CLOCK, high);
    }

    fn set_shift_latch(&mut self, high: bool) {
        let rising = high && !self.levels.contains(Levels::SHIFT_LATCH);
        if rising {
            self.address = self.shift_register;
        }
        self.levels.set(Levels::SHIFT_LATCH, high);
    }

    fn set_output_enable(&mut self, high: bool) {
        self.levels.set(Levels::OUTPUT_ENABLE, high);
    }

    fn set_chip_select(&mut self, high: bool) {
        self.levels.set(Levels::CHIP_SELECT, high);
    }

    fn set_write_enable(&mut self, high: bool) {
        let falling = !high && self.levels.contains(Levels::WRITE_ENABLE);
        if falling
            && self.write_enable_direction == Direction::Output
            && self.selected()
            && self.data_direction == Direction::Output
        {
            let byte = self.data_levels & !self.stuck_low;
            log::trace!("sim: commit {:#04x} at {:#06x}", byte, self.address);
            self.sram[self.address as usize] = byte;
        }
        self.levels.set(Levels::WRITE_ENABLE, high);
    }

    fn set_write_enable_direction(&mut self, direction: Direction) {
        self.write_enable_direction = direction;
    }

    fn set_data_direction(&mut self, direction: Direction) {
        self.data_direction = direction;
    }

    fn set_data_pin(&mut self, line: u8, high: bool) {
        if high {
            self.data_levels |= 1 << line;
        } else {
            self.data_levels &= !(1 << line);
        }
    }

    fn data_pin(&self, line: u8) -> bool {
        if self.data_direction == Direction::Input {
            // The chip only drives the lines while selected with output
            // enable asserted; a floating line reads low.
            if self.selected() && !self.levels.contains(Levels::OUTPUT_ENABLE) {
                return (self.sram[self.address as usize] >> line) & 1 != 0;
            }
            return false;
        }
        (self.data_levels >> line) & 1 != 0
    }

    fn settle(&self) {
        // In-memory model, nothing to settle.
    }
}
