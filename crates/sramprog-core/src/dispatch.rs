//! Command dispatcher
//!
//! Parses line-oriented textual commands from the serial console and
//! sequences the transfer operations, owning the boot-time auto-load.
//!
//! The dispatcher is a two-state machine: `Ready` processes one command
//! at a time, start to finish; `Halted` is terminal and refuses all
//! further input. Halting stands in for the firmware's fatal idle loop:
//! it is entered when a post-upload verification fails, because a
//! loaded image that cannot be trusted must not be handed to the rest
//! of the hardware.

use core::fmt;
use core::fmt::Write as _;

use crate::bus::BusPins;
use crate::chip::SramChip;
use crate::console::Console;
use crate::error::Error;
use crate::storage::{File as _, Storage};
use crate::transfer;

/// Image file uploaded automatically at boot
pub const DEFAULT_IMAGE: &str = "data.bin";

/// A parsed console command
///
/// Matching is case-sensitive and by prefix, not exact word. Commands
/// that need a filename take it from the second whitespace token; a
/// missing token makes the line unparseable (and silently ignored by
/// the dispatcher, like any unrecognized input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `cdump` - formatted hex dump of the whole chip
    Dump,
    /// `load <name>` - upload a file and verify it, halting on mismatch
    Load(&'a str),
    /// `fzero` / `fone` / `f55` / `faa` - fill the chip with one byte
    Fill(u8),
    /// `fdump <name>` - save the whole chip to a new file
    Save(&'a str),
}

impl<'a> Command<'a> {
    /// Parse one input line; `None` for anything unrecognized
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.starts_with("cdump") {
            Some(Self::Dump)
        } else if line.starts_with("load") {
            Some(Self::Load(argument(line)?))
        } else if line.starts_with("fzero") {
            Some(Self::Fill(0x00))
        } else if line.starts_with("fone") {
            Some(Self::Fill(0xFF))
        } else if line.starts_with("f55") {
            Some(Self::Fill(0x55))
        } else if line.starts_with("faa") {
            Some(Self::Fill(0xAA))
        } else if line.starts_with("fdump") {
            Some(Self::Save(argument(line)?))
        } else {
            None
        }
    }
}

fn argument(line: &str) -> Option<&str> {
    line.split_whitespace().nth(1)
}

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Accepting commands
    Ready,
    /// Terminal: a data-integrity failure stopped the system for good
    Halted,
}

/// Sequences console commands over the chip, storage and console
pub struct Dispatcher<P: BusPins, S: Storage, C: Console> {
    chip: SramChip<P>,
    storage: S,
    console: C,
    state: State,
}

impl<P: BusPins, S: Storage, C: Console> Dispatcher<P, S, C> {
    /// Create a dispatcher in the `Ready` state
    pub fn new(chip: SramChip<P>, storage: S, console: C) -> Self {
        Self {
            chip,
            storage,
            console,
            state: State::Ready,
        }
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Borrow the chip controller
    pub fn chip(&self) -> &SramChip<P> {
        &self.chip
    }

    /// Mutably borrow the chip controller
    pub fn chip_mut(&mut self) -> &mut SramChip<P> {
        &mut self.chip
    }

    /// Boot-time auto-load of [`DEFAULT_IMAGE`]
    ///
    /// A missing image is skipped with a warning; a verification
    /// failure halts the dispatcher just as it would for `load`.
    pub fn boot(&mut self) {
        self.boot_from(DEFAULT_IMAGE);
    }

    /// Boot-time auto-load of a specific image name
    pub fn boot_from(&mut self, name: &str) {
        log::info!("boot: uploading {}", name);
        self.load_image(name);
    }

    /// Process console lines until halted or the input side is exhausted
    pub fn run(&mut self) {
        while self.state == State::Ready && self.console.line_available() {
            let line = self.console.read_line();
            self.execute(&line);
        }
    }

    /// Execute one input line. Unrecognized input is silently ignored;
    /// a halted dispatcher ignores everything.
    pub fn execute(&mut self, line: &str) {
        if self.state == State::Halted {
            return;
        }
        match Command::parse(line) {
            Some(Command::Dump) => self.dump(),
            Some(Command::Load(name)) => self.load_image(name),
            Some(Command::Fill(value)) => self.fill(value),
            Some(Command::Save(name)) => self.save_image(name),
            None => {}
        }
    }

    /// Upload `name` into the chip and verify it byte for byte.
    ///
    /// The chip stays selected across upload and verify; on the fatal
    /// mismatch path it is intentionally left in that state, since the
    /// dispatcher never hands the bus back.
    fn load_image(&mut self, name: &str) {
        if !self.storage.exists(name) {
            log::warn!("image {} not present, skipping upload", name);
            say(
                &mut self.console,
                format_args!("Could not find dump file {}", name),
            );
            return;
        }
        let mut file = match self.storage.open(name) {
            Ok(file) => file,
            Err(e) => {
                log::error!("opening {} failed: {}", name, e);
                say(
                    &mut self.console,
                    format_args!("Could not open file {}", name),
                );
                return;
            }
        };

        self.chip.select(true);
        self.console.write_line("Writing file to RAM");
        say(
            &mut self.console,
            format_args!("Starting upload: {} bytes to write.", file.size()),
        );
        if let Err(e) = transfer::write_file_to_chip(&mut self.chip, &mut file) {
            log::error!("upload of {} failed: {}", name, e);
            self.chip.select(false);
            return;
        }
        drop(file);
        self.console.write_line("Data upload complete.");

        let mut file = match self.storage.open(name) {
            Ok(file) => file,
            Err(e) => {
                log::error!("reopening {} for verify failed: {}", name, e);
                say(
                    &mut self.console,
                    format_args!("Could not open file {}", name),
                );
                self.chip.select(false);
                return;
            }
        };
        say(
            &mut self.console,
            format_args!(
                "Starting integrity check: {} {} bytes to check.",
                name,
                file.size()
            ),
        );
        match transfer::verify_against_file(&mut self.chip, &mut file) {
            Ok(true) => {
                self.console.write_line("Integrity check passed.");
                self.chip.select(false);
            }
            Ok(false) => {
                self.console.write_line("Memory check failed. Abort.");
                log::error!("verification of {} failed, halting", name);
                self.state = State::Halted;
            }
            Err(e) => {
                log::error!("verify read of {} failed: {}", name, e);
                self.chip.select(false);
            }
        }
    }

    fn fill(&mut self, value: u8) {
        say(
            &mut self.console,
            format_args!("Filling memory with byte {}", value),
        );
        self.chip.select(true);
        transfer::fill_with_byte(&mut self.chip, value);
        self.chip.select(false);
        self.console.write_line("Complete");
    }

    fn dump(&mut self) {
        self.chip.select(true);
        transfer::dump(&mut self.chip, &mut self.console);
        self.chip.select(false);
    }

    fn save_image(&mut self, name: &str) {
        self.chip.select(true);
        let result = transfer::read_chip_to_file(&mut self.chip, &mut self.storage, name);
        self.chip.select(false);
        match result {
            Ok(()) => self.console.write_line("Dump complete"),
            Err(Error::AlreadyExists) => say(
                &mut self.console,
                format_args!("File with name {} already exists.", name),
            ),
            Err(e) => {
                log::error!("saving chip to {} failed: {}", name, e);
                say(
                    &mut self.console,
                    format_args!("Could not create file {}", name),
                );
            }
        }
    }
}

/// Format a status line into a bounded buffer and send it
fn say<C: Console>(console: &mut C, args: fmt::Arguments<'_>) {
    let mut line: heapless::String<128> = heapless::String::new();
    let _ = line.write_fmt(args);
    console.write_line(&line);
}
