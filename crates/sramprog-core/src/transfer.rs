//! Bulk transfer engine
//!
//! Chunked bulk operations between a storage file and the chip, plus
//! fill and formatted dump. All operations here require the chip to be
//! selected by the caller before invocation and deselected after; chip
//! selection is a session-scoped resource owned by the dispatcher.
//!
//! File-backed operations process the file in whole [`PART_SIZE`]
//! parts: a trailing partial part below part size is silently neither
//! written nor compared, so bytes of the chip beyond the last full part
//! are left untouched. Images are expected to be padded to a part
//! boundary.

use core::fmt::Write as _;

use crate::bus::{BusPins, Direction};
use crate::chip::{SramChip, CHIP_CAPACITY};
use crate::console::Console;
use crate::error::{Error, Result};
use crate::storage::{File, Storage};

/// Read/write and verify chunk size in bytes
pub const PART_SIZE: usize = 128;

/// Dump row width in bytes (display line width, not a transfer tradeoff)
pub const DUMP_ROW_SIZE: usize = 32;

/// Formatted dump row: "XXXX:" prefix plus 32 " hh" groups
type DumpRow = heapless::String<128>;

/// Number of whole parts to transfer for a file of `size` bytes.
///
/// Capped at chip capacity so the address cursor can never leave the
/// 16-bit space, whatever the file size claims.
fn part_count(size: u32) -> usize {
    (size as usize / PART_SIZE).min(CHIP_CAPACITY / PART_SIZE)
}

/// Fill `buf` completely from `file`.
///
/// The caller sizes the loop from the file size, so hitting end of
/// file here means the medium lied and is reported as a storage error.
fn read_full<F: File>(file: &mut F, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..])? {
            0 => return Err(Error::Storage),
            n => filled += n,
        }
    }
    Ok(())
}

/// Stream `file` into the chip in whole parts, starting at address 0.
///
/// Sets the data bus to output. Returns the number of bytes written
/// (always a multiple of [`PART_SIZE`]).
pub fn write_file_to_chip<P, F>(chip: &mut SramChip<P>, file: &mut F) -> Result<u32>
where
    P: BusPins,
    F: File,
{
    let parts = part_count(file.size());
    let mut buf = [0u8; PART_SIZE];

    chip.set_data_direction(Direction::Output);
    let mut addr: u32 = 0;
    for _ in 0..parts {
        read_full(file, &mut buf)?;
        for &byte in &buf {
            chip.write_byte(addr as u16, byte);
            addr += 1;
        }
    }
    Ok(addr)
}

/// Compare the chip against `file` over the whole-part range.
///
/// Sets the data bus to input. Every mismatch is logged at debug level
/// with address, expected and actual value, but the comparison always
/// runs to completion; the return value is the aggregate pass/fail.
pub fn verify_against_file<P, F>(chip: &mut SramChip<P>, file: &mut F) -> Result<bool>
where
    P: BusPins,
    F: File,
{
    let parts = part_count(file.size());
    let mut buf = [0u8; PART_SIZE];

    chip.set_data_direction(Direction::Input);
    let mut addr: u32 = 0;
    let mut fail = false;
    for _ in 0..parts {
        read_full(file, &mut buf)?;
        for &expected in &buf {
            let actual = chip.read_byte(addr as u16);
            if actual != expected {
                log::debug!(
                    "compare failed at address {:#06x}: expected {:#04x}, got {:#04x}",
                    addr,
                    expected,
                    actual
                );
                fail = true;
            }
            addr += 1;
        }
    }
    Ok(!fail)
}

/// Read the entire address space into a newly created file.
///
/// Refuses to overwrite: if `name` already exists, returns
/// [`Error::AlreadyExists`] without writing anything. Sets the data bus
/// to input.
pub fn read_chip_to_file<P, S>(chip: &mut SramChip<P>, storage: &mut S, name: &str) -> Result<()>
where
    P: BusPins,
    S: Storage,
{
    if storage.exists(name) {
        return Err(Error::AlreadyExists);
    }
    let mut file = storage.create(name)?;

    chip.set_data_direction(Direction::Input);
    for addr in 0..CHIP_CAPACITY as u32 {
        let byte = chip.read_byte(addr as u16);
        file.write(byte)?;
    }
    Ok(())
}

/// Write `value` to every address in the chip.
///
/// Sets the data bus to output.
pub fn fill_with_byte<P: BusPins>(chip: &mut SramChip<P>, value: u8) {
    chip.set_data_direction(Direction::Output);
    for addr in 0..CHIP_CAPACITY as u32 {
        chip.write_byte(addr as u16, value);
    }
}

/// Dump the entire address space to the console as hex rows.
///
/// Sets the data bus to input. Each row covers [`DUMP_ROW_SIZE`] bytes
/// and reads `XXXX:  hh hh ... hh` with a 4-digit lowercase hex start
/// address.
pub fn dump<P, C>(chip: &mut SramChip<P>, console: &mut C)
where
    P: BusPins,
    C: Console,
{
    chip.set_data_direction(Direction::Input);
    let mut row = [0u8; DUMP_ROW_SIZE];
    let mut addr: u32 = 0;
    for _ in 0..CHIP_CAPACITY / DUMP_ROW_SIZE {
        let base = addr;
        for slot in row.iter_mut() {
            *slot = chip.read_byte(addr as u16);
            addr += 1;
        }
        console.write_line(&format_row(base, &row));
    }
}

fn format_row(base: u32, row: &[u8]) -> DumpRow {
    let mut line = DumpRow::new();
    // Capacity is sized for a full row; write! cannot fail here.
    let _ = write!(line, "{:04x}: ", base);
    for &byte in row {
        let _ = write!(line, " {:02x}", byte);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_count_truncates_and_caps() {
        assert_eq!(part_count(0), 0);
        assert_eq!(part_count(127), 0);
        assert_eq!(part_count(128), 1);
        assert_eq!(part_count(300), 2);
        assert_eq!(part_count(65536), 512);
        // Oversized files never push the cursor past capacity.
        assert_eq!(part_count(u32::MAX), 512);
    }

    #[test]
    fn row_format_matches_display_convention() {
        let row = [0xAAu8; DUMP_ROW_SIZE];
        let line = format_row(0x0fe0, &row);
        assert!(line.starts_with("0fe0:  aa aa "));
        assert!(line.ends_with(" aa"));
        // "XXXX: " prefix plus 32 " hh" groups.
        assert_eq!(line.len(), 6 + 3 * DUMP_ROW_SIZE);
    }
}
