//! Transfer engine tests against the simulated board

use sramprog_core::chip::{SramChip, CHIP_CAPACITY};
use sramprog_core::error::Error;
use sramprog_core::storage::Storage;
use sramprog_core::transfer::{self, DUMP_ROW_SIZE, PART_SIZE};
use sramprog_sim::{MemStorage, ScriptConsole, SimBus};

fn chip() -> SramChip<SimBus> {
    SramChip::new(SimBus::new())
}

#[test]
fn write_touches_only_whole_parts() {
    let storage = MemStorage::new();
    storage.insert("image.bin", &[0x42; 300]);

    let mut chip = SramChip::new(SimBus::with_image(&[0xEE; CHIP_CAPACITY]));
    chip.select(true);
    let mut file = storage.clone().open("image.bin").unwrap();
    let written = transfer::write_file_to_chip(&mut chip, &mut file).unwrap();
    chip.select(false);

    // 300 bytes is two whole parts; the 44-byte tail is dropped.
    assert_eq!(written, 2 * PART_SIZE as u32);
    assert!(chip.pins().sram()[..256].iter().all(|&b| b == 0x42));
    assert!(chip.pins().sram()[256..].iter().all(|&b| b == 0xEE));
}

#[test]
fn verify_compares_only_whole_parts() {
    let image: Vec<u8> = (0..300).map(|i| i as u8).collect();
    let storage = MemStorage::new();
    storage.insert("image.bin", &image);

    let mut chip = chip();
    chip.select(true);
    let mut file = storage.clone().open("image.bin").unwrap();
    transfer::write_file_to_chip(&mut chip, &mut file).unwrap();

    // The chip never received the file's tail, yet verification passes
    // because the comparison truncates the same way the write did.
    let mut file = storage.clone().open("image.bin").unwrap();
    assert!(transfer::verify_against_file(&mut chip, &mut file).unwrap());
    chip.select(false);
}

#[test]
fn single_mismatch_fails_verification() {
    let image: Vec<u8> = (0..=255).collect();
    let storage = MemStorage::new();
    storage.insert("image.bin", &image);

    let mut chip = chip();
    chip.select(true);
    let mut file = storage.clone().open("image.bin").unwrap();
    transfer::write_file_to_chip(&mut chip, &mut file).unwrap();

    chip.pins_mut().sram_mut()[200] ^= 0x01;
    let mut file = storage.clone().open("image.bin").unwrap();
    assert!(!transfer::verify_against_file(&mut chip, &mut file).unwrap());

    chip.pins_mut().sram_mut()[200] ^= 0x01;
    let mut file = storage.clone().open("image.bin").unwrap();
    assert!(transfer::verify_against_file(&mut chip, &mut file).unwrap());
    chip.select(false);
}

#[test]
fn fill_is_idempotent() {
    let mut chip = chip();
    chip.select(true);
    transfer::fill_with_byte(&mut chip, 0x5A);
    assert!(chip.pins().sram().iter().all(|&b| b == 0x5A));
    transfer::fill_with_byte(&mut chip, 0x5A);
    chip.select(false);
    assert!(chip.pins().sram().iter().all(|&b| b == 0x5A));
}

#[test]
fn save_refuses_existing_destination() {
    let mut storage = MemStorage::new();
    storage.insert("taken.bin", &[9, 9, 9]);

    let mut chip = chip();
    chip.select(true);
    let result = transfer::read_chip_to_file(&mut chip, &mut storage, "taken.bin");
    chip.select(false);

    assert_eq!(result.err(), Some(Error::AlreadyExists));
    assert_eq!(storage.get("taken.bin").unwrap(), vec![9, 9, 9]);
}

#[test]
fn save_writes_full_address_space() {
    let mut storage = MemStorage::new();
    let mut chip = chip();
    chip.select(true);
    transfer::fill_with_byte(&mut chip, 0x3C);
    transfer::read_chip_to_file(&mut chip, &mut storage, "out.bin").unwrap();
    chip.select(false);

    let saved = storage.get("out.bin").unwrap();
    assert_eq!(saved.len(), CHIP_CAPACITY);
    assert!(saved.iter().all(|&b| b == 0x3C));
}

#[test]
fn dump_emits_formatted_rows() {
    let mut console = ScriptConsole::new();
    let mut chip = chip();
    chip.select(true);
    transfer::fill_with_byte(&mut chip, 0xAA);
    transfer::dump(&mut chip, &mut console);
    chip.select(false);

    let rows = console.output();
    assert_eq!(rows.len(), CHIP_CAPACITY / DUMP_ROW_SIZE);

    let expected = format!("0000: {}", " aa".repeat(DUMP_ROW_SIZE));
    assert_eq!(rows[0], expected);
    assert!(rows[1].starts_with("0020: "));
    assert!(rows[2].starts_with("0040: "));
    assert!(rows.last().unwrap().starts_with("fff0: "));

    for row in &rows {
        assert_eq!(row.split_whitespace().count(), 1 + DUMP_ROW_SIZE);
    }
}
