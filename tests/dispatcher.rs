//! Dispatcher state-machine tests: boot sequence, command loop,
//! fail-fast halting

use sramprog_core::chip::{SramChip, CHIP_CAPACITY};
use sramprog_core::dispatch::{Dispatcher, State, DEFAULT_IMAGE};
use sramprog_sim::{MemStorage, ScriptConsole, SimBus};

type SimDispatcher = Dispatcher<SimBus, MemStorage, ScriptConsole>;

fn setup(boot_image: Option<&[u8]>) -> (SimDispatcher, MemStorage, ScriptConsole) {
    let storage = MemStorage::new();
    if let Some(data) = boot_image {
        storage.insert(DEFAULT_IMAGE, data);
    }
    let console = ScriptConsole::new();
    let dispatcher = Dispatcher::new(
        SramChip::new(SimBus::new()),
        storage.clone(),
        console.clone(),
    );
    (dispatcher, storage, console)
}

#[test]
fn boot_uploads_and_verifies_default_image() {
    let image: Vec<u8> = (0..=255).collect();
    let (mut dispatcher, _storage, console) = setup(Some(&image));

    dispatcher.boot();

    assert_eq!(dispatcher.state(), State::Ready);
    assert_eq!(&dispatcher.chip().pins().sram()[..256], &image[..]);
    assert!(console.output_contains("Integrity check passed."));
}

#[test]
fn boot_skips_missing_image() {
    let (mut dispatcher, _storage, console) = setup(None);

    dispatcher.boot();

    assert_eq!(dispatcher.state(), State::Ready);
    assert!(console.output_contains("Could not find dump file data.bin"));
    assert!(dispatcher.chip().pins().sram().iter().all(|&b| b == 0));
}

#[test]
fn corrupted_upload_halts_the_system_for_good() {
    let (mut dispatcher, _storage, console) = setup(Some(&[0xFF; 128]));
    // D0 shorted low: every committed byte reads back 0xFE.
    dispatcher.chip_mut().pins_mut().set_stuck_low_mask(0x01);

    dispatcher.boot();

    assert_eq!(dispatcher.state(), State::Halted);
    assert!(console.output_contains("Memory check failed. Abort."));

    // No command is ever processed again.
    console.push_line("fzero");
    dispatcher.run();
    assert_eq!(dispatcher.state(), State::Halted);
    assert_eq!(dispatcher.chip().pins().sram()[0], 0xFE);
}

#[test]
fn unreadable_image_is_reported_and_skipped() {
    let (mut dispatcher, storage, console) = setup(Some(&[0x7E; 128]));
    storage.set_fail_opens(true);

    dispatcher.boot();

    assert_eq!(dispatcher.state(), State::Ready);
    assert!(console.output_contains("Could not open file data.bin"));
    assert!(dispatcher.chip().pins().sram().iter().all(|&b| b == 0));
}

#[test]
fn load_command_uploads_named_image() {
    let (mut dispatcher, storage, console) = setup(None);
    storage.insert("other.bin", &[0x21; 128]);

    console.push_line("load other.bin");
    dispatcher.run();

    assert_eq!(dispatcher.state(), State::Ready);
    assert!(dispatcher.chip().pins().sram()[..128]
        .iter()
        .all(|&b| b == 0x21));
    assert!(console.output_contains("Integrity check passed."));
}

#[test]
fn load_without_filename_is_ignored() {
    let (mut dispatcher, _storage, console) = setup(None);

    console.push_line("load");
    dispatcher.run();

    assert_eq!(dispatcher.state(), State::Ready);
    assert!(dispatcher.chip().pins().sram().iter().all(|&b| b == 0));
}

#[test]
fn unknown_command_changes_nothing() {
    let (mut dispatcher, storage, console) = setup(None);
    let before = console.output().len();

    console.push_line("frobnicate");
    console.push_line("LOAD data.bin");
    dispatcher.run();

    assert_eq!(dispatcher.state(), State::Ready);
    assert!(dispatcher.chip().pins().sram().iter().all(|&b| b == 0));
    assert!(storage.names().is_empty());
    assert_eq!(console.output().len(), before);
}

#[test]
fn fill_commands_cover_all_four_patterns() {
    for (command, value) in [
        ("fone", 0xFFu8),
        ("f55", 0x55),
        ("faa", 0xAA),
        ("fzero", 0x00),
    ] {
        let (mut dispatcher, _storage, console) = setup(None);
        console.push_line(command);
        dispatcher.run();
        assert!(
            dispatcher.chip().pins().sram().iter().all(|&b| b == value),
            "{} should fill with {:#04x}",
            command,
            value
        );
        assert!(console.output_contains(&format!("Filling memory with byte {}", value)));
        assert!(console.output_contains("Complete"));
    }
}

#[test]
fn fdump_saves_once_and_never_overwrites() {
    let (mut dispatcher, storage, console) = setup(None);

    console.push_line("faa");
    console.push_line("fdump save.bin");
    dispatcher.run();

    let saved = storage.get("save.bin").unwrap();
    assert_eq!(saved.len(), CHIP_CAPACITY);
    assert!(saved.iter().all(|&b| b == 0xAA));
    assert!(console.output_contains("Dump complete"));

    // Change the chip, then try to dump onto the same name.
    console.push_line("fzero");
    console.push_line("fdump save.bin");
    dispatcher.run();

    assert!(console.output_contains("File with name save.bin already exists."));
    assert!(storage.get("save.bin").unwrap().iter().all(|&b| b == 0xAA));
}

#[test]
fn cdump_prints_the_whole_address_space() {
    let (mut dispatcher, _storage, console) = setup(None);

    console.push_line("f55");
    console.push_line("cdump");
    dispatcher.run();

    let rows: Vec<String> = console
        .output()
        .into_iter()
        .filter(|line| line.len() > 5 && line.as_bytes()[4] == b':')
        .collect();
    assert_eq!(rows.len(), 2048);
    assert!(rows[0].starts_with("0000:  55 55 "));
    assert!(rows[2047].starts_with("fff0: "));
}
