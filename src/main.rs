//! sramprog - parallel SRAM programmer/verifier
//!
//! Moves an exact byte image between a storage file and a 64KiB
//! byte-wide parallel SRAM addressed through a serial shift register,
//! verifying every transfer byte for byte. Commands arrive as text
//! lines on the console: `cdump`, `load <name>`, `fzero`/`fone`/
//! `f55`/`faa`, `fdump <name>`.
//!
//! On a host this binary drives the simulated bus from `sramprog-sim`
//! with a directory as the storage medium; the core protocol and
//! dispatcher are exactly what a pin-backed build would run.

mod cli;
mod console;
mod error;
mod storage;

use clap::Parser;

use sramprog_core::chip::SramChip;
use sramprog_core::dispatch::{Dispatcher, State};
use sramprog_sim::SimBus;

use cli::Cli;
use console::StdioConsole;
use storage::DirStorage;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    // Storage must come up before anything else; without it the system
    // refuses to start, like the original card-init halt.
    let storage = match DirStorage::open(&cli.dir) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("storage init failed: {}", e);
            std::process::exit(1);
        }
    };

    let chip = SramChip::new(SimBus::new());
    let mut dispatcher = Dispatcher::new(chip, storage, StdioConsole::new());

    dispatcher.boot_from(&cli.boot_image);
    dispatcher.run();

    if dispatcher.state() == State::Halted {
        log::error!("halted: loaded image failed verification");
        std::process::exit(1);
    }
}
