//! CLI argument parsing

use clap::Parser;
use sramprog_core::dispatch::DEFAULT_IMAGE;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sramprog")]
#[command(author, version, about = "Parallel SRAM programmer/verifier", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding the image files (the storage medium)
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Image uploaded and verified at boot
    #[arg(long, default_value = DEFAULT_IMAGE)]
    pub boot_image: String,
}
