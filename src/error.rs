//! Error types for the host binary

use std::path::PathBuf;
use thiserror::Error;

/// Host-side failures (storage medium setup, console I/O)
#[derive(Debug, Error)]
pub enum HostError {
    /// Storage root is missing or not a directory
    #[error("storage directory {0} does not exist or is not a directory")]
    NotADirectory(PathBuf),

    /// Underlying filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
