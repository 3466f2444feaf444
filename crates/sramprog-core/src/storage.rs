//! Storage collaborator traits
//!
//! The storage medium (an SD card in the field, a directory or an
//! in-memory map on a host) is an external collaborator with
//! POSIX-file-like semantics. The transfer engine only needs the small
//! surface below; opening a file that does not exist is
//! [`Error::NotFound`](crate::Error::NotFound), creating one that does
//! is [`Error::AlreadyExists`](crate::Error::AlreadyExists).
//!
//! File handles are scoped to a single transfer operation and are
//! closed by dropping them.

use crate::error::Result;

/// An open file on the storage medium
pub trait File {
    /// Total size of the file in bytes
    fn size(&self) -> u32;

    /// Read up to `buf.len()` bytes from the current position.
    ///
    /// Returns the number of bytes actually read; 0 means end of file.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Append one byte to the file
    fn write(&mut self, byte: u8) -> Result<()>;
}

/// The storage medium itself
pub trait Storage {
    /// File handle type produced by this medium
    type File: File;

    /// Whether a file with the given name exists
    fn exists(&self, name: &str) -> bool;

    /// Open an existing file for reading
    fn open(&mut self, name: &str) -> Result<Self::File>;

    /// Create a new file for writing; refuses to overwrite
    fn create(&mut self, name: &str) -> Result<Self::File>;
}
