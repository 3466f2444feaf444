//! Directory-backed storage medium
//!
//! Maps the storage collaborator onto a plain directory: every image
//! name is a file directly under the configured root. Creation uses
//! `create_new` so the no-overwrite guarantee comes from the
//! filesystem itself.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use sramprog_core::error::{Error, Result};
use sramprog_core::storage::{File, Storage};

use crate::error::HostError;

/// Storage medium rooted at a directory
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Open the medium; the root must already exist as a directory
    pub fn open(root: &Path) -> std::result::Result<Self, HostError> {
        if !root.is_dir() {
            return Err(HostError::NotADirectory(root.to_path_buf()));
        }
        log::info!("storage: using directory {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// An open file under the storage root
pub struct DirFile {
    file: fs::File,
    size: u32,
}

impl File for DirFile {
    fn size(&self) -> u32 {
        self.size
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.file.read(buf).map_err(|e| {
            log::error!("storage read failed: {}", e);
            Error::Storage
        })
    }

    fn write(&mut self, byte: u8) -> Result<()> {
        self.file.write_all(&[byte]).map_err(|e| {
            log::error!("storage write failed: {}", e);
            Error::Storage
        })
    }
}

impl Storage for DirStorage {
    type File = DirFile;

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn open(&mut self, name: &str) -> Result<DirFile> {
        let path = self.path_for(name);
        let file = fs::File::open(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound,
            _ => {
                log::error!("opening {} failed: {}", path.display(), e);
                Error::Storage
            }
        })?;
        let size = file
            .metadata()
            .map_err(|_| Error::Storage)?
            .len()
            .min(u32::MAX as u64) as u32;
        Ok(DirFile { file, size })
    }

    fn create(&mut self, name: &str) -> Result<DirFile> {
        let path = self.path_for(name);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => Error::AlreadyExists,
                _ => {
                    log::error!("creating {} failed: {}", path.display(), e);
                    Error::Storage
                }
            })?;
        Ok(DirFile { file, size: 0 })
    }
}
