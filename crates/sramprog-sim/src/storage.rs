//! In-memory storage medium
//!
//! A shared map of named byte buffers. Clones share the same contents,
//! so a test can keep one handle while the dispatcher owns another.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use sramprog_core::error::{Error, Result};
use sramprog_core::storage::{File, Storage};

/// In-memory storage medium for tests
#[derive(Clone, Default)]
pub struct MemStorage {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    fail_opens: Rc<Cell<bool>>,
}

impl MemStorage {
    /// Create an empty medium
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file onto the medium, replacing any previous content
    pub fn insert(&self, name: &str, data: &[u8]) {
        self.files
            .borrow_mut()
            .insert(name.to_string(), data.to_vec());
    }

    /// Get a copy of a file's content, if present
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(name).cloned()
    }

    /// Names currently present on the medium
    pub fn names(&self) -> Vec<String> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Fault injection: make every subsequent open fail like a dying
    /// medium. Existence checks are unaffected.
    pub fn set_fail_opens(&self, fail: bool) {
        self.fail_opens.set(fail);
    }
}

/// Cursor over one file in a [`MemStorage`]
pub struct MemFile {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    name: String,
    pos: usize,
}

impl File for MemFile {
    fn size(&self) -> u32 {
        self.files
            .borrow()
            .get(&self.name)
            .map_or(0, |data| data.len() as u32)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let files = self.files.borrow();
        let data = files.get(&self.name).ok_or(Error::Storage)?;
        let remaining = data.len().saturating_sub(self.pos);
        let n = buf.len().min(remaining);
        buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, byte: u8) -> Result<()> {
        let mut files = self.files.borrow_mut();
        files.get_mut(&self.name).ok_or(Error::Storage)?.push(byte);
        Ok(())
    }
}

impl Storage for MemStorage {
    type File = MemFile;

    fn exists(&self, name: &str) -> bool {
        self.files.borrow().contains_key(name)
    }

    fn open(&mut self, name: &str) -> Result<MemFile> {
        if self.fail_opens.get() {
            return Err(Error::Storage);
        }
        if !self.exists(name) {
            return Err(Error::NotFound);
        }
        Ok(MemFile {
            files: Rc::clone(&self.files),
            name: name.to_string(),
            pos: 0,
        })
    }

    fn create(&mut self, name: &str) -> Result<MemFile> {
        let mut files = self.files.borrow_mut();
        if files.contains_key(name) {
            return Err(Error::AlreadyExists);
        }
        files.insert(name.to_string(), Vec::new());
        drop(files);
        Ok(MemFile {
            files: Rc::clone(&self.files),
            name: name.to_string(),
            pos: 0,
        })
    }
}
