//! Key-value media the store can sit on.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::Result;

/// A string key-value medium.
///
/// Values are opaque serialized payloads; the store owns their format.
pub trait Backend: std::fmt::Debug {
    /// Whether the medium can persist anything at all.
    ///
    /// When this is `false` the store reads empty collections and drops writes.
    fn is_available(&self) -> bool {
        true
    }

    /// Bytes the medium occupies on disk, 0 when nothing is on disk.
    fn size_bytes(&self) -> u64 {
        0
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium fails.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium fails.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium fails.
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several keys so that either all of them land or none do.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium fails; no entry is written in that case.
    fn write_batch(&self, entries: &[(&str, String)]) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn size_bytes(&self) -> u64 {
        (**self).size_bytes()
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> Result<()> {
        (**self).write_batch(entries)
    }
}

/// Process-local map. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn write_batch(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut map = self.entries.borrow_mut();
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

/// Stand-in for a context with no persistence medium.
///
/// Reads find nothing and writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableBackend;

impl Backend for UnavailableBackend {
    fn is_available(&self) -> bool {
        false
    }

    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn write_batch(&self, _entries: &[(&str, String)]) -> Result<()> {
        Ok(())
    }
}
