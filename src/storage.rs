//! Key-value storage hosts.
//!
//! The session store only needs a single string slot, so hosts expose plain
//! string keys and values. Serialization is the store's job.

use crate::error::{StorageError, StorageResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trait for key-value storage hosts.
pub trait KeyValueStorage {
    /// Read the value stored under `key`, or `None` if the slot is empty.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory storage.
///
/// Not persistent across restarts. An optional quota caps the total size of
/// stored keys and values, the way browser storage does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory storage holding at most `limit` bytes of keys and values.
    #[must_use]
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota: Some(limit),
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn used_without(&self, key: &str) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(limit) = self.quota {
            let needed = self.used_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// File-based storage.
///
/// Each key is a JSON file in a base directory.
#[derive(Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Create file storage in the default location (`~/.rsvp`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when the home directory cannot be resolved.
    pub fn default_path() -> StorageResult<Self> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| StorageError::unavailable("home directory not found"))?;
        Ok(Self::new(home.join(".rsvp")))
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe_key = key.replace([':', '/', '\\'], "_");
        self.base_path.join(format!("{safe_key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(self.entry_path(key)) {
            Ok(content) => {
                debug!(key = %key, "read storage file");
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        std::fs::create_dir_all(&self.base_path)?;
        std::fs::write(self.entry_path(key), value)?;
        debug!(key = %key, bytes = value.len(), "wrote storage file");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                debug!(key = %key, "removed storage file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
