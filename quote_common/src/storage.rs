//! Key-value slots backing the quote store and the session.
//!
//! The store keeps its state in named string slots, the same way a browser keeps
//! `localStorage`/`sessionStorage` entries:
//!
//! - `FileStorage`: durable slots, one file per key inside a data directory. Writes go
//!   to a temporary file first and are renamed into place.
//! - `MemoryStorage`: slots that live as long as the value itself; used for the
//!   session-scoped last-viewed quote and in tests.
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::QuoteError;
use crate::result::Result;

/// Durable slot holding the JSON array of quotes.
pub const QUOTES_KEY: &str = "quotes";
/// Durable slot holding the selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "lastCategory";
/// Older name of the selected category slot, still read as a fallback.
pub const LEGACY_SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session slot holding the JSON snapshot of the last displayed quote.
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

const SLOT_EXTENSION: &str = "slot";

/// Minimal string key-value storage.
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`, or `None` if the slot is empty.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Clears the slot. Clearing an empty slot is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Durable storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) the data directory at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!("File storage opened at {}", root.display());
        Ok(Self { root })
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(QuoteError::Storage(format!("invalid slot key {:?}", key)));
        }
        Ok(self.root.join(format!("{}.{}", key, SLOT_EXTENSION)))
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuoteError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let temp_path = path.with_extension(format!("{}.tmp", SLOT_EXTENSION));
        fs::write(&temp_path, value)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(QuoteError::Io(e));
        }
        debug!("Slot {} written ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuoteError::Io(e)),
        }
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set(QUOTES_KEY, "[]").unwrap();

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get(QUOTES_KEY).unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("quotes.slot.tmp").exists());
    }

    #[test]
    fn missing_slot_reads_as_none() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get(SELECTED_CATEGORY_KEY).unwrap(), None);
        storage.remove(SELECTED_CATEGORY_KEY).unwrap();
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        fs::create_dir(dir.path().join("quotes.slot")).unwrap();
        fs::write(dir.path().join("quotes.slot").join("occupant"), "x").unwrap();

        let err = storage.set(QUOTES_KEY, "[]").unwrap_err();

        assert!(matches!(err, QuoteError::Io(_)));
        assert!(!dir.path().join("quotes.slot.tmp").exists());
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        let err = storage.set("../outside", "x").unwrap_err();
        assert!(matches!(err, QuoteError::Storage(_)));
    }

    #[test]
    fn memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        storage.set(LAST_VIEWED_KEY, "{}").unwrap();
        assert_eq!(storage.get(LAST_VIEWED_KEY).unwrap().as_deref(), Some("{}"));
        storage.remove(LAST_VIEWED_KEY).unwrap();
        assert_eq!(storage.get(LAST_VIEWED_KEY).unwrap(), None);
    }
}
