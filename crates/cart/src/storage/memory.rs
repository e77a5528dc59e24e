use std::collections::HashMap;
use std::sync::RwLock;

use super::KeyValueStore;
use crate::error::StorageError;

/// In-memory key-value store.
///
/// Contents live as long as the value does. Cloning is not supported; share
/// it through [`super::SharedStorage`] instead.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a single entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_owned(), value.to_owned());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .clear();
        Ok(())
    }
}
