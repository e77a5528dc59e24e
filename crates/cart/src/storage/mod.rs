//! Durable key-value storage.
//!
//! The cart and the shopper's preferences persist as string blobs under
//! well-known keys, the way a browser's local storage would hold them.
//! Two backends are provided:
//!
//! - [`MemoryStore`] - process-local, for tests and throwaway sessions
//! - [`FileStore`] - one file per key under a data directory
//!
//! Writes are synchronous. Nothing here coordinates between processes;
//! two writers on the same key resolve as last writer wins.

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// A durable string-keyed blob store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Storage handle shared between the cart and preferences.
pub type SharedStorage = Arc<dyn KeyValueStore>;
