use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::KeyValueStore;
use crate::error::StorageError;

const VALUE_EXTENSION: &str = "json";

/// File-backed key-value store.
///
/// Each key maps to `<root>/<key>.json`. Every write goes to its own hidden
/// temporary file in the same directory and is renamed over the target, so a
/// reader never observes a half-written value, even with several writers. The
/// root directory is created on first write.
///
/// Keys are restricted to ASCII letters, digits, `-`, `_` and `.`, and may not
/// start with `.`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. No I/O happens until first use.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.{VALUE_EXTENSION}")))
    }

}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.value_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.root).map_err(|e| StorageError::io(&self.root, e))?;

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{key}."))
            .suffix(".tmp")
            .tempfile_in(&self.root)
            .map_err(|e| StorageError::io(&self.root, e))?;
        temp.write_all(value.as_bytes())
            .map_err(|e| StorageError::io(temp.path(), e))?;
        temp.persist(&path)
            .map_err(|e| StorageError::io(&path, e.error))?;

        debug!(key, bytes = value.len(), path = %path.display(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::io(&self.root, e)),
        };

        for entry in entries {
            let path = entry.map_err(|e| StorageError::io(&self.root, e))?.path();
            let is_value = path
                .extension()
                .is_some_and(|ext| ext == VALUE_EXTENSION);
            if is_value && path.is_file() {
                fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
            }
        }

        debug!(root = %self.root.display(), "Cleared store");
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}
