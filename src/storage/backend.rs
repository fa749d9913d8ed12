//! Storage Backend Module
//!
//! Minimal string key-value interface satisfied by any durable store, with
//! in-memory and file-per-item implementations.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{CacheError, Result};

// == Storage Backend ==
/// Durable string key-value store.
///
/// Implementations must tolerate arbitrary keys within the cache's
/// storage-prefix namespace and treat removal of an absent key as a no-op.
pub trait StorageBackend: Send + Sync {
    /// Stores a value under a key, overwriting any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieves a value, or None when the key has never been written.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Removes a key.
    fn remove_item(&self, key: &str) -> Result<()>;
}

// == Memory Backend ==
/// In-process backend for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .map_err(|_| CacheError::Storage("storage mutex poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .items
            .lock()
            .map_err(|_| CacheError::Storage("storage mutex poisoned".to_string()))?
            .get(key)
            .cloned())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items
            .lock()
            .map_err(|_| CacheError::Storage("storage mutex poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

// == File Backend ==
/// One file per item under a root directory.
#[derive(Debug)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Opens a backend rooted at the given directory, creating it if missing.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Maps a storage key to a file path, flattening characters that are not
    /// safe in file names.
    fn item_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(name)
    }
}

impl StorageBackend for FileBackend {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.item_path(key), value)?;
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.item_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();

        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), Some("v".to_string()));

        backend.set_item("k", "v2").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_memory_backend_missing_key() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_item("absent").unwrap(), None);
    }

    #[test]
    fn test_memory_backend_remove() {
        let backend = MemoryBackend::new();

        backend.set_item("k", "v").unwrap();
        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);

        // Removing again is a no-op
        backend.remove_item("k").unwrap();
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        backend.set_item("cache_data", "{\"entries\":[]}").unwrap();
        assert_eq!(
            backend.get_item("cache_data").unwrap(),
            Some("{\"entries\":[]}".to_string())
        );

        backend.remove_item("cache_data").unwrap();
        assert_eq!(backend.get_item("cache_data").unwrap(), None);
    }

    #[test]
    fn test_file_backend_flattens_unsafe_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        backend.set_item("ns/with:odd chars", "v").unwrap();
        assert_eq!(
            backend.get_item("ns/with:odd chars").unwrap(),
            Some("v".to_string())
        );
    }

    #[test]
    fn test_file_backend_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path()).unwrap();

        assert_eq!(backend.get_item("absent").unwrap(), None);
        backend.remove_item("absent").unwrap();
    }
}
