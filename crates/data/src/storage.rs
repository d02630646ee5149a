//! Key-value storage backends for the local cache.
//!
//! The interface mirrors a browser's synchronous key-value store: string keys,
//! string values, get / set / remove. Values are small JSON documents.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::StorageError;

/// A synchronous string key-value store.
pub trait Storage: Send + Sync + 'static {
    /// Read a value. `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails to read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or is full.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails to remove.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;
        // Replace atomically so a crash never leaves a half-written entry.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage. Clones share the same entries.
///
/// An optional byte quota (keys plus values) makes writes fail the way a full
/// browser store does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryEntries>>,
}

#[derive(Debug, Default)]
struct MemoryEntries {
    items: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryEntries {
    fn used_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes once `bytes` would be exceeded.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryEntries {
                items: HashMap::new(),
                quota: Some(bytes),
            })),
        }
    }

    /// Stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries().items.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, MemoryEntries> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries();
        if let Some(quota) = entries.quota {
            let needed = entries.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        entries.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries().items.remove(key);
        Ok(())
    }
}

/// Either storage backend behind one concrete type.
#[derive(Debug, Clone)]
pub enum Local {
    File(FileStorage),
    Memory(MemoryStorage),
}

impl Local {
    /// Short backend name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<FileStorage> for Local {
    fn from(storage: FileStorage) -> Self {
        Self::File(storage)
    }
}

impl From<MemoryStorage> for Local {
    fn from(storage: MemoryStorage) -> Self {
        Self::Memory(storage)
    }
}

impl Storage for Local {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::File(s) => s.get_item(key),
            Self::Memory(s) => s.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            Self::File(s) => s.set_item(key, value),
            Self::Memory(s) => s.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::File(s) => s.remove_item(key),
            Self::Memory(s) => s.remove_item(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("dulsan-storage-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = temp_dir();
        let storage = FileStorage::open(&dir).expect("open");

        assert_eq!(storage.get_item("dulsan_config").expect("get"), None);
        storage.set_item("dulsan_config", "{\"a\":1}").expect("set");
        assert_eq!(
            storage.get_item("dulsan_config").expect("get").as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove_item("dulsan_config").expect("remove");
        storage.remove_item("dulsan_config").expect("remove twice");
        assert_eq!(storage.get_item("dulsan_config").expect("get"), None);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = temp_dir();
        let storage = FileStorage::open(&dir).expect("open");

        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_memory_storage_is_shared_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set_item("k", "v").expect("set");
        assert_eq!(other.get_item("k").expect("get").as_deref(), Some("v"));
        assert_eq!(other.keys(), vec!["k".to_string()]);
    }

    #[test]
    fn test_memory_storage_quota() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").expect("fits");
        // Replacing the same key only counts the new value.
        storage.set_item("k", "123456789").expect("fits after replace");

        let err = storage.set_item("other", "x").expect_err("over quota");
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));
        assert_eq!(storage.get_item("other").expect("get"), None);
    }

    #[test]
    fn test_local_dispatches_to_backend() {
        let memory = MemoryStorage::new();
        let local = Local::from(memory.clone());
        assert_eq!(local.kind(), "memory");

        local.set_item("k", "v").expect("set");
        assert_eq!(memory.get_item("k").expect("get").as_deref(), Some("v"));
        local.remove_item("k").expect("remove");
        assert!(memory.keys().is_empty());
    }
}
