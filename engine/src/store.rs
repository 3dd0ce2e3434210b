//! Durable key-value storage.
//!
//! The wizard persists three keys (see [`keys`]). Values are JSON documents;
//! the file-backed store keeps one `<key>.json` per key in its directory.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use charter_utils::{Durability, atomic_write_with, recover_backup};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub mod keys {
    /// Full registration snapshot.
    pub const REGISTRATION: &str = "registration";
    /// Set once the first restoration has happened.
    pub const INITIALIZED: &str = "initialized";
    /// Checklist item id → completed.
    pub const CHECKLIST_COMPLETION: &str = "checklist-completion";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("storage I/O failed for {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("stored value for {key} is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait KeyValueStore {
    /// Value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn put(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Typed read of `key`.
pub fn load<T, S>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    store
        .get(key)?
        .map(|value| {
            serde_json::from_value(value).map_err(|source| StoreError::Malformed {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

/// Typed write of `key`.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value).map_err(|source| StoreError::Malformed {
        key: key.to_string(),
        source,
    })?;
    store.put(key, value)
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

// ============================================================================
// FileStore
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    durability: Durability,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            durability: Durability::Synced,
        }
    }

    #[must_use]
    pub fn with_durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        recover_backup(&path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                key: key.to_string(),
                source,
            })
    }

    fn put(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let bytes = serde_json::to_vec_pretty(&value).map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })?;
        atomic_write_with(&path, &bytes, self.durability).map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.entries.remove(key);
        Ok(())
    }
}
