//! Key/value storage for reader state

mod positions;

pub use positions::{position_key, PositionStore, LAST_BOOK_KEY};

use crate::error::StorageError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract string key/value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` when it was never written
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn delete(&self, key: &str) -> StorageResult<()>;
}

fn io_error(key: &str, e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::NotFound => StorageError::NotFound(format!("{}: {}", key, e)),
        ErrorKind::PermissionDenied => StorageError::PermissionDenied(format!("{}: {}", key, e)),
        _ => StorageError::BackendError(format!("{}: {}", key, e)),
    }
}

/// Local filesystem store, one file per key
///
/// File names are the hex SHA-256 digest of the key, so any book title,
/// however long, maps to a fixed-length name.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory; it is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.root.join(format!("{}.json", hex::encode(digest)))
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| io_error(key, e))?;
        tokio::fs::write(self.path_for(key), value)
            .await
            .map_err(|e| io_error(key, e))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// In-memory store (for tests and throwaway sessions)
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("memory store lock poisoned".to_string())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self.data.read().map_err(|_| Self::poisoned())?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.write().map_err(|_| Self::poisoned())?;
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let mut data = self.data.write().map_err(|_| Self::poisoned())?;
        data.remove(key);
        Ok(())
    }
}
