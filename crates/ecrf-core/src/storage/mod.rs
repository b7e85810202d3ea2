//! Storage abstraction for persistence.

mod file;
mod memory;
mod repository;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use repository::{DEFAULT_NAMESPACE, FormRepository, SavedFormMetadata};

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Form not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A synchronous string key-value store.
///
/// Implementations can keep entries in memory or on the filesystem. Values
/// are opaque strings; the repository layer owns the JSON encoding.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// List all keys.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Check if `key` is present.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}
