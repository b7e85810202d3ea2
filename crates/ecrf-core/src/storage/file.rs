//! File-based storage implementation.

use super::{KeyValueStore, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Application directory name under the platform data directory.
const APP_DIR: &str = "ecrf";

/// File-based storage.
///
/// Stores each entry as a JSON file in a specified directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Base directory for entries.
    base_path: PathBuf,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Default storage directory.
    ///
    /// On Linux: `~/.local/share/ecrf/forms/`
    /// On Windows: `%LOCALAPPDATA%\ecrf\forms\`
    pub fn default_dir() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join(APP_DIR).join("forms"))
    }

    /// Create a file store in the default location.
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_dir()?)
    }

    /// Get the file path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_key(key)))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Map a key onto a file stem.
///
/// ASCII letters, digits and `-` are kept; every other byte, `_` included,
/// becomes `_XX` (uppercase hex). The mapping is reversible by [`decode_key`].
fn encode_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02X}", byte));
        }
    }
    stem
}

/// Recover the key from a file stem written by [`encode_key`].
///
/// Returns `None` for stems this store did not produce.
fn decode_key(stem: &str) -> Option<String> {
    let bytes = stem.as_bytes();
    let mut key = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                let hex = stem.get(i + 1..i + 3)?;
                key.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'-' => {
                key.push(b);
                i += 1;
            }
            _ => return None,
        }
    }
    String::from_utf8(key).ok()
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.entry_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // Only .json files are entries
            if path.extension().is_some_and(|ext| ext == "json") {
                match path.file_stem().and_then(|s| s.to_str()).and_then(decode_key) {
                    Some(key) => keys.push(key),
                    None => log::debug!("Ignoring foreign file {}", path.display()),
                }
            }
        }
        Ok(keys)
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.entry_path(key).exists())
    }
}
