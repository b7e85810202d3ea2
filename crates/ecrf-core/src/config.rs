//! Engine configuration, loaded from `config.toml`.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::storage::{DEFAULT_NAMESPACE, FileStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default maximum nesting depth of columns layouts.
pub const DEFAULT_MAX_COLUMN_DEPTH: usize = 3;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Tunables of the form engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting depth of columns layouts (1 = no nesting).
    pub max_column_depth: usize,
    /// Number of undo states kept.
    pub history_limit: usize,
    /// Key prefix of persisted forms.
    pub storage_namespace: String,
    /// Directory of the file store. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_column_depth: DEFAULT_MAX_COLUMN_DEPTH,
            history_limit: DEFAULT_HISTORY_LIMIT,
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            storage_dir: None,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load the configuration at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Default config file location, `<config dir>/ecrf/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("ecrf").join("config.toml"))
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Directory of the file store: the configured one, or the default.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir
            .clone()
            .or_else(|| FileStore::default_dir().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_column_depth, 3);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.storage_namespace, "ecrf_");
        assert_eq!(config.storage_dir, None);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str("history_limit = 5\n").unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.max_column_depth, DEFAULT_MAX_COLUMN_DEPTH);
    }

    #[test]
    fn test_malformed_toml() {
        let result = EngineConfig::from_toml_str("history_limit = \"many\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "max_column_depth = 2\nstorage_namespace = \"trial_\"\nstorage_dir = \"/tmp/forms\"\n",
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.max_column_depth, 2);
        assert_eq!(config.storage_namespace, "trial_");
        assert_eq!(config.storage_dir(), Some(PathBuf::from("/tmp/forms")));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EngineConfig {
            history_limit: 10,
            ..Default::default()
        };
        let toml = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&toml).unwrap(), config);
    }
}
