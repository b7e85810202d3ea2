//! Form persistence over a key-value store.
//!
//! Every form is stored as JSON under `<namespace><key>`. Keys handed to and
//! returned by the repository never include the namespace.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::form::{Form, FormStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default key prefix for persisted forms.
pub const DEFAULT_NAMESPACE: &str = "ecrf_";

/// Summary of a persisted form, as shown in a form list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFormMetadata {
    /// Repository key (without namespace).
    pub key: String,
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: FormStatus,
    pub control_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedFormMetadata {
    fn new(key: String, form: &Form) -> Self {
        Self {
            key,
            id: form.id.clone(),
            title: form.title.clone(),
            description: form.description.clone(),
            status: form.status,
            control_count: form.control_count(),
            created_at: form.created_at,
            updated_at: form.updated_at,
        }
    }
}

/// Saves, loads and lists forms in a [`KeyValueStore`].
#[derive(Clone)]
pub struct FormRepository {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl std::fmt::Debug for FormRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormRepository")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl FormRepository {
    /// Create a repository using the default namespace.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// Persist `form` under `key`, or under the form's id when no key is
    /// given. The stored copy gets a fresh `updated_at`. Returns the key.
    pub fn save(&self, form: &Form, key: Option<&str>) -> StorageResult<String> {
        let mut stamped = form.clone();
        stamped.updated_at = Utc::now();
        self.write(&stamped, key)
    }

    /// Persist `form` exactly as given, timestamps included.
    pub fn write(&self, form: &Form, key: Option<&str>) -> StorageResult<String> {
        let key = key.unwrap_or(form.id.as_str()).to_string();
        let json = form
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.store.set(&self.storage_key(&key), &json)?;
        log::info!("Saved form '{}' as {}", form.title, key);
        Ok(key)
    }

    /// Load the form stored under `key`.
    pub fn load(&self, key: &str) -> StorageResult<Form> {
        let json = self
            .store
            .get(&self.storage_key(key))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;

        Form::from_json(&json)
            .map_err(|e| StorageError::Serialization(format!("Failed to parse {}: {}", key, e)))
    }

    /// List every stored form, most recently updated first.
    ///
    /// Entries that fail to parse are skipped with a warning.
    pub fn list(&self) -> StorageResult<Vec<SavedFormMetadata>> {
        let mut forms = Vec::new();

        for storage_key in self.store.keys()? {
            let Some(key) = storage_key.strip_prefix(&self.namespace) else {
                continue;
            };
            match self.load(key) {
                Ok(form) => forms.push(SavedFormMetadata::new(key.to_string(), &form)),
                Err(e) => log::warn!("Skipping stored form {}: {}", key, e),
            }
        }

        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(forms)
    }

    /// Delete the form stored under `key`.
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        self.store.remove(&self.storage_key(key))?;
        log::info!("Deleted form {}", key);
        Ok(())
    }

    /// Check if a form is stored under `key`.
    pub fn exists(&self, key: &str) -> StorageResult<bool> {
        self.store.contains(&self.storage_key(key))
    }
}
