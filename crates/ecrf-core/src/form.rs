//! The form document: metadata plus the root container.

use crate::container::{Container, ContainerId};
use crate::controls::{Control, ControlId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Publication state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormStatus::Draft => write!(f, "draft"),
            FormStatus::Published => write!(f, "published"),
            FormStatus::Archived => write!(f, "archived"),
        }
    }
}

/// A form document. Snapshots of it are immutable once published; every
/// change goes through a copy (see `engine`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Unique document identifier.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// The root container.
    #[serde(default)]
    pub container: Container,
    /// Incremented on every committed change.
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: FormStatus,
}

impl Default for Form {
    fn default() -> Self {
        Self::new("Untitled Form")
    }
}

impl Form {
    /// Create a new empty draft.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            container: Container::new(),
            version: 0,
            created_at: now,
            updated_at: now,
            status: FormStatus::Draft,
        }
    }

    /// Mark a committed change: bump the version and the update time.
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Get a control by id, anywhere in the tree.
    pub fn find_control(&self, id: ControlId) -> Option<&Control> {
        self.container.find(id)
    }

    /// Address of the container holding `id`.
    pub fn locate_control(&self, id: ControlId) -> Option<ContainerId> {
        self.container.locate(id)
    }

    /// Resolve a container address.
    pub fn resolve_container(&self, id: &ContainerId) -> Option<&Container> {
        self.container.resolve(id)
    }

    /// Check if the form has no controls.
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    /// Total number of controls, nested ones included.
    pub fn control_count(&self) -> usize {
        self.container.control_count()
    }

    /// Every control id in the tree, depth-first.
    pub fn all_control_ids(&self) -> Vec<ControlId> {
        self.container.all_ids()
    }

    /// Serialize the form to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a form from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
