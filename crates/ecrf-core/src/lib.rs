//! ecrf Core Library
//!
//! Document model and mutation engine for the ecrf form builder: typed
//! controls, nested containers, moves and reorders across columns,
//! validation, undo history and persistence.

pub mod config;
pub mod container;
pub mod controls;
pub mod drop;
mod engine;
pub mod error;
pub mod factory;
pub mod form;
pub mod history;
pub mod notify;
pub mod storage;
pub mod store;
pub mod validation;

pub use config::{ConfigError, EngineConfig};
pub use container::{Container, ContainerId};
pub use controls::{Control, ControlId, ControlKind, ControlTrait};
pub use drop::{DropAction, DropEvent, DropPayload};
pub use error::{FormError, FormResult};
pub use factory::{ControlFactory, ControlRegistry, OptionMap};
pub use form::{Form, FormStatus};
pub use history::History;
pub use notify::{LogNotifier, Notifier};
pub use storage::{FileStore, FormRepository, KeyValueStore, MemoryStore, StorageError};
pub use store::{DialogOutcome, FormStore, Snapshot};
pub use validation::{ValidationReport, validate};
