//! Errors raised by tree mutations.

use crate::controls::{ControlId, ControlKind};
use thiserror::Error;

/// Mutation errors. A failed mutation leaves the form untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Control {control} not found in container {container}")]
    ControlNotFound { control: ControlId, container: String },
    #[error("Control {0} not found")]
    UnknownControl(ControlId),
    #[error("Container not found: {0}")]
    ContainerNotFound(String),
    #[error("Invalid container id: {0}")]
    InvalidContainerId(String),
    #[error("Control id {0} already exists in the form")]
    DuplicateControlId(ControlId),
    #[error("Columns nesting depth {depth} exceeds the maximum of {max}")]
    NestingTooDeep { depth: usize, max: usize },
    #[error("Cannot replace a {expected} control with a {found} control")]
    VariantMismatch {
        expected: ControlKind,
        found: ControlKind,
    },
}

/// Result type for tree mutations.
pub type FormResult<T> = Result<T, FormError>;
