//! Mapping drag-and-drop events onto tree operations.

use crate::container::ContainerId;
use crate::controls::ControlId;
use crate::error::{FormError, FormResult};
use crate::factory::OptionMap;
use crate::form::Form;
use serde::{Deserialize, Serialize};

/// What was dragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DropPayload {
    /// A toolbox entry: a new control is created from it.
    #[serde(rename_all = "camelCase")]
    Template {
        type_tag: String,
        #[serde(default)]
        options: OptionMap,
    },
    /// A control already in the form.
    #[serde(rename_all = "camelCase")]
    Existing { control_id: ControlId },
}

/// A completed drop gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropEvent {
    pub source_container_id: ContainerId,
    pub target_container_id: ContainerId,
    pub previous_index: usize,
    pub current_index: usize,
    pub payload: DropPayload,
}

/// Tree operation a drop resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum DropAction {
    /// Create a control from a template and insert it.
    Insert {
        type_tag: String,
        options: OptionMap,
        target: ContainerId,
        index: usize,
    },
    /// Move a control into another container.
    Move {
        control_id: ControlId,
        source: ContainerId,
        target: ContainerId,
        index: usize,
    },
    /// Reorder the children of one container.
    Reorder {
        container: ContainerId,
        order: Vec<ControlId>,
    },
}

/// Resolve `event` against `form`.
///
/// Drops of an existing control within its own container become a reorder;
/// the control's actual position is used rather than `previous_index`.
pub fn route(form: &Form, event: &DropEvent) -> FormResult<DropAction> {
    let control_id = match &event.payload {
        DropPayload::Template { type_tag, options } => {
            return Ok(DropAction::Insert {
                type_tag: type_tag.clone(),
                options: options.clone(),
                target: event.target_container_id,
                index: event.current_index,
            });
        }
        DropPayload::Existing { control_id } => *control_id,
    };

    if event.source_container_id != event.target_container_id {
        return Ok(DropAction::Move {
            control_id,
            source: event.source_container_id,
            target: event.target_container_id,
            index: event.current_index,
        });
    }

    let container = form
        .resolve_container(&event.target_container_id)
        .ok_or_else(|| FormError::ContainerNotFound(event.target_container_id.to_string()))?;
    let mut order = container.ids();
    let from = order
        .iter()
        .position(|id| *id == control_id)
        .ok_or_else(|| FormError::ControlNotFound {
            control: control_id,
            container: event.target_container_id.to_string(),
        })?;
    if from != event.previous_index {
        log::debug!(
            "Drop reported index {} for {}, found at {}",
            event.previous_index,
            control_id,
            from
        );
    }

    let moved = order.remove(from);
    let to = event.current_index.min(order.len());
    order.insert(to, moved);

    Ok(DropAction::Reorder {
        container: event.target_container_id,
        order,
    })
}
