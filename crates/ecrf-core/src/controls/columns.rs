//! Columns layout control: a fixed row of nested containers.

use super::{ControlId, ControlKind, ControlTrait};
use crate::container::{Container, ContainerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of columns of a new layout when none is requested.
pub const DEFAULT_COLUMN_COUNT: usize = 2;

/// Upper bound on the column count of one layout.
pub const MAX_COLUMN_COUNT: usize = 12;

/// A single column. Persisted documents may lack the container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
}

impl Column {
    /// Create a column with an empty container.
    pub fn new() -> Self {
        Self {
            container: Some(Container::new()),
        }
    }
}

/// A layout control owning `N` sub-containers side by side.
/// Layouts can contain other layouts, enabling nested hierarchies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    pub(crate) id: ControlId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub(crate) columns: Vec<Column>,
}

impl Columns {
    /// Create a layout with `count` empty columns (clamped to `1..=MAX_COLUMN_COUNT`).
    pub fn new(title: String, count: usize) -> Self {
        let count = count.clamp(1, MAX_COLUMN_COUNT);
        Self {
            id: Uuid::new_v4(),
            title,
            columns: (0..count).map(|_| Column::new()).collect(),
        }
    }

    /// Number of columns. Fixed for the lifetime of the control.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Container of the column at `index`.
    pub fn container(&self, index: usize) -> Option<&Container> {
        self.columns.get(index)?.container.as_ref()
    }

    /// Mutable container of the column at `index`.
    pub fn container_mut(&mut self, index: usize) -> Option<&mut Container> {
        self.columns.get_mut(index)?.container.as_mut()
    }

    /// Every present sub-container, in column order.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.columns.iter().filter_map(|c| c.container.as_ref())
    }

    /// Address of the column at `index`.
    pub fn container_id(&self, index: usize) -> ContainerId {
        ContainerId::column(index, self.id)
    }

    /// Levels of columns nesting, counting this layout as 1.
    pub fn nesting_depth(&self) -> usize {
        1 + self
            .containers()
            .flat_map(|container| container.iter())
            .map(|control| control.columns_depth())
            .max()
            .unwrap_or(0)
    }

    /// Replace every nested control by its duplicate.
    pub(crate) fn duplicate_children(&mut self) {
        for column in &mut self.columns {
            if let Some(container) = &mut column.container {
                let copies: Vec<_> = container.iter().map(|c| c.duplicate()).collect();
                *container = Container::from_controls(copies);
            }
        }
    }
}

impl ControlTrait for Columns {
    fn id(&self) -> ControlId {
        self.id
    }

    fn kind(&self) -> ControlKind {
        ControlKind::Columns
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn has_value(&self) -> bool {
        false
    }

    fn clear_value(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Control;

    #[test]
    fn test_column_count_is_clamped() {
        assert_eq!(Columns::new(String::new(), 0).column_count(), 1);
        assert_eq!(Columns::new(String::new(), 3).column_count(), 3);
        assert_eq!(Columns::new(String::new(), 99).column_count(), MAX_COLUMN_COUNT);
    }

    #[test]
    fn test_nesting_depth() {
        let mut outer = Columns::new("Outer".to_string(), 2);
        assert_eq!(outer.nesting_depth(), 1);

        let inner = Columns::new("Inner".to_string(), 2);
        outer.container_mut(0).unwrap().push(Control::Columns(inner));
        assert_eq!(outer.nesting_depth(), 2);
    }

    #[test]
    fn test_duplicate_gives_nested_controls_new_ids() {
        let mut columns = Columns::new("Layout".to_string(), 2);
        let child = Control::with_defaults(crate::controls::ControlKind::TextInput, "Name");
        let child_id = child.id();
        columns.container_mut(0).unwrap().push(child);

        let copy = Control::Columns(columns.clone()).duplicate();
        let copy = copy.as_columns().unwrap();
        assert_ne!(copy.id, columns.id);
        let copied_child = copy.container(0).unwrap().get(0).unwrap();
        assert_ne!(copied_child.id(), child_id);
        assert_eq!(copied_child.title(), "Name");
    }

    #[test]
    fn test_missing_container_deserializes() {
        let json = r#"{
            "id": "7f0c6c5e-1b4f-4f43-9c71-1f7f4b1f2a10",
            "title": "L",
            "columns": [{}, {"container": []}]
        }"#;
        let columns: Columns = serde_json::from_str(json).unwrap();
        assert_eq!(columns.column_count(), 2);
        assert!(columns.container(0).is_none());
        assert!(columns.container(1).is_some());
    }
}
