//! Containers and the identifier scheme used to address them.
//!
//! A container is an ordered list of controls. The root container belongs to
//! the form; every other container is a column of a columns layout and is
//! addressed as `column-<index>-<columnsId>`. There is no global index:
//! addresses are resolved by walking the tree from the root.
//!
//! Controls are held behind `Arc` so that a mutation only copies the path
//! from the root to the changed container (`Arc::make_mut`); untouched
//! subtrees stay shared with earlier snapshots.

use crate::controls::{Control, ControlId};
use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Spellings accepted for the root container.
pub const ROOT_ALIASES: [&str; 4] = ["main-canvas", "form-canvas", "root-canvas", "form"];

/// Canonical spelling of the root container.
pub const ROOT_CONTAINER: &str = "form";

const COLUMN_PREFIX: &str = "column-";

/// Address of a container within a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContainerId {
    /// The form's root container.
    Root,
    /// Column `index` of the columns control `columns_id`.
    Column { index: usize, columns_id: ControlId },
}

impl ContainerId {
    pub fn column(index: usize, columns_id: ControlId) -> Self {
        ContainerId::Column { index, columns_id }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, ContainerId::Root)
    }
}

impl FromStr for ContainerId {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized: String = trimmed
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        if ROOT_ALIASES.contains(&normalized.as_str()) {
            return Ok(ContainerId::Root);
        }

        let invalid = || FormError::InvalidContainerId(s.to_string());
        let rest = trimmed.strip_prefix(COLUMN_PREFIX).ok_or_else(invalid)?;
        let (index, columns_id) = rest.split_once('-').ok_or_else(invalid)?;
        let index = index.parse::<usize>().map_err(|_| invalid())?;
        let columns_id = columns_id.parse::<ControlId>().map_err(|_| invalid())?;
        Ok(ContainerId::Column { index, columns_id })
    }
}

impl TryFrom<String> for ContainerId {
    type Error = FormError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Root => f.write_str(ROOT_CONTAINER),
            ContainerId::Column { index, columns_id } => {
                write!(f, "{}{}-{}", COLUMN_PREFIX, index, columns_id)
            }
        }
    }
}

/// Route from the root to a nested container: for each level, the index of
/// a columns control in the current container and the column index within it.
/// The root container has the empty path.
pub(crate) type ContainerPath = Vec<(usize, usize)>;

/// An ordered collection of controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Container {
    controls: Vec<Arc<Control>>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container holding `controls` in order.
    pub fn from_controls(controls: Vec<Control>) -> Self {
        Self {
            controls: controls.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Controls in order.
    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter().map(|c| c.as_ref())
    }

    /// Ids of the direct children, in order.
    pub fn ids(&self) -> Vec<ControlId> {
        self.iter().map(Control::id).collect()
    }

    /// Control at `index`.
    pub fn get(&self, index: usize) -> Option<&Control> {
        self.controls.get(index).map(|c| c.as_ref())
    }

    /// Position of a direct child.
    pub fn position(&self, id: ControlId) -> Option<usize> {
        self.controls.iter().position(|c| c.id() == id)
    }

    /// Check if a control is a direct child.
    pub fn contains(&self, id: ControlId) -> bool {
        self.position(id).is_some()
    }

    /// Append a control.
    pub fn push(&mut self, control: Control) {
        self.controls.push(Arc::new(control));
    }

    /// Insert a control at `index`, clamped to `[0, len]`.
    /// Returns the index the control ended up at.
    pub fn insert(&mut self, index: usize, control: Control) -> usize {
        let at = index.min(self.controls.len());
        self.controls.insert(at, Arc::new(control));
        at
    }

    /// Remove a direct child.
    pub fn remove(&mut self, id: ControlId) -> Option<Control> {
        let pos = self.position(id)?;
        Some(Arc::unwrap_or_clone(self.controls.remove(pos)))
    }

    /// Replace a direct child with the same id, returning the old control.
    pub fn replace(&mut self, control: Control) -> Option<Control> {
        let pos = self.position(control.id())?;
        let old = std::mem::replace(&mut self.controls[pos], Arc::new(control));
        Some(Arc::unwrap_or_clone(old))
    }

    /// Rebuild the container in the order given by `order`.
    ///
    /// Ids that are not direct children are ignored, as are repeats. Children
    /// missing from `order` keep their relative order and go to the end, so
    /// the set of controls never changes.
    pub fn reorder(&mut self, order: &[ControlId]) {
        let mut remaining: Vec<Option<Arc<Control>>> =
            self.controls.drain(..).map(Some).collect();
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in order {
            let slot = remaining
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|c| c.id() == *id));
            if let Some(control) = slot.and_then(Option::take) {
                reordered.push(control);
            }
        }
        reordered.extend(remaining.into_iter().flatten());
        self.controls = reordered;
    }

    /// Find a control by id anywhere below this container, depth-first.
    pub fn find(&self, id: ControlId) -> Option<&Control> {
        for control in self.iter() {
            if control.id() == id {
                return Some(control);
            }
            if let Control::Columns(columns) = control {
                for container in columns.containers() {
                    if let Some(found) = container.find(id) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    /// Number of controls below this container, layouts included.
    pub fn control_count(&self) -> usize {
        self.iter()
            .map(|control| match control {
                Control::Columns(columns) => {
                    1 + columns.containers().map(Container::control_count).sum::<usize>()
                }
                _ => 1,
            })
            .sum()
    }

    /// Every control id below this container, depth-first.
    pub fn all_ids(&self) -> Vec<ControlId> {
        self.iter().flat_map(Control::all_ids).collect()
    }

    /// Deepest level of columns nesting below this container.
    pub fn columns_depth(&self) -> usize {
        self.iter().map(Control::columns_depth).max().unwrap_or(0)
    }

    /// Resolve an address to a container below (or equal to) this one.
    pub fn resolve(&self, id: &ContainerId) -> Option<&Container> {
        let path = self.path_to(id)?;
        self.at_path(&path)
    }

    /// Address of the container directly holding `control`.
    pub fn locate(&self, control: ControlId) -> Option<ContainerId> {
        let (path, _) = self.control_path(control)?;
        self.id_at_path(&path)
    }

    /// Path to an addressed container, if it exists.
    pub(crate) fn path_to(&self, id: &ContainerId) -> Option<ContainerPath> {
        match *id {
            ContainerId::Root => Some(Vec::new()),
            ContainerId::Column { index, columns_id } => {
                let (mut path, control_index) = self.columns_path(columns_id)?;
                path.push((control_index, index));
                self.at_path(&path)?;
                Some(path)
            }
        }
    }

    /// Path to the container holding the columns control `columns_id`,
    /// plus the control's index in it. Depth-first, first match wins.
    fn columns_path(&self, columns_id: ControlId) -> Option<(ContainerPath, usize)> {
        for (i, control) in self.iter().enumerate() {
            let Control::Columns(columns) = control else {
                continue;
            };
            if columns.id == columns_id {
                return Some((Vec::new(), i));
            }
            for (c, column) in columns.columns.iter().enumerate() {
                if let Some(container) = &column.container {
                    if let Some((mut path, index)) = container.columns_path(columns_id) {
                        path.insert(0, (i, c));
                        return Some((path, index));
                    }
                }
            }
        }
        None
    }

    /// Path to the container directly holding `id`, plus its index there.
    pub(crate) fn control_path(&self, id: ControlId) -> Option<(ContainerPath, usize)> {
        for (i, control) in self.iter().enumerate() {
            if control.id() == id {
                return Some((Vec::new(), i));
            }
            if let Control::Columns(columns) = control {
                for (c, column) in columns.columns.iter().enumerate() {
                    if let Some(container) = &column.container {
                        if let Some((mut path, index)) = container.control_path(id) {
                            path.insert(0, (i, c));
                            return Some((path, index));
                        }
                    }
                }
            }
        }
        None
    }

    pub(crate) fn at_path(&self, path: &[(usize, usize)]) -> Option<&Container> {
        let mut current = self;
        for &(control_index, column_index) in path {
            current = current
                .get(control_index)?
                .as_columns()?
                .container(column_index)?;
        }
        Some(current)
    }

    /// Mutable access along `path`, copying only the shared nodes on it.
    pub(crate) fn at_path_mut(&mut self, path: &[(usize, usize)]) -> Option<&mut Container> {
        let mut current = self;
        for &(control_index, column_index) in path {
            let control = Arc::make_mut(current.controls.get_mut(control_index)?);
            current = control.as_columns_mut()?.container_mut(column_index)?;
        }
        Some(current)
    }

    fn id_at_path(&self, path: &[(usize, usize)]) -> Option<ContainerId> {
        let Some((&(control_index, column_index), parent)) = path.split_last() else {
            return Some(ContainerId::Root);
        };
        let columns = self.at_path(parent)?.get(control_index)?.as_columns()?;
        Some(columns.container_id(column_index))
    }

    /// Check whether two containers share the same control allocation at `index`.
    #[cfg(test)]
    pub(crate) fn shares_control_with(&self, other: &Container, index: usize) -> bool {
        match (self.controls.get(index), other.controls.get(index)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
