//! Tree mutations: insert, remove, move, reorder and replace.
//!
//! Every operation resolves its addresses by walking from the root, works on
//! a copy of the root container and only commits it when all steps succeed,
//! so a failing call never leaves a partially applied change behind.

use crate::container::ContainerId;
use crate::controls::{Control, ControlId};
use crate::error::{FormError, FormResult};
use crate::form::Form;
use std::collections::HashSet;

impl Form {
    /// Insert a new control into `target` at `index` (clamped).
    ///
    /// Rejects controls whose id, or any nested id, is already in the form,
    /// and layouts that would nest deeper than `max_depth`.
    pub fn insert_control(
        &mut self,
        target: &ContainerId,
        index: usize,
        control: Control,
        max_depth: usize,
    ) -> FormResult<usize> {
        let existing: HashSet<ControlId> = self.all_control_ids().into_iter().collect();
        let mut incoming = HashSet::new();
        for id in control.all_ids() {
            if existing.contains(&id) || !incoming.insert(id) {
                return Err(FormError::DuplicateControlId(id));
            }
        }

        let mut root = self.container.clone();
        let path = root
            .path_to(target)
            .ok_or_else(|| FormError::ContainerNotFound(target.to_string()))?;
        check_depth(path.len(), &control, max_depth)?;
        let container = root
            .at_path_mut(&path)
            .ok_or_else(|| FormError::ContainerNotFound(target.to_string()))?;
        let at = container.insert(index, control);

        self.container = root;
        Ok(at)
    }

    /// Remove a control from wherever it lives.
    pub fn remove_control(&mut self, id: ControlId) -> FormResult<Control> {
        let mut root = self.container.clone();
        let (path, _) = root
            .control_path(id)
            .ok_or(FormError::UnknownControl(id))?;
        let removed = root
            .at_path_mut(&path)
            .and_then(|container| container.remove(id))
            .ok_or(FormError::UnknownControl(id))?;

        self.container = root;
        Ok(removed)
    }

    /// Move a control from `source` to `target`, inserting it at `index`
    /// (clamped to the target's length after removal).
    ///
    /// The control must be a direct child of `source`. Moving a layout into
    /// one of its own columns fails with `ContainerNotFound`, because the
    /// target is no longer reachable once the layout has been taken out.
    pub fn move_control(
        &mut self,
        id: ControlId,
        source: &ContainerId,
        target: &ContainerId,
        index: usize,
        max_depth: usize,
    ) -> FormResult<usize> {
        let mut root = self.container.clone();

        let source_path = root
            .path_to(source)
            .ok_or_else(|| FormError::ContainerNotFound(source.to_string()))?;
        let control = root
            .at_path_mut(&source_path)
            .and_then(|container| container.remove(id))
            .ok_or_else(|| FormError::ControlNotFound {
                control: id,
                container: source.to_string(),
            })?;

        let target_path = root
            .path_to(target)
            .ok_or_else(|| FormError::ContainerNotFound(target.to_string()))?;
        check_depth(target_path.len(), &control, max_depth)?;
        let at = root
            .at_path_mut(&target_path)
            .ok_or_else(|| FormError::ContainerNotFound(target.to_string()))?
            .insert(index, control);

        self.container = root;
        Ok(at)
    }

    /// Reorder the direct children of `target` (see `Container::reorder`).
    pub fn reorder_container(
        &mut self,
        target: &ContainerId,
        order: &[ControlId],
    ) -> FormResult<()> {
        let mut root = self.container.clone();
        let path = root
            .path_to(target)
            .ok_or_else(|| FormError::ContainerNotFound(target.to_string()))?;
        root.at_path_mut(&path)
            .ok_or_else(|| FormError::ContainerNotFound(target.to_string()))?
            .reorder(order);

        self.container = root;
        Ok(())
    }

    /// Replace a control with a reconfigured version of itself.
    ///
    /// The replacement must carry the same id and variant. For layouts only
    /// the title is taken over; the columns and their content stay as they are.
    pub fn replace_control(&mut self, replacement: Control) -> FormResult<Control> {
        let id = replacement.id();
        let mut root = self.container.clone();
        let (path, index) = root
            .control_path(id)
            .ok_or(FormError::UnknownControl(id))?;
        let container = root
            .at_path_mut(&path)
            .ok_or(FormError::UnknownControl(id))?;
        let current = container.get(index).ok_or(FormError::UnknownControl(id))?;

        if current.kind() != replacement.kind() {
            return Err(FormError::VariantMismatch {
                expected: current.kind(),
                found: replacement.kind(),
            });
        }

        let replacement = match (current, replacement) {
            (Control::Columns(existing), Control::Columns(incoming)) => {
                let mut kept = existing.clone();
                kept.title = incoming.title;
                Control::Columns(kept)
            }
            (_, other) => other,
        };
        let old = container
            .replace(replacement)
            .ok_or(FormError::UnknownControl(id))?;

        self.container = root;
        Ok(old)
    }
}

fn check_depth(container_depth: usize, control: &Control, max_depth: usize) -> FormResult<()> {
    let added = control.columns_depth();
    if added > 0 && container_depth + added > max_depth {
        return Err(FormError::NestingTooDeep {
            depth: container_depth + added,
            max: max_depth,
        });
    }
    Ok(())
}
