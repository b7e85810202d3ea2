//! Undo/redo over whole-document snapshots.

/// Default number of undo states kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Linear undo history around a present state.
///
/// States are expected to be cheap to clone (shared snapshots).
#[derive(Debug, Clone)]
pub struct History<S> {
    present: S,
    undo_stack: Vec<S>,
    redo_stack: Vec<S>,
    limit: usize,
}

impl<S: Clone> History<S> {
    /// Create a history whose present state is `initial`. A limit of zero
    /// disables undo.
    pub fn new(initial: S, limit: usize) -> Self {
        Self {
            present: initial,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Start over from `state`, forgetting both stacks.
    pub fn initialize(&mut self, state: S) {
        self.present = state;
        self.reset();
    }

    /// Forget both stacks, keeping the present state.
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// The present state.
    pub fn present(&self) -> &S {
        &self.present
    }

    /// Swap the present state without recording an undo point.
    pub fn replace_present(&mut self, state: S) {
        self.present = state;
    }

    /// Make `state` the present one. The previous present becomes an undo
    /// point and the redo stack is cleared.
    pub fn push(&mut self, state: S) {
        let previous = std::mem::replace(&mut self.present, state);
        self.redo_stack.clear();

        if self.limit == 0 {
            return;
        }
        self.undo_stack.push(previous);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    /// Step back. Returns the new present state, or `None` if there is
    /// nothing to undo.
    pub fn undo(&mut self) -> Option<&S> {
        let previous = self.undo_stack.pop()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.redo_stack.push(current);
        Some(&self.present)
    }

    /// Step forward again. Returns the new present state, or `None` if there
    /// is nothing to redo.
    pub fn redo(&mut self) -> Option<&S> {
        let next = self.redo_stack.pop()?;
        let current = std::mem::replace(&mut self.present, next);
        self.undo_stack.push(current);
        Some(&self.present)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo() {
        let mut history = History::new(0, DEFAULT_HISTORY_LIMIT);
        history.push(1);
        history.push(2);

        assert_eq!(history.undo(), Some(&1));
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.undo(), None);
        assert_eq!(*history.present(), 0);

        assert_eq!(history.redo(), Some(&1));
        assert_eq!(history.redo(), Some(&2));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = History::new("a", 10);
        history.push("b");
        history.undo();
        assert!(history.can_redo());

        history.push("c");
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(&"a"));
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(0, 3);
        for state in 1..=5 {
            history.push(state);
        }
        assert_eq!(history.undo_len(), 3);

        assert_eq!(history.undo(), Some(&4));
        assert_eq!(history.undo(), Some(&3));
        assert_eq!(history.undo(), Some(&2));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_zero_limit_disables_undo() {
        let mut history = History::new(0, 0);
        history.push(1);
        assert!(!history.can_undo());
        assert_eq!(*history.present(), 1);
    }

    #[test]
    fn test_initialize_and_reset() {
        let mut history = History::new(0, 10);
        history.push(1);
        history.push(2);
        history.undo();

        history.reset();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(*history.present(), 1);

        history.push(3);
        history.initialize(9);
        assert!(!history.can_undo());
        assert_eq!(*history.present(), 9);
    }

    #[test]
    fn test_replace_present_keeps_stacks() {
        let mut history = History::new(0, 10);
        history.push(1);
        history.replace_present(2);

        assert_eq!(*history.present(), 2);
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.undo(), Some(&0));
        assert_eq!(history.redo(), Some(&2));
    }
}
