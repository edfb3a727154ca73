//! Undo/redo over whole-layout snapshots.
//!
//! Snapshots are `Arc<Layout>`.  The session mutates its working copy through
//! `Arc::make_mut`, so recording a snapshot is a reference-count bump and the
//! layout is cloned at most once per discrete action, the first time it is
//! written to afterwards.

use std::collections::VecDeque;
use std::sync::Arc;

use wireframe_core::Layout;

/// Bounded undo stack plus redo stack.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Arc<Layout>>,
    redo: Vec<Arc<Layout>>,
    limit: usize,
}

impl History {
    pub const DEFAULT_LIMIT: usize = 20;

    /// Creates an empty history keeping at most `limit` undo steps (minimum 1).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            undo: VecDeque::with_capacity(limit),
            redo: Vec::new(),
            limit,
        }
    }

    /// Pushes the pre-mutation layout and clears the redo stack.
    ///
    /// The oldest entry is dropped once the stack is over its limit.
    pub fn record(&mut self, before: Arc<Layout>) {
        self.push_undo(before);
        self.redo.clear();
    }

    /// Pops the previous layout, pushing `current` onto the redo stack.
    ///
    /// Returns `None` (and keeps `current` untouched) when there is nothing to undo.
    pub fn undo(&mut self, current: Arc<Layout>) -> Option<Arc<Layout>> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Pops the next layout, pushing `current` back onto the undo stack.
    pub fn redo(&mut self, current: Arc<Layout>) -> Option<Arc<Layout>> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_undo(&mut self, snapshot: Arc<Layout>) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wireframe_core::{AspectRatio, Content, Element, ElementKind, Meta};

    /// A one-element layout whose title sits at `left`.
    fn layout_at(left: f64) -> Arc<Layout> {
        let el = Element::new(ElementKind::Title, left, 10.0, 20.0, 10.0).with_id("t");
        Arc::new(
            Layout::new(vec![el], Content::default(), Meta::new(AspectRatio::Square, None))
                .expect("valid layout"),
        )
    }

    fn left_of(layout: &Layout) -> f64 {
        layout.elements()[0].left
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut history = History::default();
        assert!(history.undo(layout_at(0.0)).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_restores_recorded_snapshots_in_reverse_order() {
        // Arrange: three mutations 0 → 10 → 20 → 30
        let mut history = History::default();
        history.record(layout_at(0.0));
        history.record(layout_at(10.0));
        history.record(layout_at(20.0));

        // Act / Assert
        let a = history.undo(layout_at(30.0)).unwrap();
        assert_eq!(left_of(&a), 20.0);
        let b = history.undo(a).unwrap();
        assert_eq!(left_of(&b), 10.0);
        let c = history.undo(b).unwrap();
        assert_eq!(left_of(&c), 0.0);
        assert!(history.undo(c).is_none());
    }

    #[test]
    fn test_redo_restores_state_before_undo() {
        let mut history = History::default();
        history.record(layout_at(0.0));

        let undone = history.undo(layout_at(15.0)).unwrap();
        let redone = history.redo(undone).unwrap();

        assert_eq!(left_of(&redone), 15.0);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo_stack() {
        let mut history = History::default();
        history.record(layout_at(0.0));
        let undone = history.undo(layout_at(5.0)).unwrap();
        assert!(history.can_redo());

        history.record(undone);

        assert!(!history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest_snapshot() {
        let mut history = History::new(3);
        for left in [0.0, 10.0, 20.0, 30.0, 40.0] {
            history.record(layout_at(left));
        }

        assert_eq!(history.undo_depth(), 3);
        let mut current = layout_at(50.0);
        let mut seen = Vec::new();
        while let Some(prev) = history.undo(current.clone()) {
            seen.push(left_of(&prev));
            current = prev;
        }
        assert_eq!(seen, vec![40.0, 30.0, 20.0]);
    }

    #[test]
    fn test_redo_respects_limit() {
        let mut history = History::new(1);
        history.record(layout_at(0.0));
        let a = history.undo(layout_at(1.0)).unwrap();
        let _ = history.redo(a).unwrap();
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        assert_eq!(History::new(0).limit(), 1);
    }

    #[test]
    fn test_recording_shares_snapshot_without_cloning() {
        let mut history = History::default();
        let snapshot = layout_at(0.0);
        history.record(Arc::clone(&snapshot));
        assert_eq!(Arc::strong_count(&snapshot), 2);
    }
}
