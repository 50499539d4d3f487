use std::collections::VecDeque;

use brickwork_core::BrickInstance;

/// Capped log of full piece-set snapshots with an undo cursor.
///
/// The cursor is `None` in the empty pre-history state; otherwise it points
/// at the snapshot equal to the live piece set.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Vec<BrickInstance>>,
    cursor: Option<usize>,
    capacity: usize,
    dirty: bool,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity.min(64)),
            cursor: None,
            capacity: capacity.max(1),
            dirty: false,
        }
    }

    /// Record a new state, dropping any redo branch and the oldest entry
    /// once over capacity.
    pub fn push(&mut self, snapshot: Vec<BrickInstance>) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.cursor = Some(self.snapshots.len() - 1);
        self.dirty = true;
    }

    /// Step back. From the first entry this returns the empty pre-history
    /// set; from pre-history it returns None.
    pub fn undo(&mut self) -> Option<Vec<BrickInstance>> {
        let cursor = self.cursor?;
        self.dirty = true;
        if cursor == 0 {
            self.cursor = None;
            return Some(Vec::new());
        }
        self.cursor = Some(cursor - 1);
        self.snapshots.get(cursor - 1).cloned()
    }

    pub fn redo(&mut self) -> Option<Vec<BrickInstance>> {
        let next = self.cursor.map_or(0, |c| c + 1);
        let snapshot = self.snapshots.get(next)?.clone();
        self.cursor = Some(next);
        self.dirty = true;
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.snapshots.len()
    }

    /// Snapshot under the cursor; empty in pre-history.
    pub fn current(&self) -> &[BrickInstance] {
        self.cursor
            .and_then(|c| self.snapshots.get(c))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Unsaved changes since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Replace the log with a single loaded snapshot.
    pub fn reset_to(&mut self, snapshot: Vec<BrickInstance>) {
        self.snapshots.clear();
        self.snapshots.push_back(snapshot);
        self.cursor = Some(0);
        self.dirty = false;
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.cursor = None;
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwork_core::{HexColor, PieceId};
    use glam::Vec3;

    fn state(tag: &str) -> Vec<BrickInstance> {
        vec![BrickInstance {
            id: PieceId::from(tag),
            kind: "1x1".into(),
            color: HexColor::new("#FFFFFF"),
            position: Vec3::ZERO,
            rotation: 0.0,
            group_id: None,
            roughness: None,
            metalness: None,
        }]
    }

    fn tag_of(snapshot: &[BrickInstance]) -> &str {
        snapshot.first().map_or("", |p| p.id.0.as_str())
    }

    #[test]
    fn test_undo_redo_sequence() {
        let mut history = History::new(50);
        history.push(state("A"));
        history.push(state("B"));
        history.push(state("C"));
        assert_eq!(history.cursor(), Some(2));

        assert_eq!(tag_of(&history.undo().expect("undo")), "B");
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(tag_of(&history.undo().expect("undo")), "A");
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(tag_of(&history.redo().expect("redo")), "B");
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_undo_past_first_gives_empty_set() {
        let mut history = History::new(50);
        history.push(state("A"));
        assert_eq!(history.undo().expect("to pre-history"), Vec::new());
        assert_eq!(history.cursor(), None);
        assert!(history.undo().is_none());
        assert!(history.current().is_empty());
        assert_eq!(tag_of(&history.redo().expect("redo")), "A");
    }

    #[test]
    fn test_push_truncates_redo_branch() {
        let mut history = History::new(50);
        history.push(state("A"));
        history.push(state("B"));
        history.undo();
        history.push(state("C"));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(tag_of(history.current()), "C");
    }

    #[test]
    fn test_capacity_bound() {
        let mut history = History::new(50);
        for i in 0..60 {
            history.push(state(&format!("s{i}")));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.cursor(), Some(49));
        for _ in 0..49 {
            assert!(history.undo().is_some());
        }
        assert_eq!(tag_of(history.current()), "s10", "oldest retained");
        assert_eq!(history.undo(), Some(Vec::new()));
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_dirty_tracking() {
        let mut history = History::new(50);
        assert!(!history.is_dirty());
        history.push(state("A"));
        assert!(history.is_dirty());
        history.mark_saved();
        assert!(!history.is_dirty());
        history.undo();
        assert!(history.is_dirty(), "undo marks dirty");

        history.reset_to(state("L"));
        assert!(!history.is_dirty());
        assert_eq!((history.len(), history.cursor()), (1, Some(0)));

        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
    }
}
