//! Snapshot-based undo/redo history.
//!
//! Commits are explicit: the caller decides when the current document is
//! a step worth returning to and tags it with an action label
//! (`"add_element"`, `"update_canvas"`, …). Several mutations can
//! therefore share one step. Each entry stores a full deep copy of the
//! elements and canvas; memory is O(document size) per step.
//!
//! `index` points at the entry representing the current state. Undo and
//! redo move it and hand back the snapshot to restore.

use chrono::{DateTime, Utc};
use sk_core::{Canvas, Document, ElementNode};
use std::collections::VecDeque;

/// Default number of retained entries.
pub const DEFAULT_CAPACITY: usize = 50;

/// An immutable point-in-time copy of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub action: String,
    pub nodes: Vec<ElementNode>,
    pub canvas: Canvas,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    fn capture(action: &str, doc: &Document) -> Self {
        Self {
            action: action.to_string(),
            nodes: doc.elements.clone(),
            canvas: doc.canvas.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Overwrite `doc` with this snapshot.
    pub fn restore_into(&self, doc: &mut Document) {
        doc.elements = self.nodes.clone();
        doc.canvas = self.canvas.clone();
    }
}

/// Bounded linear history with FIFO eviction.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    /// `None` while empty.
    index: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            index: None,
            capacity,
        }
    }

    /// Snapshot `doc` as a new step. Any redo branch beyond the current
    /// index is discarded; past capacity the oldest entry is evicted.
    pub fn commit(&mut self, action: &str, doc: &Document) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push_back(HistoryEntry::capture(action, doc));

        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                log::trace!("history full, evicted `{}`", evicted.action);
            }
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Step back. Returns the entry to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        let i = self.index.filter(|&i| i > 0)?;
        self.index = Some(i - 1);
        self.entries.get(i - 1)
    }

    /// Step forward. Returns the entry to restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let next = self.index.map_or(0, |i| i + 1);
        if self.index.is_none() || next >= self.entries.len() {
            return None;
        }
        self.index = Some(next);
        self.entries.get(next)
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// The entry representing the current state.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.index.and_then(|i| self.entries.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{ElementKind, Position};

    fn doc_with(n: usize) -> Document {
        let mut doc = Document::new();
        for i in 0..n {
            doc.push(ElementNode::new(
                ElementKind::Text,
                Position::new(i as f32 * 10.0, 0.0, i as i32),
            ));
        }
        doc
    }

    #[test]
    fn empty_history_is_inert() {
        let mut h = History::default();
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert_eq!(h.index(), None);
    }

    #[test]
    fn single_entry_cannot_undo() {
        let mut h = History::default();
        h.commit("initial", &doc_with(0));
        assert_eq!(h.index(), Some(0));
        assert!(h.undo().is_none());
        assert_eq!(h.index(), Some(0));
    }

    #[test]
    fn undo_redo_walks_entries() {
        let mut h = History::default();
        h.commit("initial", &doc_with(0));
        h.commit("add_element", &doc_with(1));
        h.commit("add_element", &doc_with(2));

        assert_eq!(h.undo().map(|e| e.nodes.len()), Some(1));
        assert_eq!(h.undo().map(|e| e.nodes.len()), Some(0));
        assert!(h.undo().is_none());
        assert!(h.can_redo());

        assert_eq!(h.redo().map(|e| e.nodes.len()), Some(1));
        assert_eq!(h.redo().map(|e| e.nodes.len()), Some(2));
        assert!(h.redo().is_none());
    }

    #[test]
    fn commit_discards_redo_branch() {
        let mut h = History::default();
        h.commit("a", &doc_with(0));
        h.commit("b", &doc_with(1));
        h.commit("c", &doc_with(2));
        h.undo();
        h.undo();

        h.commit("d", &doc_with(3));
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        let labels: Vec<&str> = h.entries().map(|e| e.action.as_str()).collect();
        assert_eq!(labels, vec!["a", "d"]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut h = History::new(3);
        for label in ["a", "b", "c", "d", "e"] {
            h.commit(label, &doc_with(0));
            assert!(h.len() <= 3);
            assert_eq!(h.current().map(|e| e.action.as_str()), Some(label));
        }
        let labels: Vec<&str> = h.entries().map(|e| e.action.as_str()).collect();
        assert_eq!(labels, vec!["c", "d", "e"]);
        assert_eq!(h.index(), Some(2));
    }

    #[test]
    fn snapshots_are_independent_copies() {
        let mut doc = doc_with(1);
        let mut h = History::default();
        h.commit("initial", &doc);
        doc.elements[0].position.x = 999.0;
        assert_eq!(h.current().unwrap().nodes[0].position.x, 0.0);

        h.current().unwrap().restore_into(&mut doc);
        assert_eq!(doc.elements[0].position.x, 0.0);
    }
}
