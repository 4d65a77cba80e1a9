//! Editing session: the document, the selection and the undo history.
//!
//! `EditorSession` is the single writer. Every mutation goes through it,
//! either via the named methods or via `apply(Mutation)`; the caller
//! decides when a batch of mutations becomes a history step by calling
//! `commit(label)`. Mutations on unknown ids are silent no-ops.

use crate::history::{DEFAULT_CAPACITY, History};
use crate::shortcuts::ShortcutAction;
use sk_core::{
    CanvasPatch, ChildRef, ContainmentGraph, Document, ElementNode, ElementPatch, NodeId, Position,
    Project, ProjectSettings,
};

/// Editor tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Number of history entries retained.
    pub history_capacity: usize,
    /// Offset applied to both axes of a duplicate.
    pub duplicate_offset: f32,
    /// Pixels around a corner that grab a resize handle.
    pub handle_tolerance: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            duplicate_offset: 20.0,
            handle_tolerance: 6.0,
        }
    }
}

/// A single model mutation, for hosts that drive the session with data
/// (the WASM bridge, scripted tests).
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Add(Box<ElementNode>),
    Update { id: NodeId, patch: ElementPatch },
    Delete { id: NodeId },
    DeleteCascade { id: NodeId },
    Duplicate { id: NodeId },
    BringToFront { id: NodeId },
    SendToBack { id: NodeId },
    UpdateCanvas(CanvasPatch),
}

pub struct EditorSession {
    document: Document,
    name: String,
    settings: ProjectSettings,
    selection: Option<NodeId>,
    history: History,
    config: SessionConfig,
    /// Bumped on every effective model change, including undo/redo.
    revision: u64,
    /// Bumped when the committed state moves: commit, undo, redo, load
    /// and settings changes.
    committed_revision: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditorSession {
    /// An empty document with default canvas. The empty state is the
    /// first history entry, so the first edit can be undone.
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            document: Document::new(),
            name: String::new(),
            settings: ProjectSettings::default(),
            selection: None,
            history: History::new(config.history_capacity),
            config,
            revision: 0,
            committed_revision: 0,
        };
        session.history.commit("initial", &session.document);
        session
    }

    pub fn from_project(project: Project, config: SessionConfig) -> Self {
        let mut session = Self::new(config);
        session.load(project);
        session
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Changes only when the state history points at changes. Uncommitted
    /// edits leave it alone.
    pub fn committed_revision(&self) -> u64 {
        self.committed_revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Point-in-time copy of the project for saving or export.
    pub fn to_project(&self) -> Project {
        Project::from_document(&self.name, &self.document, &self.settings)
    }

    /// The project as of the current history step, without uncommitted
    /// edits.
    pub fn committed_project(&self) -> Project {
        let mut document = Document::new();
        if let Some(entry) = self.history.current() {
            entry.restore_into(&mut document);
        }
        Project::from_document(&self.name, &document, &self.settings)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    /// The selected node as it is now in the document.
    pub fn selected(&self) -> Option<&ElementNode> {
        self.selection.and_then(|id| self.document.get_by_id(id))
    }

    /// Select `id`. Returns `false` (and leaves the selection alone) if
    /// no such node exists.
    pub fn select(&mut self, id: NodeId) -> bool {
        if !self.document.contains(id) {
            log::debug!("select: no node {id}");
            return false;
        }
        self.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ─── Mutation API ────────────────────────────────────────────────────

    /// Append `node` and select it. Id uniqueness is the caller's job.
    pub fn add(&mut self, node: ElementNode) -> NodeId {
        let id = node.id;
        self.document.push(node);
        self.selection = Some(id);
        self.touch();
        id
    }

    /// Top-level merge of `patch` into the node. Returns `false` if the
    /// node does not exist.
    pub fn update(&mut self, id: NodeId, patch: &ElementPatch) -> bool {
        let Some(node) = self.document.get_by_id_mut(id) else {
            log::debug!("update: no node {id}");
            return false;
        };
        patch.apply_to(node);
        self.touch();
        true
    }

    /// Remove the node, leaving any child references to it dangling.
    pub fn delete(&mut self, id: NodeId) -> bool {
        if self.document.remove(id).is_none() {
            log::debug!("delete: no node {id}");
            return false;
        }
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.touch();
        true
    }

    /// Remove the node and every node reachable through its child id
    /// references. Returns the removed ids, root first.
    pub fn delete_cascade(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.document.contains(id) {
            log::debug!("delete_cascade: no node {id}");
            return Vec::new();
        }
        let mut doomed = vec![id];
        doomed.extend(ContainmentGraph::build(&self.document).descendants(id));

        for &victim in &doomed {
            self.document.remove(victim);
        }
        if self.selection.is_some_and(|s| doomed.contains(&s)) {
            self.selection = None;
        }
        self.touch();
        doomed
    }

    /// Clone the node under a fresh id, offset down and right, and select
    /// the copy. Embedded children get fresh ids too.
    pub fn duplicate(&mut self, id: NodeId) -> Option<NodeId> {
        let Some(source) = self.document.get_by_id(id) else {
            log::debug!("duplicate: no node {id}");
            return None;
        };
        let mut copy = source.clone();
        reassign_ids(&mut copy);
        let offset = self.config.duplicate_offset;
        copy.position = Position::new(
            copy.position.x + offset,
            copy.position.y + offset,
            copy.position.z,
        )
        .clamped();
        Some(self.add(copy))
    }

    /// Raise the node above every other: `z = max(z) + 1`. Other nodes
    /// keep their z values.
    pub fn bring_to_front(&mut self, id: NodeId) -> bool {
        let Some(top) = self.document.max_z() else {
            return false;
        };
        self.set_z(id, top.saturating_add(1))
    }

    /// Lower the node below every other: `z = min(z) - 1`.
    pub fn send_to_back(&mut self, id: NodeId) -> bool {
        let Some(bottom) = self.document.min_z() else {
            return false;
        };
        self.set_z(id, bottom.saturating_sub(1))
    }

    fn set_z(&mut self, id: NodeId, z: i32) -> bool {
        let Some(node) = self.document.get_by_id_mut(id) else {
            log::debug!("reorder: no node {id}");
            return false;
        };
        node.position.z = z;
        self.touch();
        true
    }

    pub fn update_canvas(&mut self, patch: &CanvasPatch) {
        patch.apply_to(&mut self.document.canvas);
        self.touch();
    }

    /// Apply one mutation. Returns whether the model changed.
    pub fn apply(&mut self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::Add(node) => {
                self.add(*node);
                true
            }
            Mutation::Update { id, patch } => self.update(id, &patch),
            Mutation::Delete { id } => self.delete(id),
            Mutation::DeleteCascade { id } => !self.delete_cascade(id).is_empty(),
            Mutation::Duplicate { id } => self.duplicate(id).is_some(),
            Mutation::BringToFront { id } => self.bring_to_front(id),
            Mutation::SendToBack { id } => self.send_to_back(id),
            Mutation::UpdateCanvas(patch) => {
                self.update_canvas(&patch);
                true
            }
        }
    }

    /// Replace the whole project. History restarts at the loaded state.
    pub fn load(&mut self, project: Project) {
        let (document, name, settings) = project.into_parts();
        self.document = document;
        self.name = name;
        self.settings = settings;
        self.selection = None;
        self.history.clear();
        self.history.commit("load_project", &self.document);
        self.touch();
        self.committed_revision += 1;
    }

    /// Settings are not part of history, so a change counts as committed.
    pub fn set_settings(&mut self, settings: ProjectSettings) {
        self.settings = settings;
        self.touch();
        self.committed_revision += 1;
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Record the current document as a history step.
    pub fn commit(&mut self, action: &str) {
        self.history.commit(action, &self.document);
        self.committed_revision += 1;
    }

    /// Restore the previous step. Returns the label of the step undone.
    pub fn undo(&mut self) -> Option<String> {
        let undone = self.history.current()?.action.clone();
        let entry = self.history.undo()?;
        entry.restore_into(&mut self.document);
        self.selection = None;
        self.touch();
        self.committed_revision += 1;
        Some(undone)
    }

    /// Re-apply the next step. Returns its label.
    pub fn redo(&mut self) -> Option<String> {
        let entry = self.history.redo()?;
        let label = entry.action.clone();
        entry.restore_into(&mut self.document);
        self.selection = None;
        self.touch();
        self.committed_revision += 1;
        Some(label)
    }

    // ─── Shortcuts ───────────────────────────────────────────────────────

    /// Run a keyboard action against the current selection, committing a
    /// history step when the model changed. Returns whether anything
    /// happened.
    pub fn run_shortcut(&mut self, action: ShortcutAction) -> bool {
        let selection = self.selection;
        let (changed, label) = match action {
            ShortcutAction::Undo => return self.undo().is_some(),
            ShortcutAction::Redo => return self.redo().is_some(),
            ShortcutAction::Deselect => {
                let had = self.selection.is_some();
                self.clear_selection();
                return had;
            }
            ShortcutAction::Duplicate => (
                selection.is_some_and(|id| self.duplicate(id).is_some()),
                "duplicate_element",
            ),
            ShortcutAction::Delete => (
                selection.is_some_and(|id| self.delete(id)),
                "delete_element",
            ),
            ShortcutAction::BringToFront => (
                selection.is_some_and(|id| self.bring_to_front(id)),
                "bring_to_front",
            ),
            ShortcutAction::SendToBack => (
                selection.is_some_and(|id| self.send_to_back(id)),
                "send_to_back",
            ),
        };
        if changed {
            self.commit(label);
        }
        changed
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Give `node` and all of its embedded children fresh ids. Id references
/// to other top-level nodes are left alone.
fn reassign_ids(node: &mut ElementNode) {
    node.id = NodeId::generate(node.kind.as_str());
    for child in node.children.iter_mut() {
        if let ChildRef::Node(embedded) = child {
            reassign_ids(embedded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sk_core::{Dimensions, ElementKind, StyleMap};

    fn node(id: &str, z: i32) -> ElementNode {
        ElementNode::with_id(
            NodeId::intern(id),
            ElementKind::Text,
            Position::new(10.0, 10.0, z),
        )
    }

    #[test]
    fn add_selects_new_node() {
        let mut s = EditorSession::default();
        let id = s.add(node("t1", 0));
        assert_eq!(s.selection(), Some(id));
        assert_eq!(s.document().len(), 1);
    }

    #[test]
    fn update_missing_is_noop() {
        let mut s = EditorSession::default();
        s.add(node("t1", 0));
        let before = s.document().clone();
        let rev = s.revision();
        assert!(!s.update(
            NodeId::intern("ghost"),
            &ElementPatch::position(Position::new(1.0, 1.0, 0))
        ));
        assert_eq!(s.document(), &before);
        assert_eq!(s.revision(), rev);
    }

    #[test]
    fn selected_reflects_updates() {
        let mut s = EditorSession::default();
        let id = s.add(node("t1", 0));
        let mut styles = StyleMap::new();
        styles.insert("color".into(), "red".into());
        s.update(id, &ElementPatch::styles(styles.clone()));
        assert_eq!(s.selected().map(|n| &n.styles), Some(&styles));
    }

    #[test]
    fn delete_clears_selection() {
        let mut s = EditorSession::default();
        let a = s.add(node("a", 0));
        let b = s.add(node("b", 1));
        assert!(s.delete(a));
        assert_eq!(s.selection(), Some(b));
        assert!(s.delete(b));
        assert_eq!(s.selection(), None);
        assert!(!s.delete(b));
    }

    #[test]
    fn duplicate_offsets_and_renames() {
        let mut s = EditorSession::default();
        let id = s.add(node("t1", 7));
        let copy = s.duplicate(id).unwrap();

        assert_ne!(copy, id);
        let original = s.document().get_by_id(id).unwrap().clone();
        let dup = s.document().get_by_id(copy).unwrap();
        assert_eq!(dup.position, Position::new(30.0, 30.0, 7));
        assert_eq!(dup.dimensions, original.dimensions);
        assert_eq!(dup.styles, original.styles);
        assert_eq!(dup.content, original.content);
        assert_eq!(s.selection(), Some(copy));

        assert_eq!(s.duplicate(NodeId::intern("ghost")), None);
    }

    #[test]
    fn duplicate_renames_embedded_children() {
        let mut s = EditorSession::default();
        let mut parent = ElementNode::with_id(
            NodeId::intern("box"),
            ElementKind::Container,
            Position::default(),
        );
        parent
            .children
            .push(ChildRef::Node(Box::new(node("inner", 0))));
        let id = s.add(parent);
        let copy = s.duplicate(id).unwrap();
        let dup = s.document().get_by_id(copy).unwrap();
        assert_ne!(dup.children[0].id(), NodeId::intern("inner"));
    }

    #[test]
    fn reorder_uses_extremes() {
        let mut s = EditorSession::default();
        let a = s.add(node("a", 2));
        s.add(node("b", 5));
        s.add(node("c", -1));

        assert!(s.bring_to_front(a));
        assert_eq!(s.document().get_by_id(a).unwrap().position.z, 6);
        assert!(s.send_to_back(a));
        assert_eq!(s.document().get_by_id(a).unwrap().position.z, -2);
        // Others untouched.
        assert_eq!(s.document().get_by_id(NodeId::intern("b")).unwrap().position.z, 5);
    }

    #[test]
    fn cascade_removes_referenced_children() {
        let mut s = EditorSession::default();
        let mut parent = ElementNode::with_id(
            NodeId::intern("outer"),
            ElementKind::Section,
            Position::default(),
        );
        parent.children.push(ChildRef::Id(NodeId::intern("kid")));
        s.add(parent);
        s.add(node("kid", 0));
        let bystander = s.add(node("bystander", 0));

        let removed = s.delete_cascade(NodeId::intern("outer"));
        assert_eq!(removed, vec![NodeId::intern("outer"), NodeId::intern("kid")]);
        assert_eq!(s.document().len(), 1);
        assert_eq!(s.selection(), Some(bystander));
    }

    #[test]
    fn cascade_clears_selected_descendant() {
        let mut s = EditorSession::default();
        let mut parent = ElementNode::with_id(
            NodeId::intern("frame"),
            ElementKind::Container,
            Position::default(),
        );
        parent.children.push(ChildRef::Id(NodeId::intern("leaf")));
        s.add(parent);
        let leaf = s.add(node("leaf", 0));
        s.add(node("other", 0));
        assert!(s.select(leaf));

        s.delete_cascade(NodeId::intern("frame"));
        assert_eq!(s.selection(), None);
        assert!(!s.document().contains(leaf));
    }

    #[test]
    fn undo_redo_clears_selection_and_returns_labels() {
        let mut s = EditorSession::default();
        let id = s.add(node("t1", 0));
        s.commit("add_element");
        s.update(
            id,
            &ElementPatch::geometry(Position::new(50.0, 50.0, 0), Dimensions::new(60.0, 60.0)),
        );
        s.commit("resize_element");

        assert_eq!(s.undo().as_deref(), Some("resize_element"));
        assert_eq!(s.selection(), None);
        assert_eq!(s.document().get_by_id(id).unwrap().position.x, 10.0);
        assert_eq!(s.undo().as_deref(), Some("add_element"));
        assert!(s.document().is_empty());
        assert_eq!(s.undo(), None);

        assert_eq!(s.redo().as_deref(), Some("add_element"));
        assert_eq!(s.redo().as_deref(), Some("resize_element"));
        assert_eq!(s.redo(), None);
    }

    #[test]
    fn load_resets_history() {
        let mut s = EditorSession::default();
        s.add(node("t1", 0));
        s.commit("add_element");

        let mut project = Project::new("Fresh");
        project.elements.push(node("p1", 0));
        s.load(project);

        assert_eq!(s.name(), "Fresh");
        assert_eq!(s.history().len(), 1);
        assert_eq!(
            s.history().current().map(|e| e.action.as_str()),
            Some("load_project")
        );
        assert!(!s.can_undo());
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn committed_revision_ignores_uncommitted_edits() {
        let mut s = EditorSession::default();
        let start = s.committed_revision();
        let id = s.add(node("t1", 0));
        assert_eq!(s.committed_revision(), start);
        assert!(s.committed_project().elements.is_empty());

        s.commit("add_element");
        assert_eq!(s.committed_revision(), start + 1);
        s.update(id, &ElementPatch::position(Position::new(99.0, 99.0, 0)));
        let saved = s.committed_project();
        assert_eq!(saved.elements[0].position.x, 10.0);

        s.undo();
        assert_eq!(s.committed_revision(), start + 2);
        s.redo();
        assert_eq!(s.committed_revision(), start + 3);
    }

    #[test]
    fn update_canvas_merges_fields() {
        let mut s = EditorSession::default();
        s.update_canvas(&CanvasPatch {
            snap_to_grid: Some(true),
            grid_size: Some(10.0),
            ..Default::default()
        });
        let c = &s.document().canvas;
        assert!(c.snap_to_grid);
        assert_eq!(c.grid_size, 10.0);
        assert_eq!(c.width, 1200.0);
    }

    #[test]
    fn shortcuts_commit_labeled_steps() {
        let mut s = EditorSession::default();
        s.add(node("t1", 0));
        s.commit("add_element");

        assert!(s.run_shortcut(ShortcutAction::Duplicate));
        assert_eq!(
            s.history().current().map(|e| e.action.as_str()),
            Some("duplicate_element")
        );
        assert!(s.run_shortcut(ShortcutAction::Delete));
        assert_eq!(s.document().len(), 1);
        // Nothing selected: delete does nothing and commits nothing.
        let steps = s.history().len();
        assert!(!s.run_shortcut(ShortcutAction::Delete));
        assert_eq!(s.history().len(), steps);

        assert!(s.run_shortcut(ShortcutAction::Undo));
        assert_eq!(s.document().len(), 2);
    }

    #[test]
    fn apply_dispatches_mutations() {
        let mut s = EditorSession::default();
        assert!(s.apply(Mutation::Add(Box::new(node("m", 0)))));
        assert!(s.apply(Mutation::Update {
            id: NodeId::intern("m"),
            patch: ElementPatch::position(Position::new(5.0, 6.0, 0)),
        }));
        assert!(!s.apply(Mutation::Delete {
            id: NodeId::intern("nope")
        }));
        assert_eq!(
            s.document().get_by_id(NodeId::intern("m")).unwrap().position,
            Position::new(5.0, 6.0, 0)
        );
    }
}
