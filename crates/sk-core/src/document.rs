//! The page document: an ordered element list plus its canvas.
//!
//! Document order is insertion order; visual stacking is decided by
//! `position.z`, with later elements winning ties.

use crate::id::NodeId;
use crate::model::{Canvas, ChildRef, ElementNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level elements in document order.
    #[serde(default)]
    pub elements: Vec<ElementNode>,
    #[serde(default)]
    pub canvas: Canvas,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(elements: Vec<ElementNode>, canvas: Canvas) -> Self {
        Self { elements, canvas }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Look up a top-level element by id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&ElementNode> {
        self.elements.iter().find(|n| n.id == id)
    }

    pub fn get_by_id_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        self.elements.iter_mut().find(|n| n.id == id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.elements.iter().position(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Append an element. Id uniqueness is the caller's responsibility.
    pub fn push(&mut self, node: ElementNode) {
        self.elements.push(node);
    }

    /// Remove a top-level element, returning it if it existed.
    pub fn remove(&mut self, id: NodeId) -> Option<ElementNode> {
        let idx = self.index_of(id)?;
        Some(self.elements.remove(idx))
    }

    /// Elements whose bounding box overlaps the query rectangle.
    /// Touching edges do not count as overlap.
    pub fn get_nodes_in_rect(&self, x: f32, y: f32, w: f32, h: f32) -> Vec<NodeId> {
        self.elements
            .iter()
            .filter(|n| n.bounds().intersects_rect(x, y, w, h))
            .map(|n| n.id)
            .collect()
    }

    /// Topmost element containing the point, if any.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<NodeId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|n| n.bounds().contains(px, py))
            .map(|n| n.id)
    }

    /// Elements back-to-front: ascending `z`, document order on ties.
    pub fn paint_order(&self) -> Vec<&ElementNode> {
        let mut ordered: Vec<&ElementNode> = self.elements.iter().collect();
        // Stable sort keeps document order for equal z.
        ordered.sort_by_key(|n| n.position.z);
        ordered
    }

    pub fn max_z(&self) -> Option<i32> {
        self.elements.iter().map(|n| n.position.z).max()
    }

    pub fn min_z(&self) -> Option<i32> {
        self.elements.iter().map(|n| n.position.z).min()
    }

    /// Depth-first visit of every element, including embedded children.
    /// Top-level elements have depth 0.
    pub fn walk<F: FnMut(&ElementNode, usize)>(&self, mut visit: F) {
        fn walk_node<F: FnMut(&ElementNode, usize)>(node: &ElementNode, depth: usize, visit: &mut F) {
            visit(node, depth);
            for child in &node.children {
                if let ChildRef::Node(embedded) = child {
                    walk_node(embedded, depth + 1, visit);
                }
            }
        }

        for node in &self.elements {
            walk_node(node, 0, &mut visit);
        }
    }
}
