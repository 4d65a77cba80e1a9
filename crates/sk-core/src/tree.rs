//! Containment graph over `children` id references.
//!
//! Elements are stored flat; containers point at other top-level elements
//! by id. This module lifts those references into a directed graph
//! (container → child) so callers can ask for descendants, detect cycles,
//! and find references to ids that no longer exist.

use crate::document::Document;
use crate::id::NodeId;
use crate::model::ChildRef;
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::HashMap;

pub struct ContainmentGraph {
    graph: DiGraph<NodeId, ()>,
    index: HashMap<NodeId, NodeIndex>,
    /// `(container, missing child id)` pairs.
    dangling: Vec<(NodeId, NodeId)>,
}

impl ContainmentGraph {
    /// Build the graph from the document's top-level elements.
    /// Embedded children are owned by their parent and are not graph edges.
    pub fn build(doc: &Document) -> Self {
        let mut graph = DiGraph::with_capacity(doc.len(), doc.len());
        let mut index = HashMap::with_capacity(doc.len());
        for node in &doc.elements {
            index
                .entry(node.id)
                .or_insert_with(|| graph.add_node(node.id));
        }

        let mut dangling = Vec::new();
        for node in &doc.elements {
            let parent = index[&node.id];
            for child in &node.children {
                let ChildRef::Id(child_id) = child else {
                    continue;
                };
                match index.get(child_id) {
                    Some(&c) => {
                        graph.update_edge(parent, c, ());
                    }
                    None => {
                        log::trace!("{} references missing child {child_id}", node.id);
                        dangling.push((node.id, *child_id));
                    }
                }
            }
        }

        Self {
            graph,
            index,
            dangling,
        }
    }

    /// Every element reachable from `id` through child references,
    /// excluding `id` itself. Empty if `id` is unknown.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                out.push(self.graph[idx]);
            }
        }
        out
    }

    /// Containers that reference `id` as a child.
    pub fn parents_of(&self, id: NodeId) -> Vec<NodeId> {
        let Some(&idx) = self.index.get(&id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|p| self.graph[p])
            .collect()
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    pub fn dangling(&self) -> &[(NodeId, NodeId)] {
        &self.dangling
    }
}
