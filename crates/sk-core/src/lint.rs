//! Lint diagnostics for page documents.
//!
//! Reports structural issues without modifying the document. Mutations
//! never enforce cross-element integrity, so this is where duplicate ids,
//! broken child references and out-of-range geometry surface.

use crate::document::Document;
use crate::id::NodeId;
use crate::model::MIN_SIZE;
use crate::tree::ContainmentGraph;
use serde::Serialize;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// Should be fixed — likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for an element.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintDiagnostic {
    /// The element this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "dangling-child").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics.
#[must_use]
pub fn lint_document(doc: &Document) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(doc, &mut diags);
    lint_geometry(doc, &mut diags);
    lint_children_on_leaf(doc, &mut diags);
    lint_containment(doc, &mut diags);
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Warn when two elements (top-level or embedded) share an id.
fn lint_duplicate_ids(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    doc.walk(|node, _| {
        if !seen.insert(node.id) {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Duplicate element id `{}`.", node.id),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
    });
}

fn lint_geometry(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    doc.walk(|node, _| {
        let d = node.dimensions;
        if d.width < MIN_SIZE || d.height < MIN_SIZE {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!(
                    "`{}` is {}×{}; elements must be at least {MIN_SIZE}×{MIN_SIZE}.",
                    node.id, d.width, d.height
                ),
                severity: LintSeverity::Warning,
                rule: "undersized",
            });
        }
        let p = node.position;
        if p.x < 0.0 || p.y < 0.0 {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("`{}` sits at ({}, {}), outside the canvas.", node.id, p.x, p.y),
                severity: LintSeverity::Warning,
                rule: "negative-position",
            });
        }
    });
}

/// Info when a non-container type carries children; they are never rendered.
fn lint_children_on_leaf(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    doc.walk(|node, _| {
        if !node.kind.is_container() && !node.children.is_empty() {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!(
                    "`{}` is a {} element; its {} children are ignored.",
                    node.id,
                    node.kind,
                    node.children.len()
                ),
                severity: LintSeverity::Info,
                rule: "children-on-leaf",
            });
        }
    });
}

fn lint_containment(doc: &Document, diags: &mut Vec<LintDiagnostic>) {
    let graph = ContainmentGraph::build(doc);

    for &(parent, missing) in graph.dangling() {
        diags.push(LintDiagnostic {
            node_id: parent,
            message: format!("`{parent}` references missing child `{missing}`."),
            severity: LintSeverity::Warning,
            rule: "dangling-child",
        });
    }

    if graph.has_cycle() {
        // Report once per element that is its own descendant.
        let ids: Vec<NodeId> = doc.elements.iter().map(|n| n.id).collect();
        for id in ids {
            let parents: HashSet<NodeId> = graph.parents_of(id).into_iter().collect();
            if parents.contains(&id) || graph.descendants(id).iter().any(|d| parents.contains(d)) {
                diags.push(LintDiagnostic {
                    node_id: id,
                    message: format!("`{id}` contains itself through its children."),
                    severity: LintSeverity::Warning,
                    rule: "containment-cycle",
                });
            }
        }
    }
}
