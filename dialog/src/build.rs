//! Document → graph.
//!
//! Every line and choice set becomes a node; every trigger reference becomes
//! an edge. Lines with a `triggers` list get one edge per entry with the list
//! position as its ordinal, and choice sets get one edge per row with the row
//! index as its choice index, so [`crate::export::reconstruct`] can restore
//! both orders exactly. Positions come from [`crate::layout::tree_layout`]
//! seeded at the start node.

use crate::doc::{Document, Triggers};
use crate::error::DialogError;
use crate::graph::{ChoiceRow, Edge, Graph, LinePayload, Node};
use crate::id::NodeId;
use crate::layout::{Spacing, tree_layout};

/// Build a graph with the default layout spacing.
///
/// # Errors
///
/// Returns [`DialogError::MalformedDocument`] when `start` names neither a
/// line nor a choice set.
pub fn build(doc: &Document) -> Result<Graph, DialogError> {
    build_with_spacing(doc, Spacing::default())
}

/// Build a graph, laying it out with `spacing`.
///
/// # Errors
///
/// Returns [`DialogError::MalformedDocument`] when `start` names neither a
/// line nor a choice set.
pub fn build_with_spacing(doc: &Document, spacing: Spacing) -> Result<Graph, DialogError> {
    if !doc.contains_label(&doc.start) {
        return Err(DialogError::MalformedDocument(doc.start.clone()));
    }
    let start = resolve_target(doc, &doc.start);

    let mut nodes = Vec::with_capacity(doc.lines.len() + doc.choice_sets.len());
    let mut edges = Vec::new();

    for (label, line) in &doc.lines {
        let source = NodeId::line(label.as_str());
        match &line.triggers {
            None => {}
            Some(Triggers::One(target)) => {
                edges.push(Edge::trigger(source.clone(), resolve_target(doc, target), 0, false));
            }
            Some(Triggers::Many(targets)) => {
                for (ordinal, target) in targets.iter().enumerate() {
                    edges.push(Edge::trigger(source.clone(), resolve_target(doc, target), ordinal, true));
                }
            }
        }
        let is_start = source == start;
        nodes.push(Node::line(label.as_str(), LinePayload::from_line(line)).starting(is_start));
    }

    for (label, choices) in &doc.choice_sets {
        let source = NodeId::choice_set(label.as_str());
        for (index, choice) in choices.iter().enumerate() {
            edges.push(Edge::choice(source.clone(), index, resolve_target(doc, &choice.triggers)));
        }
        let rows = choices.iter().map(|choice| ChoiceRow { text: choice.text.clone() }).collect();
        let is_start = source == start;
        nodes.push(Node::choice_set(label.as_str(), rows).starting(is_start));
    }

    let mut graph = Graph::new(nodes, edges);
    let positions = tree_layout(&graph.node_ids(), &graph.edges, &start, spacing);
    for node in &mut graph.nodes {
        node.position = positions.get(&node.id).copied().unwrap_or_default();
    }

    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        start = %start,
        "built dialog graph"
    );
    Ok(graph)
}

/// Node id a trigger label points at: choice sets win over lines, and an
/// unknown label is treated as a line.
#[must_use]
pub fn resolve_target(doc: &Document, label: &str) -> NodeId {
    if doc.choice_sets.contains_key(label) {
        NodeId::choice_set(label)
    } else {
        NodeId::line(label)
    }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
