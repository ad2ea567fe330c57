//! Breadth-first tree layout.
//!
//! Levels are hop counts from the start node; each level is a column, and
//! nodes within a column are centered vertically around `y = 0` in discovery
//! order. Nodes the traversal never reaches share one trailing column. The
//! result depends only on node order, edge order and the start id, so
//! re-running it on an unchanged graph is a no-op.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;

use crate::error::DialogError;
use crate::graph::{Edge, Graph, Position};
use crate::id::NodeId;

pub const DEFAULT_X_SPACING: f64 = 500.0;
pub const DEFAULT_Y_SPACING: f64 = 300.0;

/// Distance between columns (`x`) and between rows within a column (`y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self { x: DEFAULT_X_SPACING, y: DEFAULT_Y_SPACING }
    }
}

/// Compute a position for every id in `node_ids`.
///
/// Edges whose source is not in `node_ids` are ignored, as are targets that
/// are not. If `start` is not one of the nodes, everything lands in the
/// trailing column.
#[must_use]
pub fn tree_layout(node_ids: &[NodeId], edges: &[Edge], start: &NodeId, spacing: Spacing) -> IndexMap<NodeId, Position> {
    let mut adjacency: HashMap<&NodeId, Vec<&NodeId>> = node_ids.iter().map(|id| (id, Vec::new())).collect();
    for edge in edges {
        if let Some(targets) = adjacency.get_mut(&edge.source) {
            targets.push(&edge.target);
        }
    }
    let known: HashSet<&NodeId> = adjacency.keys().copied().collect();

    // Shallowest level wins; discovery order breaks ties.
    let mut levels: IndexMap<&NodeId, usize> = IndexMap::new();
    let mut queue = VecDeque::new();
    if known.contains(start) {
        levels.insert(start, 0);
        queue.push_back(start);
    }
    while let Some(current) = queue.pop_front() {
        let Some(&level) = levels.get(current) else {
            continue;
        };
        for &next in adjacency.get(current).into_iter().flatten() {
            if known.contains(next) && !levels.contains_key(next) {
                levels.insert(next, level + 1);
                queue.push_back(next);
            }
        }
    }

    let trailing = levels.values().copied().max().unwrap_or(0) + 1;
    for id in node_ids {
        levels.entry(id).or_insert(trailing);
    }

    let mut columns: IndexMap<usize, Vec<&NodeId>> = IndexMap::new();
    for (&id, &level) in &levels {
        columns.entry(level).or_default().push(id);
    }

    let mut positions = IndexMap::with_capacity(levels.len());
    for (level, ids) in columns {
        #[allow(clippy::cast_precision_loss)]
        let total_height = (ids.len().saturating_sub(1)) as f64 * spacing.y;
        for (row, id) in ids.into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let position = Position::new(level as f64 * spacing.x, -total_height / 2.0 + row as f64 * spacing.y);
            positions.insert(id.clone(), position);
        }
    }
    positions
}

/// The editor's "re-organize" action: lay the whole graph out again from its
/// start node.
///
/// # Errors
///
/// Returns [`DialogError::NoStartNode`] when no node carries the start flag.
pub fn relayout(graph: &Graph, spacing: Spacing) -> Result<Graph, DialogError> {
    let start = graph.start_node().ok_or(DialogError::NoStartNode)?;
    let positions = tree_layout(&graph.node_ids(), &graph.edges, &start.id, spacing);

    let mut next = graph.clone();
    for node in &mut next.nodes {
        node.position = positions.get(&node.id).copied().unwrap_or_default();
    }
    tracing::debug!(nodes = next.nodes.len(), start = %start.id, "re-organized graph layout");
    Ok(next)
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
