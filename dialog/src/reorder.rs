//! Edge-order maintenance.
//!
//! Choice edges are bound to their row by index, and a line's trigger edges
//! are bound to their list position by ordinal. Deleting a row or an edge
//! leaves a hole in that numbering; these functions close it so the indices
//! stay `0..n-1`. Edges that do not need to change are moved through
//! untouched.

use crate::graph::{Edge, Port, choice_edge_id, unique_edge_id};
use crate::id::NodeId;

/// Drop the edge on choice row `removed` of `node` and shift every higher
/// row of the same node down by one.
///
/// The shift applies even when no edge sat on `removed`, so an already
/// inconsistent edge list is repaired rather than left as is. A shifted edge
/// gets its canonical id back unless another edge already holds it (a stale
/// id left by a rename), in which case it is suffixed like a fresh
/// connection.
#[must_use]
pub fn remove_choice(edges: Vec<Edge>, node: &NodeId, removed: usize) -> Vec<Edge> {
    let mut kept: Vec<Edge> = edges
        .into_iter()
        .filter(|edge| !(&edge.source == node && edge.port == Port::Choice(removed)))
        .collect();

    let mut shifted: Vec<(usize, usize)> = kept
        .iter()
        .enumerate()
        .filter(|(_, edge)| &edge.source == node)
        .filter_map(|(position, edge)| match edge.port {
            Port::Choice(index) if index > removed => Some((index, position)),
            Port::Choice(_) | Port::Trigger(_) | Port::Start => None,
        })
        .collect();
    shifted.sort_unstable();

    for (index, position) in shifted {
        let edge = &mut kept[position];
        edge.port = Port::Choice(index - 1);
        let base = choice_edge_id(&edge.source, index - 1, &edge.target);
        edge.id.clear();
        let id = unique_edge_id(&kept, base);
        kept[position].id = id;
    }
    kept
}

/// Renumber the trigger ordinals of `node` to `0..m-1`, keeping their
/// current relative order. Edges without an ordinal rank after those with
/// one, in edge-list order.
#[must_use]
pub fn renumber_ordinals(mut edges: Vec<Edge>, node: &NodeId) -> Vec<Edge> {
    let mut ranked: Vec<(usize, Option<usize>)> = edges
        .iter()
        .enumerate()
        .filter(|(_, edge)| &edge.source == node)
        .filter_map(|(position, edge)| match edge.port {
            Port::Trigger(ordinal) => Some((position, ordinal)),
            Port::Choice(_) | Port::Start => None,
        })
        .collect();
    ranked.sort_by_key(|&(position, ordinal)| (ordinal.is_none(), ordinal, position));

    for (next, (position, _)) in ranked.into_iter().enumerate() {
        edges[position].port = Port::Trigger(Some(next));
    }
    edges
}

#[cfg(test)]
#[path = "reorder_test.rs"]
mod tests;
