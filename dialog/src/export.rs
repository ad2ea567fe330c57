//! Graph → document.
//!
//! DESIGN
//! ======
//! Only nodes reachable from the start node are exported; scratch nodes the
//! author left lying around never reach the shipped file. `triggers` is
//! derived entirely from edges: none, one label, or a list ordered by edge
//! ordinal. A choice row without an edge is left out of its set. That is the
//! editor's "not wired yet" state, and [`crate::validate`] is what blocks
//! export on it.
//!
//! A start marker node is never exported. When the marker holds the start
//! flag, the document starts at whatever its edge points to and inherits the
//! marker's `replace` flag unless the caller passes one.

use indexmap::IndexMap;

use crate::doc::{Choice, Document, Triggers};
use crate::error::DialogError;
use crate::graph::{Edge, Graph, Payload};

/// Rebuild a document from `graph`.
///
/// `replace` is written only when given (or carried by a start marker).
///
/// # Errors
///
/// Returns [`DialogError::NoStartNode`] when no node is start-flagged, or
/// when the start flag sits on a marker that has no outgoing edge.
pub fn reconstruct(graph: &Graph, replace: Option<bool>) -> Result<Document, DialogError> {
    let start_node = graph.start_node().ok_or(DialogError::NoStartNode)?;
    let (entry, marker_replace) = match &start_node.payload {
        Payload::StartMarker(marker) => {
            let edge = graph
                .edges
                .iter()
                .find(|edge| edge.source == start_node.id)
                .ok_or(DialogError::NoStartNode)?;
            (&edge.target, marker.replace)
        }
        Payload::Line(_) | Payload::ChoiceSet(_) => (&start_node.id, None),
    };

    let reachable = graph.reachable_from(&start_node.id);
    let outgoing = graph.outgoing();

    let mut lines = IndexMap::new();
    let mut choice_sets = IndexMap::new();
    let mut pruned = 0usize;

    for node in &graph.nodes {
        if !reachable.contains(&node.id) {
            pruned += 1;
            continue;
        }
        let edges = outgoing.get(&node.id).map(Vec::as_slice).unwrap_or_default();
        match &node.payload {
            Payload::Line(payload) => {
                lines.insert(node.label().to_owned(), payload.to_line(line_triggers(edges)));
            }
            Payload::ChoiceSet(set) => {
                let choices: Vec<Choice> = set
                    .choices
                    .iter()
                    .enumerate()
                    .filter_map(|(index, row)| {
                        let edge = edges.iter().find(|edge| edge.port.choice_index() == Some(index))?;
                        Some(Choice { text: row.text.clone(), triggers: edge.target.label().to_owned() })
                    })
                    .collect();
                choice_sets.insert(node.label().to_owned(), choices);
            }
            Payload::StartMarker(_) => {}
        }
    }

    tracing::debug!(
        lines = lines.len(),
        choice_sets = choice_sets.len(),
        pruned,
        "reconstructed dialog document"
    );

    Ok(Document {
        start: entry.label().to_owned(),
        replace: replace.or(marker_replace),
        lines,
        choice_sets,
    })
}

/// `triggers` for a line with the given outgoing edges.
fn line_triggers(edges: &[&Edge]) -> Option<Triggers> {
    match edges {
        [] => None,
        [only] => Some(Triggers::One(only.target.label().to_owned())),
        many => {
            let mut ordered = many.to_vec();
            // Stable: ordinal-less edges keep their list order after the rest.
            ordered.sort_by_key(|edge| {
                let ordinal = edge.port.ordinal();
                (ordinal.is_none(), ordinal)
            });
            Some(Triggers::Many(ordered.into_iter().map(|edge| edge.target.label().to_owned()).collect()))
        }
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
