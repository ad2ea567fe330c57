//! Pre-export checks.
//!
//! Diagnostics are plain sentences meant for the author, in a fixed wording.
//! Only nodes reachable from the start node are checked, the same set
//! [`crate::export::reconstruct`] keeps, so orphaned scratch nodes never
//! block an export. An empty result means the graph is ready to export.

use crate::graph::{Graph, Payload};

/// Check `graph` and return every problem found, in node order.
#[must_use]
pub fn validate(graph: &Graph) -> Vec<String> {
    let Some(start) = graph.start_node() else {
        return vec!["No start node found".to_owned()];
    };

    let reachable = graph.reachable_from(&start.id);
    let outgoing = graph.outgoing();
    let mut errors = Vec::new();

    for node in graph.nodes.iter().filter(|node| reachable.contains(&node.id)) {
        let label = node.label();
        match &node.payload {
            Payload::Line(line) => {
                if !line.duration.is_finite() {
                    errors.push(format!("NPC line \"{label}\": duration must be a number"));
                }
            }
            Payload::ChoiceSet(set) => {
                let edges = outgoing.get(&node.id).map(Vec::as_slice).unwrap_or_default();
                for (index, choice) in set.choices.iter().enumerate() {
                    let number = index + 1;
                    if choice.text.trim().is_empty() {
                        errors.push(format!("Player choice \"{label}\": choice {number} text is empty"));
                    }
                    if !edges.iter().any(|edge| edge.port.choice_index() == Some(index)) {
                        errors.push(format!("Player choice \"{label}\": choice {number} is not connected"));
                    }
                }
            }
            Payload::StartMarker(_) => {
                if !outgoing.contains_key(&node.id) {
                    errors.push("Start marker is not connected".to_owned());
                }
            }
        }
    }

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "graph failed validation");
    }
    errors
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
