//! Editing operations.
//!
//! Each operation takes the current graph and returns the edited copy, or an
//! [`EditError`] and no change at all. None of them keep any state between
//! calls: the caller owns the live graph and decides when to validate and
//! export. Every operation leaves the graph invariants from
//! [`crate::graph`] intact; the ones that delete edges go through
//! [`crate::reorder`] to close the gaps they leave.

use crate::error::ErrorCode;
use crate::graph::{ChoiceRow, Edge, Graph, LinePayload, Node, Payload, Port, Position, unique_edge_id};
use crate::id::{NodeId, NodeKind};
use crate::reorder;

/// Duration given to freshly added lines.
pub const NEW_LINE_DURATION: f64 = 1.0;
/// Label of the start marker node (`start-marker`).
pub const START_MARKER_LABEL: &str = "marker";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("label must not be empty")]
    EmptyLabel,
    #[error("node `{0}` already exists")]
    DuplicateNode(NodeId),
    #[error("node `{0}` not found")]
    UnknownNode(NodeId),
    #[error("edge `{0}` not found")]
    UnknownEdge(String),
    #[error("node `{node}` has no choice {index}")]
    ChoiceOutOfRange { node: NodeId, index: usize },
    #[error("node `{0}` is not a {1}")]
    WrongKind(NodeId, NodeKind),
    #[error("a choice row is required to connect from `{0}`")]
    MissingChoice(NodeId),
    #[error("only choice sets have choice rows; `{0}` does not")]
    UnexpectedChoice(NodeId),
    #[error("`{0}` cannot be an edge target")]
    InvalidTarget(NodeId),
}

impl ErrorCode for EditError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyLabel => "E_EMPTY_LABEL",
            Self::DuplicateNode(_) => "E_DUPLICATE_NODE",
            Self::UnknownNode(_) => "E_UNKNOWN_NODE",
            Self::UnknownEdge(_) => "E_UNKNOWN_EDGE",
            Self::ChoiceOutOfRange { .. } => "E_CHOICE_OUT_OF_RANGE",
            Self::WrongKind(..) => "E_WRONG_NODE_KIND",
            Self::MissingChoice(_) => "E_MISSING_CHOICE",
            Self::UnexpectedChoice(_) => "E_UNEXPECTED_CHOICE",
            Self::InvalidTarget(_) => "E_INVALID_TARGET",
        }
    }
}

// =============================================================================
// NODES
// =============================================================================

/// Add a line with a default duration. It becomes the start node when the
/// graph has none.
///
/// # Errors
///
/// [`EditError::EmptyLabel`] for a blank label, [`EditError::DuplicateNode`]
/// when a line or choice set already uses the label.
pub fn add_line(graph: &Graph, label: &str, position: Position) -> Result<Graph, EditError> {
    let id = fresh_id(graph, NodeKind::Line, label)?;
    let node = Node::line(id.label(), LinePayload::with_duration(NEW_LINE_DURATION)).at(position);
    Ok(push_node(graph, node))
}

/// Add an empty choice set. It becomes the start node when the graph has
/// none.
///
/// # Errors
///
/// [`EditError::EmptyLabel`] for a blank label, [`EditError::DuplicateNode`]
/// when a line or choice set already uses the label.
pub fn add_choice_set(graph: &Graph, label: &str, position: Position) -> Result<Graph, EditError> {
    let id = fresh_id(graph, NodeKind::ChoiceSet, label)?;
    let node = Node::choice_set(id.label(), Vec::new()).at(position);
    Ok(push_node(graph, node))
}

/// Add the start marker and hand it the start flag.
///
/// # Errors
///
/// [`EditError::DuplicateNode`] when the graph already has a marker.
pub fn add_start_marker(graph: &Graph, position: Position) -> Result<Graph, EditError> {
    let id = fresh_id(graph, NodeKind::StartMarker, START_MARKER_LABEL)?;
    let mut next = graph.clone();
    for node in &mut next.nodes {
        node.is_start = false;
    }
    next.nodes.push(Node::start_marker(id.label(), None).starting(true).at(position));
    tracing::info!(node = %id, "added start marker");
    Ok(next)
}

/// Move the start flag to `id`.
///
/// # Errors
///
/// [`EditError::UnknownNode`] when `id` is not in the graph.
pub fn set_start(graph: &Graph, id: &NodeId) -> Result<Graph, EditError> {
    require(graph, id)?;
    let mut next = graph.clone();
    for node in &mut next.nodes {
        node.is_start = &node.id == id;
    }
    tracing::info!(node = %id, "moved start flag");
    Ok(next)
}

/// Give a node a new label, rewriting every edge that touches it.
///
/// The label is trimmed first; renaming to the current label is a no-op.
///
/// # Errors
///
/// [`EditError::UnknownNode`], [`EditError::EmptyLabel`], or
/// [`EditError::DuplicateNode`] when another line or choice set already uses
/// the label.
pub fn rename(graph: &Graph, id: &NodeId, label: &str) -> Result<Graph, EditError> {
    require(graph, id)?;
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(EditError::EmptyLabel);
    }
    let renamed = id.relabel(trimmed);
    if &renamed == id {
        return Ok(graph.clone());
    }
    if let Some(owner) = label_owner(graph, renamed.kind(), trimmed) {
        return Err(EditError::DuplicateNode(owner.clone()));
    }

    let mut next = graph.clone();
    for node in next.nodes.iter_mut().filter(|node| &node.id == id) {
        node.id = renamed.clone();
    }
    for edge in &mut next.edges {
        if &edge.source == id {
            edge.source = renamed.clone();
        }
        if &edge.target == id {
            edge.target = renamed.clone();
        }
    }
    tracing::info!(from = %id, to = %renamed, "renamed node");
    Ok(next)
}

/// Remove a node and every edge into or out of it. Lines that pointed at it
/// get their remaining ordinals renumbered.
///
/// # Errors
///
/// [`EditError::UnknownNode`] when `id` is not in the graph.
pub fn delete_node(graph: &Graph, id: &NodeId) -> Result<Graph, EditError> {
    require(graph, id)?;
    let mut affected: Vec<NodeId> = graph
        .edges
        .iter()
        .filter(|edge| &edge.target == id && &edge.source != id)
        .map(|edge| edge.source.clone())
        .collect();
    affected.sort();
    affected.dedup();

    let mut next = graph.clone();
    next.nodes.retain(|node| &node.id != id);
    next.edges.retain(|edge| &edge.source != id && &edge.target != id);
    for source in &affected {
        next.edges = reorder::renumber_ordinals(next.edges, source);
    }
    tracing::info!(node = %id, "deleted node");
    Ok(next)
}

/// Replace a line's payload.
///
/// # Errors
///
/// [`EditError::UnknownNode`], or [`EditError::WrongKind`] for a non-line.
pub fn update_line(graph: &Graph, id: &NodeId, payload: LinePayload) -> Result<Graph, EditError> {
    let mut next = graph.clone();
    let node = next.node_mut(id).ok_or_else(|| EditError::UnknownNode(id.clone()))?;
    let Payload::Line(line) = &mut node.payload else {
        return Err(EditError::WrongKind(id.clone(), NodeKind::Line));
    };
    *line = payload;
    Ok(next)
}

// =============================================================================
// CHOICE ROWS
// =============================================================================

/// Append a row to a choice set.
///
/// # Errors
///
/// [`EditError::UnknownNode`], or [`EditError::WrongKind`] for a non-choice
/// node.
pub fn add_choice(graph: &Graph, id: &NodeId, text: &str) -> Result<Graph, EditError> {
    let mut next = graph.clone();
    choices_mut(&mut next, id)?.push(ChoiceRow { text: text.to_owned() });
    Ok(next)
}

/// Change the text of row `index`.
///
/// # Errors
///
/// [`EditError::UnknownNode`], [`EditError::WrongKind`], or
/// [`EditError::ChoiceOutOfRange`].
pub fn set_choice_text(graph: &Graph, id: &NodeId, index: usize, text: &str) -> Result<Graph, EditError> {
    let mut next = graph.clone();
    let row = choices_mut(&mut next, id)?
        .get_mut(index)
        .ok_or_else(|| EditError::ChoiceOutOfRange { node: id.clone(), index })?;
    row.text = text.to_owned();
    Ok(next)
}

/// Delete row `index` and its edge; later rows and their edges move up one.
///
/// # Errors
///
/// [`EditError::UnknownNode`], [`EditError::WrongKind`], or
/// [`EditError::ChoiceOutOfRange`].
pub fn remove_choice(graph: &Graph, id: &NodeId, index: usize) -> Result<Graph, EditError> {
    let mut next = graph.clone();
    let choices = choices_mut(&mut next, id)?;
    if index >= choices.len() {
        return Err(EditError::ChoiceOutOfRange { node: id.clone(), index });
    }
    choices.remove(index);
    next.edges = reorder::remove_choice(next.edges, id, index);
    tracing::info!(node = %id, index, "removed choice row");
    Ok(next)
}

// =============================================================================
// EDGES
// =============================================================================

/// Connect `source` to `target`.
///
/// Choice sets connect from row `choice`, replacing whatever edge that row
/// had. Lines append a trigger with the next ordinal. The start marker keeps
/// a single edge, so connecting it again replaces the old one.
///
/// # Errors
///
/// [`EditError::UnknownNode`] for either end, [`EditError::InvalidTarget`]
/// when the target is the start marker, [`EditError::MissingChoice`] /
/// [`EditError::UnexpectedChoice`] when `choice` does not fit the source,
/// and [`EditError::ChoiceOutOfRange`].
pub fn connect(graph: &Graph, source: &NodeId, choice: Option<usize>, target: &NodeId) -> Result<Graph, EditError> {
    let from = require(graph, source)?;
    let to = require(graph, target)?;
    if to.id.kind() == NodeKind::StartMarker {
        return Err(EditError::InvalidTarget(target.clone()));
    }

    let mut next = graph.clone();
    let edge = match (&from.payload, choice) {
        (Payload::ChoiceSet(set), Some(index)) => {
            if index >= set.choices.len() {
                return Err(EditError::ChoiceOutOfRange { node: source.clone(), index });
            }
            next.edges
                .retain(|edge| !(&edge.source == source && edge.port.choice_index() == Some(index)));
            Edge::choice(source.clone(), index, target.clone())
        }
        (Payload::ChoiceSet(_), None) => return Err(EditError::MissingChoice(source.clone())),
        (Payload::Line(_) | Payload::StartMarker(_), Some(_)) => {
            return Err(EditError::UnexpectedChoice(source.clone()));
        }
        (Payload::Line(_), None) => {
            next.edges = reorder::renumber_ordinals(next.edges, source);
            let ordinal = next
                .edges
                .iter()
                .filter(|edge| &edge.source == source && matches!(edge.port, Port::Trigger(_)))
                .count();
            Edge::trigger(source.clone(), target.clone(), ordinal, true)
        }
        (Payload::StartMarker(_), None) => {
            next.edges.retain(|edge| &edge.source != source);
            Edge::start(source.clone(), target.clone())
        }
    };

    let edge = Edge { id: unique_edge_id(&next.edges, edge.id.clone()), ..edge };
    tracing::info!(edge = %edge.id, "connected nodes");
    next.edges.push(edge);
    Ok(next)
}

/// Remove the first edge with `edge_id`. A line's remaining ordinals are
/// renumbered; a choice row simply becomes unconnected.
///
/// # Errors
///
/// [`EditError::UnknownEdge`] when no edge has `edge_id`.
pub fn disconnect(graph: &Graph, edge_id: &str) -> Result<Graph, EditError> {
    let position = graph
        .edges
        .iter()
        .position(|edge| edge.id == edge_id)
        .ok_or_else(|| EditError::UnknownEdge(edge_id.to_owned()))?;

    let mut next = graph.clone();
    let edge = next.edges.remove(position);
    let source = edge.source;
    let is_trigger = matches!(edge.port, Port::Trigger(_));
    if is_trigger {
        next.edges = reorder::renumber_ordinals(next.edges, &source);
    }
    tracing::info!(edge = edge_id, "disconnected edge");
    Ok(next)
}

// =============================================================================
// HELPERS
// =============================================================================

fn require<'a>(graph: &'a Graph, id: &NodeId) -> Result<&'a Node, EditError> {
    graph.node(id).ok_or_else(|| EditError::UnknownNode(id.clone()))
}

fn fresh_id(graph: &Graph, kind: NodeKind, label: &str) -> Result<NodeId, EditError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(EditError::EmptyLabel);
    }
    if let Some(owner) = label_owner(graph, kind, trimmed) {
        return Err(EditError::DuplicateNode(owner.clone()));
    }
    Ok(NodeId::new(kind, trimmed))
}

/// The node already using `label` in the namespace of `kind`. Lines and
/// choice sets share one namespace, since triggers name them by label alone.
fn label_owner<'a>(graph: &'a Graph, kind: NodeKind, label: &str) -> Option<&'a NodeId> {
    let exported = |kind: NodeKind| matches!(kind, NodeKind::Line | NodeKind::ChoiceSet);
    graph
        .nodes
        .iter()
        .map(|node| &node.id)
        .filter(|id| id.label() == label)
        .find(|id| id.kind() == kind || (exported(kind) && exported(id.kind())))
}

fn push_node(graph: &Graph, node: Node) -> Graph {
    let mut next = graph.clone();
    let node = node.starting(graph.start_node().is_none());
    tracing::info!(node = %node.id, "added node");
    next.nodes.push(node);
    next
}

fn choices_mut<'a>(graph: &'a mut Graph, id: &NodeId) -> Result<&'a mut Vec<ChoiceRow>, EditError> {
    let node = graph.node_mut(id).ok_or_else(|| EditError::UnknownNode(id.clone()))?;
    match &mut node.payload {
        Payload::ChoiceSet(set) => Ok(&mut set.choices),
        Payload::Line(_) | Payload::StartMarker(_) => Err(EditError::WrongKind(id.clone(), NodeKind::ChoiceSet)),
    }
}

#[cfg(test)]
#[path = "edit_test.rs"]
mod tests;
