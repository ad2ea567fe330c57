//! Loose graph snapshot exchanged with the rendering layer.
//!
//! The renderer wants nodes as `{id, type, position, data}` with the payload
//! flattened into `data` next to the `_label`/`_type`/`_isStart` bookkeeping
//! keys, and edges as `{id, source, sourceHandle?, target, data?}` with the
//! choice row encoded in the handle string (`choice-3`). This module is the
//! only place that shape exists: [`Snapshot::from_graph`] writes it and
//! [`Snapshot::into_graph`] decodes it once into the typed [`Graph`].
//!
//! ERROR HANDLING
//! ==============
//! Decoding rejects what cannot be typed at all (unknown node types, ids
//! without a known prefix, payloads of the wrong shape, duplicate ids).
//! Anything merely invalid for export, such as a non-numeric duration or a
//! choice row without an edge, decodes fine and is left to the validator.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ErrorCode;
use crate::graph::{ChoiceSetPayload, Edge, Graph, LinePayload, Node, Payload, Port, Position, StartMarkerPayload};
use crate::id::{IdError, NodeId, NodeKind};

const LABEL_KEY: &str = "_label";
const TYPE_KEY: &str = "_type";
const IS_START_KEY: &str = "_isStart";
const CHOICE_INDEX_KEY: &str = "choiceIndex";
const ORDINAL_KEY: &str = "ordinal";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid node id: {0}")]
    InvalidId(#[from] IdError),
    #[error("node `{id}` has unknown type `{kind}`")]
    UnknownNodeType { id: String, kind: String },
    #[error("node `{id}` has type `{kind}` but its id says otherwise")]
    TypeMismatch { id: String, kind: String },
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("node `{id}` has a malformed payload: {source}")]
    Payload {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ErrorCode for SnapshotError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "E_BAD_NODE_ID",
            Self::UnknownNodeType { .. } => "E_UNKNOWN_NODE_TYPE",
            Self::TypeMismatch { .. } => "E_NODE_TYPE_MISMATCH",
            Self::DuplicateNode(_) => "E_DUPLICATE_NODE",
            Self::Payload { .. } => "E_BAD_PAYLOAD",
        }
    }
}

/// Nodes and edges as the renderer sees them, plus the carried `replace`
/// flag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<SnapshotEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub id: String,
    pub source: String,
    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

// =============================================================================
// GRAPH -> SNAPSHOT
// =============================================================================

impl Snapshot {
    #[must_use]
    pub fn from_graph(graph: &Graph, replace: Option<bool>) -> Self {
        Self {
            nodes: graph.nodes.iter().map(node_to_wire).collect(),
            edges: graph.edges.iter().map(edge_to_wire).collect(),
            replace,
        }
    }

    /// Decode into the typed graph.
    ///
    /// # Errors
    ///
    /// See [`SnapshotError`]: unknown types, unparseable or duplicate ids,
    /// and payloads of the wrong shape.
    pub fn into_graph(&self) -> Result<Graph, SnapshotError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for wire in &self.nodes {
            if !seen.insert(wire.id.as_str()) {
                return Err(SnapshotError::DuplicateNode(wire.id.clone()));
            }
            nodes.push(node_from_wire(wire)?);
        }
        let edges = self.edges.iter().map(edge_from_wire).collect::<Result<Vec<_>, _>>()?;
        Ok(Graph::new(nodes, edges))
    }
}

fn node_to_wire(node: &Node) -> SnapshotNode {
    let kind = node.id.kind().prefix();
    let mut data = Map::new();
    data.insert(LABEL_KEY.into(), Value::String(node.label().to_owned()));
    data.insert(TYPE_KEY.into(), Value::String(kind.to_owned()));
    data.insert(IS_START_KEY.into(), Value::Bool(node.is_start));

    let payload = match &node.payload {
        Payload::Line(line) => serde_json::to_value(line),
        Payload::ChoiceSet(set) => serde_json::to_value(set),
        Payload::StartMarker(marker) => serde_json::to_value(marker),
    };
    // Payload types only hold strings, numbers, bools and string-keyed maps,
    // so serialising them cannot fail.
    if let Ok(Value::Object(fields)) = payload {
        data.extend(fields);
    }

    SnapshotNode { id: node.id.to_string(), kind: kind.to_owned(), position: node.position, data }
}

fn edge_to_wire(edge: &Edge) -> SnapshotEdge {
    let data = match edge.port {
        Port::Choice(index) => Some(Map::from_iter([(CHOICE_INDEX_KEY.to_owned(), Value::from(index))])),
        Port::Trigger(Some(ordinal)) => Some(Map::from_iter([(ORDINAL_KEY.to_owned(), Value::from(ordinal))])),
        Port::Trigger(None) | Port::Start => None,
    };
    SnapshotEdge {
        id: edge.id.clone(),
        source: edge.source.to_string(),
        source_handle: edge.port.handle(),
        target: edge.target.to_string(),
        data,
    }
}

// =============================================================================
// SNAPSHOT -> GRAPH
// =============================================================================

fn node_from_wire(wire: &SnapshotNode) -> Result<Node, SnapshotError> {
    let Some(kind) = NodeKind::from_prefix(&wire.kind) else {
        return Err(SnapshotError::UnknownNodeType { id: wire.id.clone(), kind: wire.kind.clone() });
    };
    let id: NodeId = wire.id.parse()?;
    if id.kind() != kind {
        return Err(SnapshotError::TypeMismatch { id: wire.id.clone(), kind: wire.kind.clone() });
    }

    let fields = Value::Object(wire.data.clone());
    let payload_error = |source| SnapshotError::Payload { id: wire.id.clone(), source };
    let payload = match kind {
        NodeKind::Line => Payload::Line(serde_json::from_value::<LinePayload>(fields).map_err(payload_error)?),
        NodeKind::ChoiceSet => {
            Payload::ChoiceSet(serde_json::from_value::<ChoiceSetPayload>(fields).map_err(payload_error)?)
        }
        NodeKind::StartMarker => {
            Payload::StartMarker(serde_json::from_value::<StartMarkerPayload>(fields).map_err(payload_error)?)
        }
    };

    let is_start = wire.data.get(IS_START_KEY).and_then(Value::as_bool).unwrap_or(false);
    Ok(Node { id, is_start, position: wire.position, payload })
}

fn edge_from_wire(wire: &SnapshotEdge) -> Result<Edge, SnapshotError> {
    let source: NodeId = wire.source.parse()?;
    let target: NodeId = wire.target.parse()?;

    // The handle is authoritative; `data.choiceIndex` covers edges the
    // renderer created without one.
    let port = match wire.source_handle.as_deref().and_then(Port::from_handle) {
        Some(port) => port,
        None => match index_field(wire.data.as_ref(), CHOICE_INDEX_KEY) {
            Some(index) => Port::Choice(index),
            None if source.kind() == NodeKind::StartMarker => Port::Start,
            None => Port::Trigger(index_field(wire.data.as_ref(), ORDINAL_KEY)),
        },
    };

    Ok(Edge { id: wire.id.clone(), source, target, port })
}

fn index_field(data: Option<&Map<String, Value>>, key: &str) -> Option<usize> {
    let raw = data?.get(key)?.as_u64()?;
    match usize::try_from(raw) {
        Ok(index) => Some(index),
        Err(_) => None,
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;
