//! Typed editing graph.
//!
//! Nodes carry a tagged payload instead of the loose property bag the
//! rendering layer uses; edges carry a decoded [`Port`] instead of a handle
//! string. Conversion to and from the loose shape happens only in
//! [`crate::snapshot`].
//!
//! INVARIANTS
//! ==========
//! - Node ids are unique and `id.kind()` always matches the payload variant.
//! - Exactly one node carries `is_start` in a well-formed graph.
//! - For every choice-set node, outgoing choice indices are `0..n-1` with no
//!   gaps or duplicates ([`crate::reorder`] restores this after deletions).
//! - A line's outgoing ordinals are `0..m-1` in trigger order.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Deserializer, Serialize};

use crate::doc::{self, Animation, Camera, HidableGroup, Media, numeric};
use crate::id::{NodeId, NodeKind};

// =============================================================================
// NODES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Line fields as edited on a node. `triggers` is not here; it lives in edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// May be NaN while editing; the validator reports it.
    #[serde(
        default = "missing_duration",
        deserialize_with = "lenient_duration",
        serialize_with = "numeric::serialize"
    )]
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidable_group: Option<HidableGroup>,
}

impl LinePayload {
    #[must_use]
    pub fn with_duration(duration: f64) -> Self {
        Self {
            text: None,
            duration,
            media: None,
            animation: None,
            camera: None,
            hidable_group: None,
        }
    }

    /// Copy every field of a document line except `triggers`.
    #[must_use]
    pub fn from_line(line: &doc::Line) -> Self {
        Self {
            text: line.text.clone(),
            duration: line.duration,
            media: line.media.clone(),
            animation: line.animation.clone(),
            camera: line.camera.clone(),
            hidable_group: line.hidable_group.clone(),
        }
    }

    /// Rebuild a document line, attaching the triggers derived from edges.
    #[must_use]
    pub fn to_line(&self, triggers: Option<doc::Triggers>) -> doc::Line {
        doc::Line {
            text: self.text.clone(),
            duration: self.duration,
            media: self.media.clone(),
            animation: self.animation.clone(),
            camera: self.camera.clone(),
            hidable_group: self.hidable_group.clone(),
            triggers,
        }
    }
}

fn missing_duration() -> f64 {
    f64::NAN
}

/// Anything that is not a JSON number reads as NaN.
fn lenient_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}

/// One row of a choice set. The row's target is the edge on `choice-{i}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceRow {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceSetPayload {
    #[serde(default)]
    pub choices: Vec<ChoiceRow>,
}

/// The editor's start marker. Its `replace` flag is the document's.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartMarkerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Line(LinePayload),
    ChoiceSet(ChoiceSetPayload),
    StartMarker(StartMarkerPayload),
}

impl Payload {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Line(_) => NodeKind::Line,
            Self::ChoiceSet(_) => NodeKind::ChoiceSet,
            Self::StartMarker(_) => NodeKind::StartMarker,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub is_start: bool,
    pub position: Position,
    pub payload: Payload,
}

impl Node {
    #[must_use]
    pub fn line(label: impl Into<String>, payload: LinePayload) -> Self {
        Self::with_payload(NodeId::line(label), Payload::Line(payload))
    }

    #[must_use]
    pub fn choice_set(label: impl Into<String>, choices: Vec<ChoiceRow>) -> Self {
        Self::with_payload(NodeId::choice_set(label), Payload::ChoiceSet(ChoiceSetPayload { choices }))
    }

    #[must_use]
    pub fn start_marker(label: impl Into<String>, replace: Option<bool>) -> Self {
        Self::with_payload(NodeId::start_marker(label), Payload::StartMarker(StartMarkerPayload { replace }))
    }

    fn with_payload(id: NodeId, payload: Payload) -> Self {
        Self { id, is_start: false, position: Position::default(), payload }
    }

    #[must_use]
    pub fn starting(mut self, is_start: bool) -> Self {
        self.is_start = is_start;
        self
    }

    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        self.id.label()
    }

    /// Number of choice rows, zero for non-choice nodes.
    #[must_use]
    pub fn choice_count(&self) -> usize {
        match &self.payload {
            Payload::ChoiceSet(set) => set.choices.len(),
            Payload::Line(_) | Payload::StartMarker(_) => 0,
        }
    }
}

// =============================================================================
// EDGES
// =============================================================================

/// Which output of the source node an edge leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// A line's trigger. The ordinal is the position in the `triggers` list.
    Trigger(Option<usize>),
    /// Choice row `i` of a choice set (handle `choice-{i}`).
    Choice(usize),
    /// The start marker's single output (handle `start`).
    Start,
}

const CHOICE_HANDLE_PREFIX: &str = "choice-";
const START_HANDLE: &str = "start";

impl Port {
    #[must_use]
    pub fn choice_index(self) -> Option<usize> {
        match self {
            Self::Choice(index) => Some(index),
            Self::Trigger(_) | Self::Start => None,
        }
    }

    #[must_use]
    pub fn ordinal(self) -> Option<usize> {
        match self {
            Self::Trigger(ordinal) => ordinal,
            Self::Choice(_) | Self::Start => None,
        }
    }

    /// Handle string as the rendering layer names it. Triggers use the
    /// node's default handle.
    #[must_use]
    pub fn handle(self) -> Option<String> {
        match self {
            Self::Choice(index) => Some(format!("{CHOICE_HANDLE_PREFIX}{index}")),
            Self::Start => Some(START_HANDLE.to_owned()),
            Self::Trigger(_) => None,
        }
    }

    /// Decode a handle string. `None` for the default handle or anything
    /// unrecognised.
    #[must_use]
    pub fn from_handle(handle: &str) -> Option<Self> {
        if handle == START_HANDLE {
            return Some(Self::Start);
        }
        let raw = handle.strip_prefix(CHOICE_HANDLE_PREFIX)?;
        match raw.parse() {
            Ok(index) => Some(Self::Choice(index)),
            Err(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    pub port: Port,
}

impl Edge {
    /// Line trigger edge. Ids carry the ordinal suffix only when the line
    /// had a `triggers` list.
    #[must_use]
    pub fn trigger(source: NodeId, target: NodeId, ordinal: usize, listed: bool) -> Self {
        let id = if listed {
            format!("edge-{source}-to-{label}-{ordinal}", label = target.label())
        } else {
            format!("edge-{source}-to-{label}", label = target.label())
        };
        Self { id, source, target, port: Port::Trigger(Some(ordinal)) }
    }

    #[must_use]
    pub fn choice(source: NodeId, index: usize, target: NodeId) -> Self {
        let id = choice_edge_id(&source, index, &target);
        Self { id, source, target, port: Port::Choice(index) }
    }

    #[must_use]
    pub fn start(source: NodeId, target: NodeId) -> Self {
        let id = format!("edge-{source}-to-{label}", label = target.label());
        Self { id, source, target, port: Port::Start }
    }
}

pub(crate) fn choice_edge_id(source: &NodeId, index: usize, target: &NodeId) -> String {
    format!("edge-{source}-{index}-to-{label}", label = target.label())
}

/// `base`, or `base-2`, `base-3`, … if another edge in `edges` already has it.
pub(crate) fn unique_edge_id(edges: &[Edge], base: String) -> String {
    let taken = |candidate: &str| edges.iter().any(|edge| edge.id == candidate);
    if !taken(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// =============================================================================
// GRAPH
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| &node.id == id)
    }

    /// The first start-flagged node.
    #[must_use]
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_start)
    }

    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|node| node.id.clone()).collect()
    }

    /// Outgoing edges per source, each list in edge order.
    #[must_use]
    pub fn outgoing(&self) -> HashMap<&NodeId, Vec<&Edge>> {
        let mut out: HashMap<&NodeId, Vec<&Edge>> = HashMap::new();
        for edge in &self.edges {
            out.entry(&edge.source).or_default().push(edge);
        }
        out
    }

    /// Every id reachable from `start` over outgoing edges, `start` included.
    /// Dangling edge targets are included too; they simply match no node.
    #[must_use]
    pub fn reachable_from(&self, start: &NodeId) -> HashSet<NodeId> {
        let outgoing = self.outgoing();
        let mut reachable = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if !reachable.insert(current.clone()) {
                continue;
            }
            for edge in outgoing.get(current).into_iter().flatten() {
                queue.push_back(&edge.target);
            }
        }
        reachable
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
