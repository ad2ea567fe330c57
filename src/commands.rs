//! Subcommand bodies.
//!
//! Each command takes its input text and returns a value for `main` to print,
//! so the whole pipeline can be exercised without touching stdin or stdout.
//! Snapshots are decoded once at the top of each command and re-encoded with
//! the `replace` flag they came in with.

use clap::{Args, Subcommand};
use dialog::doc::Document;
use dialog::edit::{self, EditError};
use dialog::graph::{Graph, LinePayload, Position};
use dialog::layout::{self, Spacing};
use dialog::snapshot::SnapshotError;
use dialog::{DialogError, ErrorCode, NodeId, Snapshot};
use serde::Serialize;
use serde_json::Value;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Dialog(#[from] DialogError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("{0} validation problem(s)")]
    Invalid(usize),
    #[error("export blocked by validation (use --force to export anyway):\n{}", .0.join("\n"))]
    ExportBlocked(Vec<String>),
    #[error("exported document differs from the input")]
    RoundTripMismatch,
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E_READ",
            Self::Write(_) => "E_WRITE",
            Self::InvalidJson(_) => "E_INVALID_JSON",
            Self::Dialog(error) => error.error_code(),
            Self::Snapshot(error) => error.error_code(),
            Self::Edit(error) => error.error_code(),
            Self::Invalid(_) => "E_INVALID_GRAPH",
            Self::ExportBlocked(_) => "E_EXPORT_BLOCKED",
            Self::RoundTripMismatch => "E_ROUND_TRIP_MISMATCH",
        }
    }
}

/// Result of `export`: the document plus any diagnostics it was forced past.
#[derive(Debug)]
pub struct Exported {
    pub document: Document,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub lines: usize,
    pub choice_sets: usize,
    pub edges: usize,
    /// Labels dropped on export because the start node cannot reach them.
    pub pruned: Vec<String>,
    pub diagnostics: Vec<String>,
    pub identical: bool,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct PositionArgs {
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub y: f64,
}

impl From<PositionArgs> for Position {
    fn from(args: PositionArgs) -> Self {
        Position::new(args.x, args.y)
    }
}

/// Node ids are written `{type}-{label}`, e.g. `npcLine-intro`.
#[derive(Subcommand, Debug, Clone)]
pub enum EditOp {
    /// Add an NPC line.
    AddLine {
        label: String,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Add an empty player choice set.
    AddChoiceSet {
        label: String,
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Add the start marker and move the start flag onto it.
    AddStartMarker {
        #[command(flatten)]
        position: PositionArgs,
    },
    /// Append a row to a choice set.
    AddChoice { node: NodeId, text: String },
    SetChoiceText { node: NodeId, index: usize, text: String },
    /// Delete a row; later rows and their edges move up.
    RemoveChoice { node: NodeId, index: usize },
    /// Connect two nodes; `--choice` picks the row of a choice set.
    Connect {
        source: NodeId,
        target: NodeId,
        #[arg(long)]
        choice: Option<usize>,
    },
    Disconnect { edge: String },
    Delete { node: NodeId },
    Rename { node: NodeId, label: String },
    SetStart { node: NodeId },
    /// Replace a line's fields with a JSON object (`text`, `duration`, …).
    UpdateLine { node: NodeId, payload: String },
}

// =============================================================================
// COMMANDS
// =============================================================================

pub fn graph(input: &str, spacing: Spacing) -> Result<Snapshot, CliError> {
    let doc = Document::from_json(input)?;
    let graph = dialog::build_with_spacing(&doc, spacing)?;
    tracing::info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "built graph");
    Ok(Snapshot::from_graph(&graph, doc.replace))
}

/// Validate, then reconstruct. `replace` overrides the snapshot's flag.
pub fn export(input: &str, replace: Option<bool>, force: bool) -> Result<Exported, CliError> {
    let snapshot = decode_snapshot(input)?;
    let graph = snapshot.into_graph()?;
    let diagnostics = dialog::validate(&graph);
    if !diagnostics.is_empty() && !force {
        return Err(CliError::ExportBlocked(diagnostics));
    }
    let document = dialog::reconstruct(&graph, replace.or(snapshot.replace))?;
    Ok(Exported { document, diagnostics })
}

pub fn validate(input: &str) -> Result<Vec<String>, CliError> {
    let graph = decode_snapshot(input)?.into_graph()?;
    Ok(dialog::validate(&graph))
}

pub fn layout(input: &str, spacing: Spacing) -> Result<Snapshot, CliError> {
    let snapshot = decode_snapshot(input)?;
    let graph = layout::relayout(&snapshot.into_graph()?, spacing)?;
    Ok(Snapshot::from_graph(&graph, snapshot.replace))
}

/// Run a document through build and export and compare the JSON values.
pub fn check(input: &str, spacing: Spacing) -> Result<CheckReport, CliError> {
    let original: Value = serde_json::from_str(input)?;
    let doc: Document = serde_json::from_value(original.clone())?;
    let graph = dialog::build_with_spacing(&doc, spacing)?;
    let diagnostics = dialog::validate(&graph);
    let exported = dialog::reconstruct(&graph, doc.replace)?;

    let pruned = doc
        .lines
        .keys()
        .filter(|label| !exported.lines.contains_key(*label))
        .chain(doc.choice_sets.keys().filter(|label| !exported.choice_sets.contains_key(*label)))
        .cloned()
        .collect();
    let identical = serde_json::to_value(&exported)? == original;
    if !identical {
        tracing::warn!("round trip changed the document");
    }

    Ok(CheckReport {
        lines: doc.lines.len(),
        choice_sets: doc.choice_sets.len(),
        edges: graph.edges.len(),
        pruned,
        diagnostics,
        identical,
    })
}

pub fn edit(input: &str, op: &EditOp) -> Result<Snapshot, CliError> {
    let snapshot = decode_snapshot(input)?;
    let graph = apply(&snapshot.into_graph()?, op)?;
    Ok(Snapshot::from_graph(&graph, snapshot.replace))
}

fn apply(graph: &Graph, op: &EditOp) -> Result<Graph, CliError> {
    let edited = match op {
        EditOp::AddLine { label, position } => edit::add_line(graph, label, (*position).into()),
        EditOp::AddChoiceSet { label, position } => edit::add_choice_set(graph, label, (*position).into()),
        EditOp::AddStartMarker { position } => edit::add_start_marker(graph, (*position).into()),
        EditOp::AddChoice { node, text } => edit::add_choice(graph, node, text),
        EditOp::SetChoiceText { node, index, text } => edit::set_choice_text(graph, node, *index, text),
        EditOp::RemoveChoice { node, index } => edit::remove_choice(graph, node, *index),
        EditOp::Connect { source, target, choice } => edit::connect(graph, source, *choice, target),
        EditOp::Disconnect { edge } => edit::disconnect(graph, edge),
        EditOp::Delete { node } => edit::delete_node(graph, node),
        EditOp::Rename { node, label } => edit::rename(graph, node, label),
        EditOp::SetStart { node } => edit::set_start(graph, node),
        EditOp::UpdateLine { node, payload } => {
            let payload: LinePayload = serde_json::from_str(payload)?;
            edit::update_line(graph, node, payload)
        }
    };
    edited.map_err(CliError::from)
}

fn decode_snapshot(input: &str) -> Result<Snapshot, CliError> {
    Ok(serde_json::from_str(input)?)
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
