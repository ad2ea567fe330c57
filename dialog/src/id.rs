//! Node id codec.
//!
//! Every graph node id is `{prefix}-{label}` where the prefix names the node
//! type. The prefixes match the node type names the rendering layer
//! registers (`npcLine`, `playerChoice`, `start`), so an id can be decoded
//! back into its kind and document label without a lookup table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// An NPC line.
    Line,
    /// A player choice set.
    ChoiceSet,
    /// The editor's explicit start marker. Never exported.
    StartMarker,
}

impl NodeKind {
    pub const ALL: [Self; 3] = [Self::Line, Self::ChoiceSet, Self::StartMarker];

    /// Id prefix, also used as the snapshot node `type`.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Line => "npcLine",
            Self::ChoiceSet => "playerChoice",
            Self::StartMarker => "start",
        }
    }

    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("node id `{0}` has no known type prefix")]
    UnknownPrefix(String),
}

impl ErrorCode for IdError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPrefix(_) => "E_BAD_NODE_ID",
        }
    }
}

/// A decoded node identifier: kind plus document label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    kind: NodeKind,
    label: String,
}

impl NodeId {
    #[must_use]
    pub fn new(kind: NodeKind, label: impl Into<String>) -> Self {
        Self { kind, label: label.into() }
    }

    #[must_use]
    pub fn line(label: impl Into<String>) -> Self {
        Self::new(NodeKind::Line, label)
    }

    #[must_use]
    pub fn choice_set(label: impl Into<String>) -> Self {
        Self::new(NodeKind::ChoiceSet, label)
    }

    #[must_use]
    pub fn start_marker(label: impl Into<String>) -> Self {
        Self::new(NodeKind::StartMarker, label)
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The document label this id encodes.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Same kind, different label.
    #[must_use]
    pub fn relabel(&self, label: impl Into<String>) -> Self {
        Self::new(self.kind, label)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.prefix(), self.label)
    }
}

impl FromStr for NodeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((prefix, label)) = s.split_once('-') else {
            return Err(IdError::UnknownPrefix(s.to_owned()));
        };
        NodeKind::from_prefix(prefix)
            .map(|kind| Self::new(kind, label))
            .ok_or_else(|| IdError::UnknownPrefix(s.to_owned()))
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "id_test.rs"]
mod tests;
