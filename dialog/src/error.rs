//! Fatal error kinds shared by the builder and the reconstructor.
//!
//! Everything else that can be wrong with a graph (blank choice text, a
//! dangling choice row, a non-numeric duration) is a validator diagnostic,
//! not an error.

/// Stable machine-readable code for an error value.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// `start` resolves to neither a line nor a choice set.
    #[error("malformed document: start label \"{0}\" names neither an NPC line nor a player choice")]
    MalformedDocument(String),
    /// No node carries the start flag.
    #[error("No start node found in graph")]
    NoStartNode,
}

impl ErrorCode for DialogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedDocument(_) => "E_MALFORMED_DOCUMENT",
            Self::NoStartNode => "E_NO_START_NODE",
        }
    }
}
