//! Dialog document and editable graph engine.
//!
//! A dialog document names NPC *lines* and player *choice sets* and links
//! them by label through `triggers`. The visual editor works on a directed
//! graph instead: one node per labeled entry, one edge per trigger reference.
//! This crate owns both directions of that transformation along with the
//! layout, edge bookkeeping and pre-export validation that operate on the
//! graph. Rendering and file handling live with the caller.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`id`] | `{type}-{label}` node id codec |
//! | [`doc`] | Persisted document types (`npcLines`, `playerChoices`) |
//! | [`graph`] | Typed nodes, edges, ports and reachability |
//! | [`layout`] | Breadth-first tree layout |
//! | [`build`] | Document → graph |
//! | [`reorder`] | Choice-index and ordinal maintenance after deletions |
//! | [`export`] | Graph → document, pruning unreachable nodes |
//! | [`validate`] | Human-readable diagnostics gating export |
//! | [`snapshot`] | Loose JSON shape exchanged with the rendering layer |
//! | [`edit`] | Editing operations (add, connect, rename, delete, …) |
//! | [`error`] | Fatal error kinds and their stable codes |

pub mod build;
pub mod doc;
pub mod edit;
pub mod error;
pub mod export;
pub mod graph;
pub mod id;
pub mod layout;
pub mod reorder;
pub mod snapshot;
pub mod validate;

pub use build::{build, build_with_spacing};
pub use doc::Document;
pub use error::{DialogError, ErrorCode};
pub use export::reconstruct;
pub use graph::{Edge, Graph, Node, Payload, Port};
pub use id::{NodeId, NodeKind};
pub use layout::{Spacing, tree_layout};
pub use reorder::remove_choice;
pub use snapshot::Snapshot;
pub use validate::validate;
