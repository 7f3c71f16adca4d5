//! View error types.

use thiserror::Error;

use rack_types::{NodeId, NodeKind};

/// Errors raised by visibility commands and date rendering.
#[derive(Debug, Error)]
pub enum ViewError {
    /// No node with this id exists in the hierarchy
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// The node exists but the command targets another level
    #[error("Node {id} is a {actual}, expected a {expected}")]
    WrongKind {
        id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },

    /// Configured UTC offset is out of range
    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),
}
