//! Errors raised by the wiring passes and the declaration registry.

use weft_tree::{ClassId, NodeId, TreeError};

/// Failure of an install or connect pass on one node.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A required target was not found and no failure handler was given.
    #[error("{message}")]
    Unresolved { node: NodeId, message: String },

    /// A target was found but the member could not be written.
    #[error("member `{member}` of node {node} cannot be written")]
    Unwritable { node: NodeId, member: &'static str },

    /// The host refused a signal connection.
    #[error("connecting signal `{signal}` for node {node} failed: {source}")]
    Connect {
        node: NodeId,
        signal: &'static str,
        #[source]
        source: TreeError,
    },
}

/// Invalid declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclareError {
    #[error("class `{class}` is already declared")]
    AlreadyDeclared { class: ClassId },

    #[error("class `{class}` declares member `{member}` twice")]
    DuplicateMember { class: ClassId, member: &'static str },

    #[error("class `{class}` wires unknown member `{member}`")]
    UnknownMember { class: ClassId, member: &'static str },
}
