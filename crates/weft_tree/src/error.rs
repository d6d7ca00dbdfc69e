//! Errors raised by the scene tree.

use crate::NodeId;

/// Error returned by a node-added hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Structural errors from [`SceneTree`](crate::SceneTree) mutations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The id names a destroyed node.
    #[error("node {0} no longer exists")]
    StaleNode(NodeId),

    /// The child is already attached somewhere.
    #[error("node {child} already has parent {parent}")]
    AlreadyParented { child: NodeId, parent: NodeId },

    /// Attaching would make a node its own ancestor.
    #[error("adding {child} under {parent} would make {child} its own ancestor")]
    WouldCycle { parent: NodeId, child: NodeId },

    /// Detaching a node from something that is not its parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Every slot index is taken.
    #[error("scene tree exceeded capacity: {count} slots, max is {}", u32::MAX)]
    ArenaFull { count: usize },

    /// A node-added hook failed. The node stays in the tree.
    #[error("node-added hook `{hook}` failed for {node}: {source}")]
    Hook {
        hook: &'static str,
        node: NodeId,
        #[source]
        source: HookError,
    },
}
