//! Host interface the traversal and wiring engines run against.
//!
//! The engines never own nodes. They read structure through [`Tree`], write
//! resolved references through [`ScriptHost`] and bind handlers through
//! [`Signals`]. [`SceneTree`](crate::SceneTree) implements all three.

use std::sync::Arc;

use crate::{ClassId, NodeId, Script, TreeError};

/// Read-only view of a node hierarchy.
///
/// Accessors on an id that no longer resolves behave like a detached,
/// childless, unnamed node; [`exists`](Tree::exists) is the authoritative
/// liveness check.
pub trait Tree {
    /// The node's name. Names are not unique.
    fn name(&self, node: NodeId) -> Option<&str>;

    /// The node's concrete runtime class.
    fn class(&self, node: NodeId) -> Option<ClassId>;

    /// The parent, `None` at the top of the tree.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn child_count(&self, node: NodeId) -> usize;

    /// The child at `index` in child order.
    fn child(&self, node: NodeId, index: usize) -> Option<NodeId>;

    /// Live and not queued for deletion.
    fn exists(&self, node: NodeId) -> bool;
}

/// Access to the script instance attached to each node.
pub trait ScriptHost: Tree {
    fn script(&self, node: NodeId) -> Option<&(dyn Script + 'static)>;

    fn script_mut(&mut self, node: NodeId) -> Option<&mut (dyn Script + 'static)>;
}

/// Callback invoked on the target's script when a signal fires. The second
/// argument is the emitting node.
pub type SignalHandler = Arc<dyn Fn(&mut (dyn Script + 'static), NodeId) + Send + Sync>;

/// Signal connection table.
pub trait Signals: Tree {
    fn is_connected(&self, emitter: NodeId, signal: &str, target: NodeId, method: &str) -> bool;

    fn connect(
        &mut self,
        emitter: NodeId,
        signal: &str,
        target: NodeId,
        method: &str,
        handler: SignalHandler,
    ) -> Result<(), TreeError>;
}
