//! Arena-backed reference host tree.
//!
//! `SceneTree` owns every node in a generational arena. Nodes are created
//! detached and enter the tree when attached (directly or through an
//! ancestor) under the root. Entering nodes fire the keyed node-added hooks
//! in pre-order, parent before children, with the whole attached subtree
//! already in place.
//!
//! # Destruction
//! - `free` destroys a node and its subtree immediately; their ids go stale.
//! - `queue_free` marks a node pending; it stops `exist`ing at once and is
//!   destroyed by the next `flush_deletions`.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::host::SignalHandler;
use crate::{ClassId, HookError, NodeId, Script, ScriptHost, Search, Signals, Tree, TreeError};

/// Subscriber to the node-added event.
pub trait NodeAddedHook: Send + Sync {
    fn node_added(&self, tree: &mut SceneTree, node: NodeId) -> Result<(), HookError>;
}

struct NodeData {
    name: String,
    class: ClassId,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    queued_for_deletion: bool,
    inside_tree: bool,
    script: Option<Box<dyn Script>>,
}

struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

struct Connection {
    emitter: NodeId,
    signal: String,
    target: NodeId,
    method: String,
    handler: SignalHandler,
}

/// Generational arena of nodes with a single root.
pub struct SceneTree {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    root: NodeId,
    hooks: Vec<(&'static str, Arc<dyn NodeAddedHook>)>,
    connections: Vec<Connection>,
}

impl SceneTree {
    /// Create a tree holding only its root, named `root`.
    pub fn new() -> Self {
        let mut tree = SceneTree {
            slots: Vec::new(),
            free_slots: Vec::new(),
            root: NodeId::new(0, 0),
            hooks: Vec::new(),
            connections: Vec::new(),
        };
        let root = tree.create("root", ClassId::NODE);
        if let Some(data) = tree.get_mut(root) {
            data.inside_tree = true;
        }
        tree.root = root;
        tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a detached node.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` slots. Use
    /// [`try_create`](Self::try_create) to handle that case.
    pub fn create(&mut self, name: impl Into<String>, class: ClassId) -> NodeId {
        match self.try_create(name, class) {
            Ok(node) => node,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a detached node, failing when no slot index is left.
    pub fn try_create(
        &mut self,
        name: impl Into<String>,
        class: ClassId,
    ) -> Result<NodeId, TreeError> {
        let data = NodeData {
            name: name.into(),
            class,
            parent: None,
            children: SmallVec::new(),
            queued_for_deletion: false,
            inside_tree: false,
            script: None,
        };

        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(data);
            return Ok(NodeId::new(index, slot.generation));
        }

        let index = u32::try_from(self.slots.len()).map_err(|_| TreeError::ArenaFull {
            count: self.slots.len(),
        })?;
        self.slots.push(Slot {
            generation: 0,
            node: Some(data),
        });
        Ok(NodeId::new(index, 0))
    }

    /// Create a detached node carrying `script`.
    pub fn create_with_script(
        &mut self,
        name: impl Into<String>,
        class: ClassId,
        script: impl Script,
    ) -> NodeId {
        let node = self.create(name, class);
        if let Some(data) = self.get_mut(node) {
            data.script = Some(Box::new(script));
        }
        node
    }

    /// Replace the node's script.
    pub fn set_script(&mut self, node: NodeId, script: Box<dyn Script>) -> Result<(), TreeError> {
        let data = self.get_mut(node).ok_or(TreeError::StaleNode(node))?;
        data.script = Some(script);
        Ok(())
    }

    /// The node's script as a concrete `S` (or an embedded base `S`).
    pub fn script_as<S: Script>(&self, node: NodeId) -> Option<&S> {
        self.script(node)?.downcast_ref::<S>()
    }

    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) -> Result<(), TreeError> {
        let data = self.get_mut(node).ok_or(TreeError::StaleNode(node))?;
        data.name = name.into();
        Ok(())
    }

    pub fn is_inside_tree(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|data| data.inside_tree)
    }

    pub fn is_queued_for_deletion(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|data| data.queued_for_deletion)
    }

    /// Attach `child` (and its subtree) as the last child of `parent`.
    ///
    /// If `parent` is inside the tree the subtree enters it and node-added
    /// hooks run for each entering node. A failing hook does not undo the
    /// attachment; the first failure is returned after all hooks ran.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_inside = self
            .get(parent)
            .ok_or(TreeError::StaleNode(parent))?
            .inside_tree;
        let existing = self.get(child).ok_or(TreeError::StaleNode(child))?.parent;
        if let Some(existing) = existing {
            return Err(TreeError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if parent == child || self.has_ancestor(parent, child) {
            return Err(TreeError::WouldCycle { parent, child });
        }

        if let Some(data) = self.get_mut(parent) {
            data.children.push(child);
        }
        if let Some(data) = self.get_mut(child) {
            data.parent = Some(parent);
        }

        if parent_inside {
            self.enter_tree(child)
        } else {
            Ok(())
        }
    }

    /// Detach `child` from `parent`. The subtree leaves the tree but lives on.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let data = self.get_mut(parent).ok_or(TreeError::StaleNode(parent))?;
        let position = data
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { parent, child })?;
        data.children.remove(position);

        let leaving: SmallVec<[NodeId; 16]> = self.descend_bf_inclusive(child).collect();
        for node in leaving {
            if let Some(data) = self.get_mut(node) {
                data.inside_tree = false;
            }
        }
        if let Some(data) = self.get_mut(child) {
            data.parent = None;
        }
        Ok(())
    }

    /// Mark the node for destruction at the next [`flush_deletions`](Self::flush_deletions).
    pub fn queue_free(&mut self, node: NodeId) -> Result<(), TreeError> {
        let data = self.get_mut(node).ok_or(TreeError::StaleNode(node))?;
        data.queued_for_deletion = true;
        Ok(())
    }

    /// Destroy every node queued for deletion. Returns how many nodes were
    /// destroyed, descendants included.
    pub fn flush_deletions(&mut self) -> usize {
        let queued: Vec<NodeId> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                let data = slot.node.as_ref()?;
                let index = u32::try_from(index).ok()?;
                data.queued_for_deletion
                    .then_some(NodeId::new(index, slot.generation))
            })
            .collect();

        queued
            .into_iter()
            .filter_map(|node| self.free(node).ok())
            .sum()
    }

    /// Destroy a node and its subtree now. Returns the number destroyed.
    pub fn free(&mut self, node: NodeId) -> Result<usize, TreeError> {
        let parent = self.get(node).ok_or(TreeError::StaleNode(node))?.parent;
        if let Some(parent) = parent {
            if let Some(data) = self.get_mut(parent) {
                data.children.retain(|c| *c != node);
            }
        }

        let doomed: FxHashSet<NodeId> = self.descend_df_inclusive(node).collect();
        for &id in &doomed {
            let slot = &mut self.slots[id.index()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_slots.push(id.slot());
        }
        self.connections
            .retain(|c| !doomed.contains(&c.emitter) && !doomed.contains(&c.target));

        tracing::trace!(%node, destroyed = doomed.len(), "free subtree");
        Ok(doomed.len())
    }

    /// Subscribe `hook` to the node-added event under `key`.
    ///
    /// Returns `false` without subscribing if `key` is already connected.
    pub fn connect_node_added(&mut self, key: &'static str, hook: Arc<dyn NodeAddedHook>) -> bool {
        if self.is_node_added_connected(key) {
            return false;
        }
        self.hooks.push((key, hook));
        true
    }

    pub fn is_node_added_connected(&self, key: &str) -> bool {
        self.hooks.iter().any(|(k, _)| *k == key)
    }

    pub fn disconnect_node_added(&mut self, key: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(k, _)| *k != key);
        self.hooks.len() != before
    }

    /// Fire `signal` from `emitter`. Returns the number of handlers invoked.
    pub fn emit(&mut self, emitter: NodeId, signal: &str) -> usize {
        let targets: SmallVec<[(NodeId, SignalHandler); 4]> = self
            .connections
            .iter()
            .filter(|c| c.emitter == emitter && c.signal == signal)
            .map(|c| (c.target, Arc::clone(&c.handler)))
            .collect();

        let mut invoked = 0;
        for (target, handler) in targets {
            if let Some(script) = self.script_mut(target) {
                handler(script, emitter);
                invoked += 1;
            }
        }
        invoked
    }

    /// Number of live signal connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn enter_tree(&mut self, top: NodeId) -> Result<(), TreeError> {
        let entering: Vec<NodeId> = self.descend_df_inclusive(top).collect();
        let hooks: SmallVec<[(&'static str, Arc<dyn NodeAddedHook>); 2]> = self
            .hooks
            .iter()
            .map(|(key, hook)| (*key, Arc::clone(hook)))
            .collect();

        let mut first_error = None;
        for node in entering {
            // An earlier hook may have freed this node
            match self.get_mut(node) {
                Some(data) => data.inside_tree = true,
                None => continue,
            }

            for (key, hook) in &hooks {
                if let Err(source) = hook.node_added(self, node) {
                    tracing::debug!(hook = key, %node, error = %source, "node-added hook failed");
                    if first_error.is_none() {
                        first_error = Some(TreeError::Hook {
                            hook: *key,
                            node,
                            source,
                        });
                    }
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn get(&self, node: NodeId) -> Option<&NodeData> {
        let slot = self.slots.get(node.index())?;
        if slot.generation != node.generation() {
            return None;
        }
        slot.node.as_ref()
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        let slot = self.slots.get_mut(node.index())?;
        if slot.generation != node.generation() {
            return None;
        }
        slot.node.as_mut()
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree for SceneTree {
    fn name(&self, node: NodeId) -> Option<&str> {
        self.get(node).map(|data| data.name.as_str())
    }

    fn class(&self, node: NodeId) -> Option<ClassId> {
        self.get(node).map(|data| data.class)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.get(node).map_or(0, |data| data.children.len())
    }

    fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.get(node)?.children.get(index).copied()
    }

    fn exists(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|data| !data.queued_for_deletion)
    }
}

impl ScriptHost for SceneTree {
    fn script(&self, node: NodeId) -> Option<&(dyn Script + 'static)> {
        self.get(node)?.script.as_deref()
    }

    fn script_mut(&mut self, node: NodeId) -> Option<&mut (dyn Script + 'static)> {
        self.get_mut(node)?.script.as_deref_mut()
    }
}

impl Signals for SceneTree {
    fn is_connected(&self, emitter: NodeId, signal: &str, target: NodeId, method: &str) -> bool {
        self.connections.iter().any(|c| {
            c.emitter == emitter && c.target == target && c.signal == signal && c.method == method
        })
    }

    fn connect(
        &mut self,
        emitter: NodeId,
        signal: &str,
        target: NodeId,
        method: &str,
        handler: SignalHandler,
    ) -> Result<(), TreeError> {
        for node in [emitter, target] {
            if self.get(node).is_none() {
                return Err(TreeError::StaleNode(node));
            }
        }
        self.connections.push(Connection {
            emitter,
            signal: signal.to_owned(),
            target,
            method: method.to_owned(),
            handler,
        });
        Ok(())
    }
}
