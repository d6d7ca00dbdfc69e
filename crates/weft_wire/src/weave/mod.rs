//! Install-then-connect, on demand or for every node entering a tree.

use std::sync::Arc;

use parking_lot::Mutex;
use weft_tree::{HookError, NodeAddedHook, NodeId, SceneTree, ScriptHost, Signals};

use crate::install::{install_with, FailureHandler, Installed};
use crate::{connect, WeaveConfig, WireError};

/// Outcome of one [`weave`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Woven {
    pub installed: Installed,
    pub connected: usize,
}

/// Install `node`, then connect its handlers when `config.signals` is set.
pub fn weave<T: ScriptHost + Signals + ?Sized>(
    tree: &mut T,
    node: NodeId,
    failures: Option<&mut dyn FailureHandler>,
    config: &WeaveConfig,
) -> Result<Woven, WireError> {
    let installed = install_with(tree, node, failures, config.unwritable)?;
    let connected = if config.signals {
        connect(tree, node)?
    } else {
        0
    };
    Ok(Woven {
        installed,
        connected,
    })
}

/// Failure handler shared between a [`Weaver`] and its owner.
pub type SharedFailures = Arc<Mutex<dyn FailureHandler + Send>>;

/// Node-added hook that weaves every node entering a [`SceneTree`].
///
/// Without a failure handler an unresolved target fails the hook, and the
/// error surfaces from the `add_child` that attached the node.
pub struct Weaver {
    config: WeaveConfig,
    failures: Option<SharedFailures>,
}

impl Weaver {
    /// Key the weaver subscribes under.
    pub const KEY: &'static str = "weft::weaver";

    pub fn new(config: WeaveConfig) -> Self {
        Weaver {
            config,
            failures: None,
        }
    }

    /// Report unresolved targets to `failures` instead of failing.
    #[must_use]
    pub fn reporting_to(mut self, failures: SharedFailures) -> Self {
        self.failures = Some(failures);
        self
    }

    pub fn config(&self) -> &WeaveConfig {
        &self.config
    }

    /// Subscribe to `tree`'s node-added event. Returns `false` if a weaver
    /// was already injected; the existing one stays.
    pub fn inject(self, tree: &mut SceneTree) -> bool {
        let injected = tree.connect_node_added(Self::KEY, Arc::new(self));
        if injected {
            tracing::debug!("weaver injected");
        }
        injected
    }
}

impl Default for Weaver {
    fn default() -> Self {
        Self::new(WeaveConfig::default())
    }
}

impl NodeAddedHook for Weaver {
    fn node_added(&self, tree: &mut SceneTree, node: NodeId) -> Result<(), HookError> {
        let mut guard = self.failures.as_ref().map(|failures| failures.lock());
        let failures = guard
            .as_deref_mut()
            .map(|handler| handler as &mut dyn FailureHandler);

        let woven = weave(tree, node, failures, &self.config)?;
        tracing::trace!(
            %node,
            wired = woven.installed.wired,
            connected = woven.connected,
            "node woven"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
