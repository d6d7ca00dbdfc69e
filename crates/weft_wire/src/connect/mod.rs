//! The connect pass: bind declared handler methods to signals.

use std::sync::Arc;

use weft_tree::{NodeId, ScriptHost, Signals};

use crate::targets::resolve;
use crate::WireError;

/// Connect every declared handler of `node`'s class.
///
/// The emitter is `node` itself, or the node currently held in the member
/// named by the binding. Bindings whose emitter member is unknown, empty or
/// no longer exists are skipped, as are bindings already connected.
/// Returns the number of new connections.
pub fn connect<T: ScriptHost + Signals + ?Sized>(
    tree: &mut T,
    node: NodeId,
) -> Result<usize, WireError> {
    let Some(class) = tree.class(node) else {
        return Ok(0);
    };

    let resolved = resolve(class);
    let mut connected = 0;
    for handler in resolved.handlers() {
        let spec = handler.spec();
        let method = handler.method();

        let emitter = match spec.emitter_member() {
            None => Some(node),
            Some(name) => resolved
                .member(name)
                .zip(tree.script(node))
                .and_then(|(member, script)| member.get(script))
                .filter(|&emitter| tree.exists(emitter)),
        };
        let Some(emitter) = emitter else {
            tracing::trace!(%node, method = method.name(), signal = spec.signal(), "no emitter");
            continue;
        };

        if tree.is_connected(emitter, spec.signal(), node, method.name()) {
            continue;
        }

        tree.connect(
            emitter,
            spec.signal(),
            node,
            method.name(),
            Arc::clone(method.handler()),
        )
        .map_err(|source| WireError::Connect {
            node,
            signal: spec.signal(),
            source,
        })?;
        tracing::debug!(%node, %emitter, signal = spec.signal(), method = method.name(), "connected");
        connected += 1;
    }

    Ok(connected)
}

#[cfg(test)]
mod tests;
