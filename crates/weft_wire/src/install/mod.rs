//! The install pass: find and write wired node references.
//!
//! For every target of a node's class the installer derives search
//! parameters from the member and its [`WireSpec`](crate::WireSpec):
//!
//! - **name**: none for `TYPE_ONLY`, else the explicit name, else the member name
//! - **class**: the member's declared value class
//! - **root**: the nearest node of class `from` walking up from the node
//!   (itself included), or the node itself
//! - **direction**: ancestors for `ANCESTOR`, else breadth-first descendants,
//!   the root excluded either way
//!
//! The first candidate matching class and name wins. A winner that is
//! pending destruction counts as not found. Required targets that are not
//! found go to the caller's [`FailureHandler`]; without one the pass stops
//! with [`WireError::Unresolved`]. Optional targets that are not found leave
//! the member as it was.
//!
//! Installing is not idempotent by guard: running it again repeats every
//! search and overwrites with the current results.

use std::ops::AddAssign;

use weft_tree::{ClassId, NodeId, ScriptHost, Search, Tree};

use crate::targets::{resolve, Target};
use crate::{UnwritablePolicy, WireError, WireFlags};

/// Receiver of install failures: the effective root the search ran from and
/// a description of what was missing.
pub trait FailureHandler {
    fn failed(&mut self, node: NodeId, message: &str);
}

impl<F: FnMut(NodeId, &str)> FailureHandler for F {
    fn failed(&mut self, node: NodeId, message: &str) {
        self(node, message);
    }
}

/// A [`FailureHandler`] that keeps every failure.
#[derive(Clone, Debug, Default)]
pub struct FailureLog {
    entries: Vec<(NodeId, String)>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(NodeId, String)] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, message)| message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FailureHandler for FailureLog {
    fn failed(&mut self, node: NodeId, message: &str) {
        self.entries.push((node, message.to_owned()));
    }
}

/// Outcome counts of an install pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Installed {
    /// Members written.
    pub wired: usize,
    /// Required targets not found (reported to a handler).
    pub unresolved: usize,
    /// Targets found but not written.
    pub unwritable: usize,
}

impl AddAssign for Installed {
    fn add_assign(&mut self, rhs: Self) {
        self.wired += rhs.wired;
        self.unresolved += rhs.unresolved;
        self.unwritable += rhs.unwritable;
    }
}

struct SearchParameters {
    name: Option<&'static str>,
    class: ClassId,
    ancestor: bool,
    optional: bool,
    from: Option<ClassId>,
}

impl SearchParameters {
    fn new(target: &Target) -> Self {
        let spec = target.spec();
        let name = if spec.has(WireFlags::TYPE_ONLY) {
            None
        } else {
            Some(spec.name().unwrap_or(target.member().name()))
        };

        SearchParameters {
            name,
            class: target.member().class(),
            ancestor: spec.has(WireFlags::ANCESTOR),
            optional: spec.has(WireFlags::OPTIONAL),
            from: spec.from_class(),
        }
    }

    fn direction(&self) -> &'static str {
        if self.ancestor {
            "ancestor"
        } else {
            "descendant"
        }
    }
}

/// Install `node` with the default [`UnwritablePolicy`].
pub fn install<T: ScriptHost + ?Sized>(
    tree: &mut T,
    node: NodeId,
    failures: Option<&mut dyn FailureHandler>,
) -> Result<Installed, WireError> {
    install_with(tree, node, failures, UnwritablePolicy::default())
}

/// Resolve and write every wired member of `node`.
pub fn install_with<T: ScriptHost + ?Sized>(
    tree: &mut T,
    node: NodeId,
    mut failures: Option<&mut dyn FailureHandler>,
    unwritable: UnwritablePolicy,
) -> Result<Installed, WireError> {
    let mut installed = Installed::default();
    let Some(class) = tree.class(node) else {
        return Ok(installed);
    };

    let resolved = resolve(class);
    for target in resolved.targets() {
        let member = target.member();
        let parameters = SearchParameters::new(target);
        let (root, found) = search(&*tree, node, &parameters);

        let Some(found) = found else {
            if parameters.optional {
                tracing::trace!(%node, member = member.name(), "optional target absent");
                continue;
            }

            let message = not_found_message(&*tree, root, &parameters);
            tracing::debug!(%node, member = member.name(), %message, "target unresolved");
            installed.unresolved += 1;
            match failures.as_deref_mut() {
                Some(handler) => handler.failed(root, &message),
                None => return Err(WireError::Unresolved { node: root, message }),
            }
            continue;
        };

        let written = tree
            .script_mut(node)
            .is_some_and(|script| member.set(script, found));
        if written {
            tracing::trace!(%node, member = member.name(), %found, "target wired");
            installed.wired += 1;
            continue;
        }

        installed.unwritable += 1;
        match unwritable {
            UnwritablePolicy::Skip => {
                tracing::debug!(%node, member = member.name(), "member not writable, skipped");
            }
            UnwritablePolicy::Warn => {
                tracing::warn!(%node, member = member.name(), "member not writable, skipped");
            }
            UnwritablePolicy::Error => {
                return Err(WireError::Unwritable {
                    node,
                    member: member.name(),
                });
            }
        }
    }

    Ok(installed)
}

/// Install `node` and then every descendant, breadth-first.
///
/// The set of nodes is fixed before the first install runs.
pub fn install_recursive<T: ScriptHost + ?Sized>(
    tree: &mut T,
    node: NodeId,
    mut failures: Option<&mut dyn FailureHandler>,
    unwritable: UnwritablePolicy,
) -> Result<Installed, WireError> {
    let nodes: Vec<NodeId> = tree.descend_bf_inclusive(node).collect();
    let mut total = Installed::default();
    for current in nodes {
        let handler = failures
            .as_mut()
            .map(|handler| &mut **handler as &mut dyn FailureHandler);
        total += install_with(tree, current, handler, unwritable)?;
    }
    Ok(total)
}

/// Returns the effective root and the winning candidate, if any.
fn search<T: Tree + ?Sized>(
    tree: &T,
    node: NodeId,
    parameters: &SearchParameters,
) -> (NodeId, Option<NodeId>) {
    let root = parameters
        .from
        .and_then(|from| tree.ascend_inclusive(node).at(from))
        .unwrap_or(node);

    let candidates = if parameters.ancestor {
        tree.ascend(root)
    } else {
        tree.descend(root)
    };
    let found = match parameters.name {
        Some(name) => candidates.at_named(parameters.class, name),
        None => candidates.at(parameters.class),
    };

    (root, found.filter(|&candidate| tree.exists(candidate)))
}

fn not_found_message<T: Tree + ?Sized>(
    tree: &T,
    root: NodeId,
    parameters: &SearchParameters,
) -> String {
    let root_name = tree.name(root).unwrap_or_default();
    let root_class = tree.class(root).map_or("?", ClassId::name);
    let with_name = parameters
        .name
        .map(|name| format!("with name [{name}] "))
        .unwrap_or_default();

    format!(
        "Node [{root_name}] of type [{root_class}] does not have any installed {} {with_name}of type [{}].",
        parameters.direction(),
        parameters.class,
    )
}
