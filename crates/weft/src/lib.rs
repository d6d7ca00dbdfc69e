//! weft: scene tree queries and declarative node wiring.
//!
//! Re-exports [`weft_tree`] (node model, traversal, queries) and
//! [`weft_wire`] (wiring declarations and passes) under one crate.
//!
//! ```text
//! let mut tree = SceneTree::new();
//! Weaver::new(WeaveConfig::from_env()).inject(&mut tree);
//! tree.add_child(tree.root(), hud)?; // hud and its subtree are wired here
//! ```

use std::sync::Once;

pub use weft_tree::{
    impl_script, ClassError, ClassId, Every, Filter, HookError, Inheritance, NodeAddedHook,
    NodeId, Nodes, Origin, Restart, SceneTree, Script, ScriptHost, Search, SignalHandler, Signals,
    Strategy, Traversal, Tree, TreeError, Walk,
};
pub use weft_wire::{
    clear_caches, connect, install, install_recursive, install_with, resolve, slot, weave,
    Access, ConnectSpec, Declaration, DeclarationBuilder, DeclareError, DeclaredHandler,
    DeclaredMember, FailureHandler, FailureLog, Installed, Member, MemberKind, Method, Resolved,
    SharedFailures, Slot, Target, UnwritablePolicy, WeaveConfig, Weaver, WireError, WireFlags,
    WireSpec, Woven,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=weft_wire=debug` or `RUST_LOG=weft_tree=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
