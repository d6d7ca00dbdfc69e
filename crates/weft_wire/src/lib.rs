//! weft wire: declarative node-reference wiring.
//!
//! Scripts declare which of their members hold references to related nodes
//! and how to find them; the wiring passes fill those members in when a node
//! enters the tree.
//!
//! - `spec`: `WireSpec` / `WireFlags` / `ConnectSpec`
//! - `member`: type-erased member descriptors and connectable methods
//! - `declare`: the per-class declaration registry
//! - `targets`: per-class discovery across the inheritance chain, cached
//! - `install`: the search-and-write pass
//! - `connect`: the signal connection pass
//! - `weave`: both passes, directly or as a node-added hook
//!
//! # Pipeline
//!
//! ```text
//! node ─▶ class ─▶ targets::resolve ─▶ search parameters
//!                                          │
//!                  Member::set ◀── first match (weft_tree query)
//! ```

mod config;
mod connect;
mod declare;
mod error;
mod install;
mod member;
mod spec;
mod targets;
mod weave;

pub use config::{UnwritablePolicy, WeaveConfig};
pub use connect::connect;
pub use declare::{Declaration, DeclarationBuilder, DeclaredHandler, DeclaredMember};
pub use error::{DeclareError, WireError};
pub use install::{
    install, install_recursive, install_with, FailureHandler, FailureLog, Installed,
};
pub use member::{Access, Member, MemberKind, Method, Slot};
pub use spec::{ConnectSpec, WireFlags, WireSpec};
pub use targets::{clear_caches, resolve, Resolved, Target};
pub use weave::{weave, SharedFailures, Weaver, Woven};
