//! weft tree: scene model, traversal and queries.
//!
//! This crate is the part of weft that knows about tree shape:
//! - `NodeId` / `ClassId` identify nodes and their runtime classes
//! - `Tree`, `ScriptHost`, `Signals` are the host interface
//! - `SceneTree` is an arena-backed host implementing all of them
//! - `Traversal` walks children, breadth-first, depth-first or ancestors
//!   with pooled frontiers
//! - `Nodes` / `Every` / `Filter` compose lazy class, name and predicate
//!   queries over any traversal
//!
//! # Design Philosophy
//!
//! - **Ids, not pointers**: nodes are generational indices, so a stale
//!   reference is detectable instead of dangling.
//! - **Lazy all the way down**: a first-match query visits nodes only until
//!   the match; chained filters stack adapters, never collections.
//! - **No allocation per traversal**: frontiers come from static pools.

mod class;
mod error;
mod host;
mod id;
pub mod pool;
pub mod query;
mod scene;
mod script;
mod search;
pub mod traverse;

pub use class::{ClassError, ClassId, Inheritance};
pub use error::{HookError, TreeError};
pub use host::{ScriptHost, SignalHandler, Signals, Tree};
pub use id::NodeId;
pub use query::{Every, Filter, Nodes};
pub use scene::{NodeAddedHook, SceneTree};
pub use script::Script;
pub use search::{Search, Walk};
pub use traverse::{Origin, Restart, Strategy, Traversal};
