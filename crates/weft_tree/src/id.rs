//! Node identifiers.
//!
//! A `NodeId` is an index into the host arena plus the generation of the slot
//! at the time the node was created. Freeing a node advances the slot
//! generation, so stale ids stop resolving instead of aliasing a new node.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Generational index of a node in a scene tree.
///
/// Equality is identity: two ids are equal iff they name the same slot
/// in the same generation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        NodeId { index, generation }
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Get the raw slot index.
    #[inline]
    pub const fn slot(self) -> u32 {
        self.index
    }

    /// Get the slot generation this id was issued for.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Hash for NodeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        ((u64::from(self.generation) << 32) | u64::from(self.index)).hash(state);
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}
