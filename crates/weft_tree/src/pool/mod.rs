//! Free lists of reusable containers.
//!
//! Traversals run on every node insertion, so their frontiers (a stack for
//! depth-first, a queue for breadth-first) come from a static [`Pool`] rather
//! than being allocated per traversal. [`Pool::acquire`] hands out a
//! [`Pooled`] guard; dropping the guard clears the container and returns it,
//! so every exit path releases exactly once and the pool never holds stale
//! contents.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

/// A container that can be emptied for reuse without freeing its capacity.
pub trait Reusable: Default + Send {
    fn reset(&mut self);
}

impl<T: Send> Reusable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Send> Reusable for VecDeque<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// A mutex-guarded free list.
pub struct Pool<C> {
    idle: Mutex<Vec<C>>,
}

impl<C: Reusable> Pool<C> {
    /// Idle containers kept beyond this are dropped on release.
    pub const MAX_IDLE: usize = 32;

    pub const fn new() -> Self {
        Pool {
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Take an idle container, or a fresh one if none are idle.
    pub fn acquire(&self) -> Pooled<'_, C> {
        let value = self.idle.lock().pop().unwrap_or_default();
        Pooled { pool: self, value }
    }

    /// Number of containers currently waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, mut value: C) {
        value.reset();
        let mut idle = self.idle.lock();
        if idle.len() < Self::MAX_IDLE {
            idle.push(value);
        }
    }
}

impl<C: Reusable> Default for Pool<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped loan of a pooled container.
pub struct Pooled<'p, C: Reusable> {
    pool: &'p Pool<C>,
    value: C,
}

impl<C: Reusable> Deref for Pooled<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.value
    }
}

impl<C: Reusable> DerefMut for Pooled<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.value
    }
}

impl<C: Reusable> Drop for Pooled<'_, C> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.value));
    }
}
