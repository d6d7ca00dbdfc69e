//! Filtered views over node sequences.
//!
//! [`Nodes`] pairs a tree with any node iterator. `every*` wraps the sequence
//! in one more [`Every`] adapter and returns a new `Nodes`, so a chain such as
//!
//! ```text
//! tree.descend(root).every(ENEMY).every_named(BOSS, "Warden")
//! ```
//!
//! is two adapters around one traversal and never builds an intermediate
//! collection. `at*` returns the first match and stops the traversal there.

use std::iter::FusedIterator;

use crate::traverse::Restart;
use crate::{ClassId, NodeId, Tree};

/// Predicate type used when a filter has no predicate.
pub type NoPredicate = fn(NodeId) -> bool;

/// Class, name and predicate constraints on a node.
///
/// A node matches iff its class is `class` or derives from it, its name
/// equals `name` when one is set, and `predicate` accepts it when one is set.
/// The predicate only runs on nodes that pass the class and name checks.
#[derive(Clone, Debug)]
pub struct Filter<'q, P = NoPredicate> {
    class: ClassId,
    name: Option<&'q str>,
    predicate: Option<P>,
}

impl<'q> Filter<'q> {
    /// Match any node of `class`.
    pub fn class(class: ClassId) -> Self {
        Filter {
            class,
            name: None,
            predicate: None,
        }
    }

    /// Match nodes of `class` named `name`.
    pub fn named(class: ClassId, name: &'q str) -> Self {
        Filter {
            class,
            name: Some(name),
            predicate: None,
        }
    }
}

impl<'q, P: FnMut(NodeId) -> bool> Filter<'q, P> {
    /// Match nodes of `class` accepted by `predicate`.
    pub fn with_predicate(class: ClassId, predicate: P) -> Self {
        Filter {
            class,
            name: None,
            predicate: Some(predicate),
        }
    }

    /// Add or replace the name constraint.
    #[must_use]
    pub fn and_name(mut self, name: Option<&'q str>) -> Self {
        self.name = name;
        self
    }

    pub fn class_constraint(&self) -> ClassId {
        self.class
    }

    pub fn name_constraint(&self) -> Option<&'q str> {
        self.name
    }

    pub fn matches<T: Tree + ?Sized>(&mut self, tree: &T, node: NodeId) -> bool {
        if !tree.class(node).is_some_and(|class| class.is_a(self.class)) {
            return false;
        }
        if let Some(name) = self.name {
            if tree.name(node) != Some(name) {
                return false;
            }
        }
        match self.predicate.as_mut() {
            Some(predicate) => predicate(node),
            None => true,
        }
    }
}

/// Adapter yielding the nodes of `inner` that pass a [`Filter`].
pub struct Every<'t, 'q, T: ?Sized, I, P> {
    tree: &'t T,
    inner: I,
    filter: Filter<'q, P>,
}

impl<T, I, P> Iterator for Every<'_, '_, T, I, P>
where
    T: Tree + ?Sized,
    I: Iterator<Item = NodeId>,
    P: FnMut(NodeId) -> bool,
{
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let tree = self.tree;
        let filter = &mut self.filter;
        self.inner.find(|&node| filter.matches(tree, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<T, I, P> FusedIterator for Every<'_, '_, T, I, P>
where
    T: Tree + ?Sized,
    I: FusedIterator<Item = NodeId>,
    P: FnMut(NodeId) -> bool,
{
}

impl<T: ?Sized, I: Restart, P> Restart for Every<'_, '_, T, I, P> {
    fn restart(&mut self) {
        self.inner.restart();
    }
}

/// A node sequence bound to the tree it walks.
pub struct Nodes<'t, T: ?Sized, I> {
    tree: &'t T,
    iter: I,
}

impl<'t, T, I> Nodes<'t, T, I>
where
    T: Tree + ?Sized,
    I: Iterator<Item = NodeId>,
{
    pub fn new(tree: &'t T, iter: I) -> Self {
        Nodes { tree, iter }
    }

    #[inline]
    pub fn tree(&self) -> &'t T {
        self.tree
    }

    /// Every node of `class`.
    pub fn every(self, class: ClassId) -> Nodes<'t, T, Every<'t, 'static, T, I, NoPredicate>> {
        self.every_matching(Filter::class(class))
    }

    /// Every node of `class` named `name`.
    pub fn every_named<'q>(
        self,
        class: ClassId,
        name: &'q str,
    ) -> Nodes<'t, T, Every<'t, 'q, T, I, NoPredicate>> {
        self.every_matching(Filter::named(class, name))
    }

    /// Every node of `class` accepted by `predicate`.
    pub fn every_where<P>(
        self,
        class: ClassId,
        predicate: P,
    ) -> Nodes<'t, T, Every<'t, 'static, T, I, P>>
    where
        P: FnMut(NodeId) -> bool,
    {
        self.every_matching(Filter::with_predicate(class, predicate))
    }

    /// Every node passing `filter`.
    pub fn every_matching<'q, P>(self, filter: Filter<'q, P>) -> Nodes<'t, T, Every<'t, 'q, T, I, P>>
    where
        P: FnMut(NodeId) -> bool,
    {
        let tree = self.tree;
        Nodes {
            tree,
            iter: Every {
                tree,
                inner: self.iter,
                filter,
            },
        }
    }

    /// First node of `class`.
    pub fn at(self, class: ClassId) -> Option<NodeId> {
        self.at_matching(Filter::class(class))
    }

    /// First node of `class` named `name`.
    pub fn at_named(self, class: ClassId, name: &str) -> Option<NodeId> {
        self.at_matching(Filter::named(class, name))
    }

    /// First node of `class` accepted by `predicate`.
    pub fn at_where<P>(self, class: ClassId, predicate: P) -> Option<NodeId>
    where
        P: FnMut(NodeId) -> bool,
    {
        self.at_matching(Filter::with_predicate(class, predicate))
    }

    /// First node passing `filter`. Stops walking at the match.
    pub fn at_matching<P>(self, filter: Filter<'_, P>) -> Option<NodeId>
    where
        P: FnMut(NodeId) -> bool,
    {
        self.every_matching(filter).next()
    }
}

impl<T, I> Iterator for Nodes<'_, T, I>
where
    T: ?Sized,
    I: Iterator<Item = NodeId>,
{
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<NodeId> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T: ?Sized, I: FusedIterator<Item = NodeId>> FusedIterator for Nodes<'_, T, I> {}

impl<T: ?Sized, I: Restart> Restart for Nodes<'_, T, I> {
    fn restart(&mut self) {
        self.iter.restart();
    }
}
