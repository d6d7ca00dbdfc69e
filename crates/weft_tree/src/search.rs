//! Relationship queries available on every [`Tree`].

use crate::query::Nodes;
use crate::traverse::{Origin, Strategy, Traversal};
use crate::{ClassId, NodeId, Tree};

/// Sequence returned by the [`Search`] traversal entry points.
pub type Walk<'t, T> = Nodes<'t, T, Traversal<'t, T>>;

/// Traversal entry points and relationship checks for any [`Tree`].
///
/// The exclusive forms (`descend`, `ascend`) leave out the starting node;
/// the `_inclusive` forms yield it first. `descend` is breadth-first.
pub trait Search: Tree {
    fn traverse(&self, root: NodeId, strategy: Strategy, origin: Origin) -> Walk<'_, Self> {
        Nodes::new(self, Traversal::new(self, root, strategy, origin))
    }

    fn children(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Children, Origin::Exclusive)
    }

    fn descend(&self, node: NodeId) -> Walk<'_, Self> {
        self.descend_bf(node)
    }

    fn descend_bf(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Breadth, Origin::Exclusive)
    }

    fn descend_df(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Depth, Origin::Exclusive)
    }

    fn ascend(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Ascend, Origin::Exclusive)
    }

    fn descend_inclusive(&self, node: NodeId) -> Walk<'_, Self> {
        self.descend_bf_inclusive(node)
    }

    fn descend_bf_inclusive(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Breadth, Origin::Inclusive)
    }

    fn descend_df_inclusive(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Depth, Origin::Inclusive)
    }

    fn ascend_inclusive(&self, node: NodeId) -> Walk<'_, Self> {
        self.traverse(node, Strategy::Ascend, Origin::Inclusive)
    }

    fn has_ancestor(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ascend(node).any(|current| current == ancestor)
    }

    fn has_parent(&self, node: NodeId, parent: NodeId) -> bool {
        self.parent(node) == Some(parent)
    }

    fn has_child(&self, node: NodeId, child: NodeId) -> bool {
        self.parent(child) == Some(node)
    }

    fn has_descendant(&self, node: NodeId, descendant: NodeId) -> bool {
        self.has_ancestor(descendant, node)
    }

    /// Whether the node's runtime class is `class` or derives from it.
    fn is_instance(&self, node: NodeId, class: ClassId) -> bool {
        self.class(node).is_some_and(|own| own.is_a(class))
    }
}

impl<T: Tree + ?Sized> Search for T {}
