//! Lazy, restartable node traversals.
//!
//! A [`Traversal`] yields the nodes reachable from a root under one
//! [`Strategy`]:
//!
//! - `Children`: direct children in child order.
//! - `Breadth`: breadth-first descent, children enqueued in child order.
//! - `Depth`: depth-first pre-order, children pushed in reverse so they pop
//!   in child order.
//! - `Ascend`: the parent chain up to the first absent parent.
//!
//! [`Origin`] decides whether the root itself is yielded. Exclusive descent
//! seeds the frontier with the root's children; exclusive ascent starts at
//! the parent.
//!
//! Frontiers are borrowed from static pools and go back when the traversal
//! drops. The tree is assumed acyclic; a cycle makes descent unbounded.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::pool::{Pool, Pooled};
use crate::{NodeId, Tree};

static STACKS: Pool<Vec<NodeId>> = Pool::new();
static QUEUES: Pool<VecDeque<NodeId>> = Pool::new();

/// Order in which a traversal visits nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    Children,
    Breadth,
    Depth,
    Ascend,
}

/// Whether the traversal root is part of the sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Inclusive,
    Exclusive,
}

/// A sequence that can be rewound to its first element.
pub trait Restart {
    /// Reset all traversal state so iteration starts over from the root.
    fn restart(&mut self);
}

enum Frontier {
    Children { next: usize },
    Queue(Pooled<'static, VecDeque<NodeId>>),
    Stack(Pooled<'static, Vec<NodeId>>),
    Ascend { next: Option<NodeId> },
}

/// Iterator over the nodes reachable from a root.
pub struct Traversal<'t, T: ?Sized> {
    tree: &'t T,
    root: NodeId,
    strategy: Strategy,
    origin: Origin,
    frontier: Frontier,
}

impl<'t, T: Tree + ?Sized> Traversal<'t, T> {
    pub fn new(tree: &'t T, root: NodeId, strategy: Strategy, origin: Origin) -> Self {
        let frontier = match strategy {
            Strategy::Children => Frontier::Children { next: 0 },
            Strategy::Breadth => Frontier::Queue(QUEUES.acquire()),
            Strategy::Depth => Frontier::Stack(STACKS.acquire()),
            Strategy::Ascend => Frontier::Ascend { next: None },
        };

        let mut traversal = Traversal {
            tree,
            root,
            strategy,
            origin,
            frontier,
        };
        traversal.seed();
        traversal
    }

    #[inline]
    pub fn tree(&self) -> &'t T {
        self.tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    fn seed(&mut self) {
        let tree = self.tree;
        let root = self.root;
        let inclusive = self.origin == Origin::Inclusive;

        match &mut self.frontier {
            Frontier::Children { next } => *next = 0,
            Frontier::Queue(queue) => {
                queue.clear();
                if inclusive {
                    queue.push_back(root);
                } else {
                    enqueue_children(tree, root, queue);
                }
            }
            Frontier::Stack(stack) => {
                stack.clear();
                if inclusive {
                    stack.push(root);
                } else {
                    push_children(tree, root, stack);
                }
            }
            Frontier::Ascend { next } => {
                *next = if inclusive {
                    Some(root)
                } else {
                    tree.parent(root)
                };
            }
        }
    }
}

fn enqueue_children<T: Tree + ?Sized>(tree: &T, node: NodeId, queue: &mut VecDeque<NodeId>) {
    let count = tree.child_count(node);
    queue.extend((0..count).filter_map(|i| tree.child(node, i)));
}

fn push_children<T: Tree + ?Sized>(tree: &T, node: NodeId, stack: &mut Vec<NodeId>) {
    let count = tree.child_count(node);
    stack.extend((0..count).rev().filter_map(|i| tree.child(node, i)));
}

impl<T: Tree + ?Sized> Iterator for Traversal<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let tree = self.tree;
        match &mut self.frontier {
            Frontier::Children { next } => {
                let child = tree.child(self.root, *next)?;
                *next += 1;
                Some(child)
            }
            Frontier::Queue(queue) => {
                let node = queue.pop_front()?;
                enqueue_children(tree, node, queue);
                Some(node)
            }
            Frontier::Stack(stack) => {
                let node = stack.pop()?;
                push_children(tree, node, stack);
                Some(node)
            }
            Frontier::Ascend { next } => {
                let node = (*next)?;
                // A node that is its own parent ends the walk after one step
                *next = tree.parent(node).filter(|&parent| parent != node);
                Some(node)
            }
        }
    }
}

impl<T: Tree + ?Sized> FusedIterator for Traversal<'_, T> {}

impl<T: Tree + ?Sized> Restart for Traversal<'_, T> {
    fn restart(&mut self) {
        self.seed();
    }
}
