use core::iter::FusedIterator;

use crate::arena::Arena;
use crate::node::{NodeId, TreeId};

impl<T> Arena<T> {
    /// Smallest node of `tree`.
    pub fn first(&self, tree: TreeId) -> Option<NodeId> {
        self.root(tree).map(|root| self.min_of(root))
    }

    /// Largest node of `tree`.
    pub fn last(&self, tree: TreeId) -> Option<NodeId> {
        self.root(tree).map(|root| self.max_of(root))
    }

    /// In-order successor of `node`, found from the node's own links.
    ///
    /// `None` past the last node, or when `node` is not linked.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        if self.tree_of(node).is_none() {
            return None;
        }

        //       +---------- 34 ---------+
        //       |                       |
        // +---- 2 ----+                 58 ----+
        // |           |                        |
        // 1      +--- 9 ----+              +-- 77 --+
        //        |          |              |        |
        //     +- 6       +- 20 -+      +- 71 -+     82
        //     |          |      |      |      |
        //     5         12 -+   24    67      75
        //                   |
        //                   13

        match self.node(node).right {
            // 9 -> 12, 2 -> 5, 58 -> 67 ...
            // everything in the right subtree is larger than node but smaller
            // than any larger ancestor
            Some(right) => Some(self.min_of(right)),
            None => {
                // 6 -> 9, 1 -> 2, 13 -> 20, 24 -> 34 ...
                // climb until we leave a left subtree, that parent is next
                let mut node = node;
                let mut node_parent = self.node(node).parent;
                while let Some(parent) = node_parent {
                    if self.node(parent).left == Some(node) {
                        break;
                    }
                    node = parent;
                    node_parent = self.node(node).parent;
                }

                node_parent
            }
        }
    }

    /// In-order predecessor of `node`.
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        if self.tree_of(node).is_none() {
            return None;
        }

        match self.node(node).left {
            // 2 -> 1, 9 -> 6, 20 -> 13, 77 -> 75
            Some(left) => Some(self.max_of(left)),
            None => {
                // 12 -> 9, 58 -> 34, 67 -> 58
                let mut node = node;
                let mut node_parent = self.node(node).parent;
                while let Some(parent) = node_parent {
                    if self.node(parent).right == Some(node) {
                        break;
                    }
                    node = parent;
                    node_parent = self.node(node).parent;
                }

                node_parent
            }
        }
    }

    /// Walks `tree` in order, yielding handles and payloads.
    pub fn iter(&self, tree: TreeId) -> Iter<'_, T> {
        Iter {
            arena: self,
            next: self.first(tree),
        }
    }
}

/// In-order iterator over one tree of an [`Arena`].
///
/// Created by [`Arena::iter`].
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    next: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        let current = self.next?;
        self.next = arena.next(current);
        Some((current, &arena[current]))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}
