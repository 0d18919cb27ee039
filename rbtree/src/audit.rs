use core::fmt;

use crate::arena::Arena;
use crate::node::{Color, Membership, NodeId, TreeId};

/// First invariant violation found by [`Arena::audit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub node: NodeId,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A link points at a free slot.
    Dangling,
    /// The node's root back-reference names another tree, or none.
    WrongTree,
    /// The node's parent link does not match the node it hangs from.
    ParentMismatch,
    /// The node's error flag is raised.
    ErrorFlag,
    RedRoot,
    /// A red node with a red parent.
    RedRed,
    /// A nil below this node is reached through a different number of black
    /// nodes than the first nil seen.
    BlackHeight,
    /// The walk went deeper than the arena has nodes.
    Cycle,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at node {}", self.kind, self.node)
    }
}

impl<T> Arena<T> {
    /// Checks every node of `tree` against the red-black invariants and the
    /// link invariants, returning the first offender.
    ///
    /// This walks the whole tree, use it in tests and diagnostics only.
    /// An unknown `tree` has no nodes and passes.
    pub fn audit(&self, tree: TreeId) -> Result<(), Violation> {
        let Some(root) = self.root(tree) else {
            return Ok(());
        };

        let mut black_height = None;
        let result = self.audit_root(tree, root, &mut black_height);
        if let Err(violation) = &result {
            log::warn!("rbtree: audit of {tree} failed: {violation}");
        }
        result
    }

    fn audit_root(
        &self,
        tree: TreeId,
        root: NodeId,
        black_height: &mut Option<usize>,
    ) -> Result<(), Violation> {
        let Some(node) = self.nodes.get(root.0) else {
            return Err(Violation {
                node: root,
                kind: ViolationKind::Dangling,
            });
        };
        if node.color.is_red() {
            return Err(Violation {
                node: root,
                kind: ViolationKind::RedRoot,
            });
        }

        self.audit_node(tree, root, None, 0, 0, black_height)
    }

    fn audit_node(
        &self,
        tree: TreeId,
        id: NodeId,
        parent: Option<NodeId>,
        blacks_above: usize,
        depth: usize,
        black_height: &mut Option<usize>,
    ) -> Result<(), Violation> {
        let violation = |kind| Err(Violation { node: id, kind });

        let Some(node) = self.nodes.get(id.0) else {
            return violation(ViolationKind::Dangling);
        };
        if depth > self.nodes.len() {
            return violation(ViolationKind::Cycle);
        }
        if node.root != Membership::Tree(tree) {
            return violation(ViolationKind::WrongTree);
        }
        if node.parent != parent {
            return violation(ViolationKind::ParentMismatch);
        }
        if node.error {
            return violation(ViolationKind::ErrorFlag);
        }
        if node.color.is_red() && self.color_of(parent).is_red() {
            return violation(ViolationKind::RedRed);
        }

        let blacks = blacks_above + usize::from(node.color == Color::Black);
        for child in [node.left, node.right] {
            match child {
                Some(child) => {
                    self.audit_node(tree, child, Some(id), blacks, depth + 1, black_height)?
                }
                None => match *black_height {
                    None => *black_height = Some(blacks),
                    Some(expected) if expected != blacks => {
                        return violation(ViolationKind::BlackHeight)
                    }
                    Some(_) => {}
                },
            }
        }

        Ok(())
    }

    /// Number of nodes on the longest root to leaf path of `tree`.
    pub fn height(&self, tree: TreeId) -> usize {
        fn inner<T>(arena: &Arena<T>, node: Option<NodeId>) -> usize {
            match node {
                None => 0,
                Some(id) => {
                    let n = arena.node(id);
                    1 + inner(arena, n.left).max(inner(arena, n.right))
                }
            }
        }

        inner(self, self.root(tree))
    }
}
