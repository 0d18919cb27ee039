use core::fmt;
use core::ops::{Index, IndexMut};

use slab::Slab;

use crate::error::{Error, Result};
use crate::node::{Color, Membership, Node, NodeId, NodePos, TreeId};

/// Caller-owned storage for tree nodes and the root cells of any number of
/// trees.
///
/// The arena is the only place nodes are created or destroyed. Tree
/// operations only rewire links between nodes that already exist, so a node
/// keeps its [`NodeId`] for as long as the caller keeps it allocated, whether
/// it is linked or not.
///
/// Nothing here is synchronized. Sharing one arena between threads needs an
/// outer lock held across every call.
pub struct Arena<T> {
    pub(crate) nodes: Slab<Node<T>>,
    // one cell per tree, holding that tree's current root
    pub(crate) roots: Slab<Option<NodeId>>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            nodes: Slab::new(),
            roots: Slab::new(),
        }
    }

    /// Creates an arena with room for `nodes` nodes before it reallocates.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes: Slab::with_capacity(nodes),
            roots: Slab::new(),
        }
    }

    /// Number of allocated nodes, linked or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Stores `payload` in a new orphaned node.
    pub fn alloc(&mut self, payload: T) -> NodeId {
        NodeId(self.nodes.insert(Node::orphan(payload)))
    }

    /// Releases an orphaned node and hands its payload back.
    ///
    /// Linked nodes must be removed from their tree first.
    pub fn free(&mut self, node: NodeId) -> Result<T> {
        match self.nodes.get(node.0) {
            None => Err(Error::NoSuchNode(node)),
            Some(n) if !n.is_orphan() => Err(Error::AlreadyLinked(node)),
            Some(_) => Ok(self.nodes.remove(node.0).payload),
        }
    }

    /// Creates a new, empty tree.
    pub fn new_tree(&mut self) -> TreeId {
        TreeId(self.roots.insert(None))
    }

    /// Forgets an empty tree.
    pub fn release_tree(&mut self, tree: TreeId) -> Result<()> {
        match self.roots.get(tree.0) {
            None => Err(Error::NoSuchTree(tree)),
            Some(Some(_)) => Err(Error::TreeNotEmpty(tree)),
            Some(None) => {
                self.roots.remove(tree.0);
                Ok(())
            }
        }
    }

    /// Current root of `tree`, `None` if the tree is empty or unknown.
    #[inline]
    pub fn root(&self, tree: TreeId) -> Option<NodeId> {
        self.roots.get(tree.0).copied().flatten()
    }

    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node.0).map(|n| &n.payload)
    }

    /// Mutable access to a payload.
    ///
    /// Changing the part of a linked payload that its tree is ordered by
    /// silently breaks that tree's ordering.
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(node.0).map(|n| &mut n.payload)
    }

    pub fn color(&self, node: NodeId) -> Option<Color> {
        self.nodes.get(node.0).map(|n| n.color)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.left)
    }

    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.right)
    }

    pub fn membership(&self, node: NodeId) -> Option<Membership> {
        self.nodes.get(node.0).map(|n| n.root)
    }

    /// `true` for an allocated node that is not on any tree.
    pub fn is_orphan(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.is_orphan())
    }

    /// The tree `node` is linked into.
    pub fn tree_of(&self, node: NodeId) -> Option<TreeId> {
        match self.membership(node)? {
            Membership::Orphan => None,
            Membership::Tree(tree) => Some(tree),
        }
    }

    /// Root of the tree `node` is linked into, found through its root cell.
    pub fn root_of(&self, node: NodeId) -> Option<NodeId> {
        self.tree_of(node).and_then(|tree| self.root(tree))
    }

    /// Whether an inconsistency was detected around `node`.
    pub fn has_error(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.error)
    }

    pub fn clear_error(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.error = false;
        }
    }

    /// Dumps every field of `node` at debug level.
    pub fn log_node(&self, node: NodeId)
    where
        T: fmt::Debug,
    {
        match self.nodes.get(node.0) {
            Some(n) => log::debug!("rbtree node {node}: {n:?}"),
            None => log::debug!("rbtree node {node}: <free>"),
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// Color of a possibly nil link. Nil is black.
    #[inline]
    pub(crate) fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self.node(id).color)
    }

    #[inline]
    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    #[inline]
    pub(crate) fn root_cell_mut(&mut self, tree: TreeId) -> &mut Option<NodeId> {
        &mut self.roots[tree.0]
    }

    pub(crate) fn check_tree(&self, tree: TreeId) -> Result<()> {
        if self.roots.contains(tree.0) {
            Ok(())
        } else {
            Err(Error::NoSuchTree(tree))
        }
    }

    /// Tree of a node that must be linked.
    pub(crate) fn linked_tree(&self, node: NodeId) -> Result<TreeId> {
        match self.membership(node) {
            None => Err(Error::NoSuchNode(node)),
            Some(Membership::Orphan) => Err(Error::NotLinked(node)),
            Some(Membership::Tree(tree)) => Ok(tree),
        }
    }

    pub(crate) fn check_member(&self, node: NodeId, tree: TreeId) -> Result<()> {
        self.check_tree(tree)?;
        match self.membership(node) {
            None => Err(Error::NoSuchNode(node)),
            Some(Membership::Tree(t)) if t == tree => Ok(()),
            Some(_) => Err(Error::NotMember(node, tree)),
        }
    }

    pub(crate) fn check_orphan(&self, node: NodeId) -> Result<()> {
        match self.nodes.get(node.0) {
            None => Err(Error::NoSuchNode(node)),
            Some(n) if !n.is_orphan() => Err(Error::AlreadyLinked(node)),
            Some(_) => Ok(()),
        }
    }

    /// Raises the error flag of `id` and builds the matching error.
    pub(crate) fn corrupted(&mut self, id: NodeId) -> Error {
        log::error!("rbtree: inconsistent links around node {id}");
        if let Some(n) = self.nodes.get_mut(id.0) {
            n.error = true;
        }
        Error::Corrupted(id)
    }

    /// Finds where `id` hangs, checking that the parent (or the root cell)
    /// really points back at it.
    pub(crate) fn pos(&mut self, id: NodeId, tree: TreeId) -> Result<NodePos> {
        let parent = self.node(id).parent;
        match parent {
            None if self.roots[tree.0] == Some(id) => Ok(NodePos::Root),
            None => Err(self.corrupted(id)),
            Some(parent) => {
                let parent = self.node(parent);
                if parent.left == Some(id) {
                    Ok(NodePos::Left)
                } else if parent.right == Some(id) {
                    Ok(NodePos::Right)
                } else {
                    Err(self.corrupted(id))
                }
            }
        }
    }

    /// Puts `child` in the slot described by `parent` and `pos`.
    pub(crate) fn set_child_at(
        &mut self,
        parent: Option<NodeId>,
        pos: NodePos,
        tree: TreeId,
        child: Option<NodeId>,
    ) {
        match (pos, parent) {
            (NodePos::Root, _) => *self.root_cell_mut(tree) = child,
            (NodePos::Left, Some(parent)) => self.node_mut(parent).left = child,
            (NodePos::Right, Some(parent)) => self.node_mut(parent).right = child,
            (_, None) => debug_assert!(false, "child position without a parent"),
        }
    }

    pub(crate) fn min_of(&self, root: NodeId) -> NodeId {
        let mut x = root;
        while let Some(left) = self.node(x).left {
            x = left;
        }

        x
    }

    pub(crate) fn max_of(&self, root: NodeId) -> NodeId {
        let mut x = root;
        while let Some(right) = self.node(x).right {
            x = right;
        }

        x
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.0].payload
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.nodes[index.0].payload
    }
}

impl<T> fmt::Debug for Arena<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct TreeDebug<'a, T> {
            arena: &'a Arena<T>,
            tree: TreeId,
        }

        impl<T> fmt::Debug for TreeDebug<'_, T>
        where
            T: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list()
                    .entries(self.arena.iter(self.tree).map(|(_, payload)| payload))
                    .finish()
            }
        }

        let mut f = f.debug_struct("Arena");
        f.field("nodes", &self.nodes.len());
        for (tree, _) in &self.roots {
            let tree = TreeId(tree);
            f.field(
                "tree",
                &(
                    tree,
                    TreeDebug {
                        arena: self,
                        tree,
                    },
                ),
            );
        }

        f.finish()
    }
}
