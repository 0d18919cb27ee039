use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`].
    ///
    /// [`Red`]: Color::Red
    #[must_use]
    pub fn is_red(&self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` if the color is [`Black`].
    ///
    /// [`Black`]: Color::Black
    #[must_use]
    pub fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }
}

/// Stable handle of a node inside an [`Arena`](crate::Arena).
///
/// A handle stays valid until the node is freed. After that the slot may be
/// reused by a later `alloc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a root cell, which is the whole identity of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TreeId(pub(crate) usize);

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

/// Root back-reference of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    /// Not part of any tree.
    Orphan,
    /// Linked into the tree whose root cell is given.
    Tree(TreeId),
}

pub(crate) struct Node<T> {
    pub(crate) payload: T,
    pub(crate) color: Color,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) root: Membership,
    // raised when the links around this node were found to disagree
    pub(crate) error: bool,
}

impl<T> Node<T> {
    pub(crate) fn orphan(payload: T) -> Self {
        Self {
            payload,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            root: Membership::Orphan,
            error: false,
        }
    }

    /// Drops every structural link, keeping the payload.
    pub(crate) fn make_orphan(&mut self) {
        self.color = Color::Red;
        self.parent = None;
        self.left = None;
        self.right = None;
        self.root = Membership::Orphan;
        self.error = false;
    }

    #[inline]
    pub(crate) fn is_orphan(&self) -> bool {
        matches!(self.root, Membership::Orphan)
    }
}

impl<T> fmt::Debug for Node<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("payload", &self.payload)
            .field("color", &self.color)
            .field("parent", &self.parent)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("root", &self.root)
            .field("error", &self.error)
            .finish()
    }
}

/// Where a node hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodePos {
    Root,
    Left,
    Right,
}
