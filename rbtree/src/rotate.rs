use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::node::{NodeId, TreeId};

impl<T> Arena<T> {
    /// Promotes the right child of `node` into `node`'s place.
    ///
    /// The in-order sequence of the subtree does not change. Colors are left
    /// alone, recoloring is up to the caller.
    pub fn rotate_left(&mut self, node: NodeId, tree: TreeId) -> Result<()> {
        self.check_member(node, tree)?;
        self.rotate_left_raw(node, tree)
    }

    /// Promotes the left child of `node` into `node`'s place.
    pub fn rotate_right(&mut self, node: NodeId, tree: TreeId) -> Result<()> {
        self.check_member(node, tree)?;
        self.rotate_right_raw(node, tree)
    }

    pub(crate) fn rotate_left_raw(&mut self, node: NodeId, tree: TreeId) -> Result<()> {
        //    p                       p
        //    |                       |
        // +-node-+               +-right-+
        // |      |      -->      |       |
        // a  +-right-+       +-node-+    c
        //    |       |       |      |
        //    b       c       a      b
        // where a, b, c can be any subtrees
        let right = self.node(node).right.ok_or(Error::MissingChild(node))?;
        let pos = self.pos(node, tree)?;
        log::trace!("rbtree: rotate left at {node}");

        // attach b to node
        let b = self.node(right).left;
        self.node_mut(node).right = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(node);
        }

        // attach right to parent
        let parent = self.node(node).parent;
        self.node_mut(right).parent = parent;
        self.set_child_at(parent, pos, tree, Some(right));

        // attach node to right
        self.node_mut(right).left = Some(node);
        self.node_mut(node).parent = Some(right);
        Ok(())
    }

    pub(crate) fn rotate_right_raw(&mut self, node: NodeId, tree: TreeId) -> Result<()> {
        //         p              p
        //         |              |
        //     +-node-+       +-left-+
        //     |      |       |      |
        // +-left-+   c  -->  a  +-node-+
        // |      |              |      |
        // a      b              b      c
        let left = self.node(node).left.ok_or(Error::MissingChild(node))?;
        let pos = self.pos(node, tree)?;
        log::trace!("rbtree: rotate right at {node}");

        let b = self.node(left).right;
        self.node_mut(node).left = b;
        if let Some(b) = b {
            self.node_mut(b).parent = Some(node);
        }

        let parent = self.node(node).parent;
        self.node_mut(left).parent = parent;
        self.set_child_at(parent, pos, tree, Some(left));

        self.node_mut(left).right = Some(node);
        self.node_mut(node).parent = Some(left);
        Ok(())
    }
}
