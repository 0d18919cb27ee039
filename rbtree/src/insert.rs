use core::mem;

use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::node::{Color, Membership, NodeId, NodePos, TreeId};

impl<T> Arena<T> {
    /// Links the orphan `node` as the left child of `parent`, or as the root
    /// of an empty tree when `parent` is `None`, then rebalances.
    ///
    /// # Errors
    ///
    /// Nothing is modified when any of these hold:
    /// * `node` is already linked ([`Error::AlreadyLinked`]),
    /// * `parent` is not on `tree` ([`Error::NotMember`]),
    /// * the left slot of `parent` is taken ([`Error::SlotOccupied`]),
    /// * `parent` is `None` but the tree has a root ([`Error::TreeNotEmpty`]).
    pub fn insert_left_or_root(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        tree: TreeId,
    ) -> Result<()> {
        self.link(node, parent, NodePos::Left, tree)?;
        self.insert_fixup(node, tree)
    }

    /// Mirror of [`insert_left_or_root`](Self::insert_left_or_root) for the
    /// right slot.
    pub fn insert_right_or_root(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        tree: TreeId,
    ) -> Result<()> {
        self.link(node, parent, NodePos::Right, tree)?;
        self.insert_fixup(node, tree)
    }

    /// Hangs a red leaf off `parent` without rebalancing.
    pub(crate) fn link(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        side: NodePos,
        tree: TreeId,
    ) -> Result<()> {
        self.check_tree(tree)?;
        self.check_orphan(node)?;

        let pos = match parent {
            None => {
                if self.root(tree).is_some() {
                    return Err(Error::TreeNotEmpty(tree));
                }
                NodePos::Root
            }
            Some(parent) => {
                self.check_member(parent, tree)?;
                let p = self.node(parent);
                let slot = match side {
                    NodePos::Right => p.right,
                    _ => p.left,
                };
                if slot.is_some() {
                    return Err(Error::SlotOccupied(parent));
                }
                side
            }
        };

        let n = self.node_mut(node);
        n.color = Color::Red;
        n.parent = parent;
        n.left = None;
        n.right = None;
        n.root = Membership::Tree(tree);
        n.error = false;
        self.set_child_at(parent, pos, tree, Some(node));
        Ok(())
    }

    fn insert_fixup(&mut self, new_node: NodeId, tree: TreeId) -> Result<()> {
        let mut node = new_node;
        loop {
            // red-black properties are violated only while a red node has a
            // red parent. There is at most one such pair at any time.
            let mut parent = match self.node(node).parent {
                Some(parent) if self.node(parent).color.is_red() => parent,
                _ => break,
            };
            debug_assert!(self.node(node).color.is_red());

            // a red parent is never the root, so the grand parent exists
            let Some(grand_parent) = self.node(parent).parent else {
                break;
            };
            debug_assert!(self.node(grand_parent).color.is_black());

            match self.pos(parent, tree)? {
                NodePos::Root => break,
                NodePos::Left => {
                    let uncle = self.node(grand_parent).right;
                    match uncle {
                        Some(uncle) if self.node(uncle).color.is_red() => {
                            //     +--- gp:b ---+               +--- gp:r ---+
                            //     |            |               |            |
                            //  + p:r +      + u:r +   -->   + p:b +      + u:b +
                            //  |     |      |     |         |     |      |     |
                            // n:r   a:b    b:b   c:b       n:r   a:b    b:b   c:b
                            //
                            // Black height is unchanged but gp may now have a red
                            // parent, so continue from gp.
                            self.set_color(parent, Color::Black);
                            self.set_color(uncle, Color::Black);
                            self.set_color(grand_parent, Color::Red);
                            node = grand_parent;
                        }
                        _ => {
                            if let NodePos::Right = self.pos(node, tree)? {
                                //       +-- gp:b --+                 +-- gp:b --+
                                //       |          |                 |          |
                                //  +-- p:r --+    u:b  -->       +- n:r --+    u:b
                                //  |         |                   |        |
                                // a:b    +- n:r -+           +- p:r -+   c:b
                                //        |       |           |       |
                                //       b:b     c:b         a:b     b:b
                                self.rotate_left_raw(parent, tree)?;
                                mem::swap(&mut parent, &mut node);
                            }

                            //           +-- gp:b --+            +----- p:b -----+
                            //           |          |            |               |
                            //      +-- p:r --+    u:b  -->   +- n:r -+     +- gp:r -+
                            //      |         |               |       |     |        |
                            //  +- n:r -+    c:b             a:b     b:b   c:b      u:b
                            //  |       |
                            // a:b     b:b
                            self.set_color(parent, Color::Black);
                            self.set_color(grand_parent, Color::Red);
                            self.rotate_right_raw(grand_parent, tree)?;
                        }
                    }
                }
                NodePos::Right => {
                    // same as Left branch but left/right are switched
                    let uncle = self.node(grand_parent).left;
                    match uncle {
                        Some(uncle) if self.node(uncle).color.is_red() => {
                            self.set_color(parent, Color::Black);
                            self.set_color(uncle, Color::Black);
                            self.set_color(grand_parent, Color::Red);
                            node = grand_parent;
                        }
                        _ => {
                            if let NodePos::Left = self.pos(node, tree)? {
                                self.rotate_right_raw(parent, tree)?;
                                mem::swap(&mut parent, &mut node);
                            }

                            self.set_color(parent, Color::Black);
                            self.set_color(grand_parent, Color::Red);
                            self.rotate_left_raw(grand_parent, tree)?;
                        }
                    }
                }
            }
        }

        if let Some(root) = self.root(tree) {
            self.set_color(root, Color::Black);
        }
        Ok(())
    }
}
