use core::cmp::Ordering;

use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::node::{NodeId, TreeId};

impl<T> Arena<T> {
    /// Descends from `start` looking for a node equal to `target`.
    ///
    /// `cmp(node, target)` must be a total order that stays the same for the
    /// whole life of the tree. The walk stops on the first equal node or on a
    /// nil child, and returns the last node visited together with the last
    /// comparison result:
    ///
    /// * `Ordering::Equal`: that node matches `target`,
    /// * `Ordering::Less`: the node is smaller, `target` belongs in its empty
    ///   right slot,
    /// * `Ordering::Greater`: `target` belongs in its empty left slot.
    ///
    /// `None` means there was nothing to search: `start` is `None`, or either
    /// handle does not exist.
    pub fn search<F>(
        &self,
        start: Option<NodeId>,
        target: NodeId,
        mut cmp: F,
    ) -> Option<(NodeId, Ordering)>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let target = self.get(target)?;
        self.search_by(start, |node| cmp(node, target))
    }

    /// Like [`search`](Self::search) but compares against an external key.
    ///
    /// `probe(node)` returns how the node's payload orders relative to the
    /// key being looked for.
    pub fn search_by<F>(&self, start: Option<NodeId>, mut probe: F) -> Option<(NodeId, Ordering)>
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut x = start.filter(|start| self.get(*start).is_some())?;
        loop {
            let node = self.node(x);
            let ord = probe(&node.payload);
            let next = match ord {
                Ordering::Less => node.right,
                Ordering::Equal => return Some((x, ord)),
                Ordering::Greater => node.left,
            };
            match next {
                Some(next) => x = next,
                None => return Some((x, ord)),
            }
        }
    }

    /// Links the orphan `target` into `tree` at the position `cmp` picks.
    ///
    /// If an equal node is already linked, `replace` decides: with `true` the
    /// old node is swapped out by [`replace`](Self::replace) and returned,
    /// orphaned; with `false` the call fails with [`Error::Duplicate`] and
    /// nothing changes. A fresh insertion returns `Ok(None)`.
    pub fn search_insert_or_replace<F>(
        &mut self,
        tree: TreeId,
        target: NodeId,
        cmp: F,
        replace: bool,
    ) -> Result<Option<NodeId>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.check_tree(tree)?;
        self.check_orphan(target)?;

        match self.search(self.root(tree), target, cmp) {
            None => {
                self.insert_left_or_root(target, None, tree)?;
                Ok(None)
            }
            Some((existing, Ordering::Equal)) => {
                if !replace {
                    return Err(Error::Duplicate(existing));
                }
                self.replace(existing, target)?;
                Ok(Some(existing))
            }
            Some((parent, Ordering::Less)) => {
                self.insert_right_or_root(target, Some(parent), tree)?;
                Ok(None)
            }
            Some((parent, Ordering::Greater)) => {
                self.insert_left_or_root(target, Some(parent), tree)?;
                Ok(None)
            }
        }
    }
}
