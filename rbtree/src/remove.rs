use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::node::{Color, NodeId, TreeId};

impl<T> Arena<T> {
    /// Unlinks `node` from its tree and rebalances. The node comes back
    /// orphaned with its payload untouched.
    ///
    /// When `node` has two children its in-order successor is moved into its
    /// place, links and color included. Handles to every other node keep
    /// pointing at the same payloads.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let tree = self.linked_tree(node)?;

        //       ┌────────── 34 ─────────┐
        //       │                       │
        // ┌──── 2 ────┐                 58 ────┐
        // │           │                        │
        // 1      ┌─── 9 ────┐              ┌── 77 ──┐
        //        │          │              │        │
        //     ┌─ 6       ┌─ 20 ─┐      ┌─ 71 ─┐     82
        //     │          │      │      │      │
        //     5         12 ─┐   24    67      75
        //                   │
        //                   13

        let (left, right) = {
            let n = self.node(node);
            (n.left, n.right)
        };
        let mut removed_color = self.node(node).color;
        // `x` takes the place of whatever was spliced out, `x_parent` is where
        // it hangs. `x` may be nil, which is why its parent is tracked apart.
        let x;
        let x_parent;
        match (left, right) {
            (None, child) | (child, None) => {
                // no children or only one, e.g. 1, 6, 12 or 58 above:
                // the child (or nil) takes the place of `node`
                x = child;
                x_parent = self.node(node).parent;
                self.transplant(node, child, tree)?;
            }
            (Some(left), Some(right)) => {
                // 9, 20, 34 above: the successor is the minimum of the right
                // subtree and it has no left child, so it can be lifted out
                // cheaply and put in place of `node`
                let successor = self.min_of(right);
                removed_color = self.node(successor).color;
                x = self.node(successor).right;

                if successor == right {
                    // e.g. 20 -> 24, the successor keeps its right subtree
                    x_parent = Some(successor);
                } else {
                    // e.g. 9 -> 12, 13 moves up into the successor's place first
                    x_parent = self.node(successor).parent;
                    self.transplant(successor, x, tree)?;
                    self.node_mut(successor).right = Some(right);
                    self.node_mut(right).parent = Some(successor);
                }

                self.transplant(node, Some(successor), tree)?;
                self.node_mut(successor).left = Some(left);
                self.node_mut(left).parent = Some(successor);
                let color = self.node(node).color;
                self.set_color(successor, color);
            }
        }

        if removed_color.is_black() {
            self.remove_fixup(x, x_parent, tree)?;
        }

        self.node_mut(node).make_orphan();
        Ok(())
    }

    /// Puts the orphan `new` exactly where `old` is and orphans `old`.
    ///
    /// The shape of the tree does not change, so no rebalancing is needed.
    /// The caller is responsible for `new` ordering the same as `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let tree = self.linked_tree(old)?;
        self.check_orphan(new)?;
        let pos = self.pos(old, tree)?;

        let (color, parent, left, right) = {
            let o = self.node(old);
            (o.color, o.parent, o.left, o.right)
        };
        self.set_child_at(parent, pos, tree, Some(new));
        if let Some(left) = left {
            self.node_mut(left).parent = Some(new);
        }
        if let Some(right) = right {
            self.node_mut(right).parent = Some(new);
        }

        let root = self.node(old).root;
        let n = self.node_mut(new);
        n.color = color;
        n.parent = parent;
        n.left = left;
        n.right = right;
        n.root = root;
        n.error = false;

        self.node_mut(old).make_orphan();
        Ok(())
    }

    /// Replaces subtree `old` with subtree `new` in the eyes of `old`'s parent
    fn transplant(&mut self, old: NodeId, new: Option<NodeId>, tree: TreeId) -> Result<()> {
        let pos = self.pos(old, tree)?;
        let parent = self.node(old).parent;
        self.set_child_at(parent, pos, tree, new);
        if let Some(new) = new {
            self.node_mut(new).parent = parent;
        }
        Ok(())
    }

    fn remove_fixup(
        &mut self,
        mut x: Option<NodeId>,
        mut x_parent: Option<NodeId>,
        tree: TreeId,
    ) -> Result<()> {
        // A black node was spliced out above `x`, so every path through `x` is
        // one black short. A red `x` absorbs that by turning black after the
        // loop. A black, non-root `x` counts as doubly black and the extra
        // black is pushed up or rotated away.
        while self.color_of(x).is_black() {
            let Some(parent) = x_parent else {
                break;
            };

            // `x` being doubly black means its sibling cannot be nil,
            // otherwise black heights below `parent` would differ.
            if self.node(parent).left == x {
                let Some(mut sibling) = self.node(parent).right else {
                    return Err(self.corrupted(parent));
                };

                if self.node(sibling).color.is_red() {
                    //     ┌─── p:b ───┐                    ┌─── s:b ───┐
                    //     │           │                    │           │
                    // ┌─ x:b ─┐   ┌─ s:r ─┐   ──►      ┌─ p:r ─┐      d:b
                    // │       │   │       │            │       │
                    // a       b  c:b     d:b       ┌─ x:b ─┐  c:b
                    //                              │       │
                    //                              a       b
                    // x now has a red parent, one of the cases below finishes
                    log::trace!("rbtree: remove fixup, red sibling of {parent}");
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left_raw(parent, tree)?;
                    sibling = match self.node(parent).right {
                        Some(sibling) => sibling,
                        None => return Err(self.corrupted(parent)),
                    };
                }

                let sibling_left = self.node(sibling).left;
                let sibling_right = self.node(sibling).right;
                if self.color_of(sibling_left).is_black()
                    && self.color_of(sibling_right).is_black()
                {
                    //     ┌─── p:c ───┐                ┌─── p:c ───┐
                    //     │           │                │           │
                    // ┌─ x:b ─┐   ┌─ s:b ─┐   ──►  ┌─ x:b ─┐   ┌─ s:r ─┐
                    // │       │   │       │        │       │   │       │
                    // a       b  c:b     d:b       a       b  c:b     d:b
                    // the missing black moves up to p
                    self.set_color(sibling, Color::Red);
                    x = Some(parent);
                    x_parent = self.node(parent).parent;
                } else {
                    if self.color_of(sibling_right).is_black() {
                        // near nephew is red, rotate it into the far position
                        let Some(near) = sibling_left else {
                            return Err(self.corrupted(sibling));
                        };
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right_raw(sibling, tree)?;
                        sibling = near;
                    }

                    //     ┌─── p:c ───┐                ┌── s:c ──┐
                    //     │           │                │         │
                    // ┌─ x:b ─┐   ┌─ s:b ─┐   ──►  ┌─ p:b ─┐    d:b
                    // │       │   │       │        │       │
                    // a       b  c:b     d:r     x:b     c:b
                    let parent_color = self.node(parent).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let Some(far) = self.node(sibling).right else {
                        return Err(self.corrupted(sibling));
                    };
                    self.set_color(far, Color::Black);
                    self.rotate_left_raw(parent, tree)?;
                    x = self.root(tree);
                    break;
                }
            } else {
                // same as above with left and right switched
                let Some(mut sibling) = self.node(parent).left else {
                    return Err(self.corrupted(parent));
                };

                if self.node(sibling).color.is_red() {
                    log::trace!("rbtree: remove fixup, red sibling of {parent}");
                    self.set_color(sibling, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right_raw(parent, tree)?;
                    sibling = match self.node(parent).left {
                        Some(sibling) => sibling,
                        None => return Err(self.corrupted(parent)),
                    };
                }

                let sibling_left = self.node(sibling).left;
                let sibling_right = self.node(sibling).right;
                if self.color_of(sibling_left).is_black()
                    && self.color_of(sibling_right).is_black()
                {
                    self.set_color(sibling, Color::Red);
                    x = Some(parent);
                    x_parent = self.node(parent).parent;
                } else {
                    if self.color_of(sibling_left).is_black() {
                        let Some(near) = sibling_right else {
                            return Err(self.corrupted(sibling));
                        };
                        self.set_color(near, Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left_raw(sibling, tree)?;
                        sibling = near;
                    }

                    let parent_color = self.node(parent).color;
                    self.set_color(sibling, parent_color);
                    self.set_color(parent, Color::Black);
                    let Some(far) = self.node(sibling).left else {
                        return Err(self.corrupted(sibling));
                    };
                    self.set_color(far, Color::Black);
                    self.rotate_right_raw(parent, tree)?;
                    x = self.root(tree);
                    break;
                }
            }
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{find, insert_key, keys};

    fn scenario_tree(arena: &mut Arena<i32>) -> TreeId {
        let tree = arena.new_tree();
        let mut inserted = Vec::new();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            insert_key(arena, tree, key);
            inserted.push(key);
            inserted.sort();
            assert!(arena.audit(tree).is_ok(), "audit failed after {key}");
            assert_eq!(keys(arena, tree), inserted);
        }
        tree
    }

    #[test]
    fn remove_two_child_then_rebalance() {
        let mut arena = Arena::new();
        let tree = scenario_tree(&mut arena);

        let three = find(&arena, tree, 3).unwrap();
        assert!(arena.left(three).is_some() && arena.right(three).is_some());
        arena.remove(three).unwrap();
        assert!(arena.audit(tree).is_ok());
        assert!(arena.is_orphan(three));
        assert_eq!(arena[three], 3);

        let eight = find(&arena, tree, 8).unwrap();
        arena.remove(eight).unwrap();
        assert!(arena.audit(tree).is_ok());
        assert!(arena.is_orphan(eight));

        assert_eq!(keys(&arena, tree), [1, 4, 5, 7, 9]);
    }

    #[test]
    fn successor_handle_survives_two_child_remove() {
        let mut arena = Arena::new();
        let tree = arena.new_tree();
        let mut handles = Vec::new();
        for key in [50, 30, 70, 20, 40, 60, 80, 35, 45] {
            handles.push((key, insert_key(&mut arena, tree, key)));
        }

        let thirty = find(&arena, tree, 30).unwrap();
        let thirty_five = find(&arena, tree, 35).unwrap();
        arena.remove(thirty).unwrap();
        assert!(arena.audit(tree).is_ok());

        // the successor moved into the removed position and kept its handle
        assert_eq!(arena[thirty_five], 35);
        assert_eq!(find(&arena, tree, 35), Some(thirty_five));
        for (key, handle) in handles.into_iter().filter(|(k, _)| *k != 30) {
            assert_eq!(arena[handle], key);
            assert_eq!(arena.tree_of(handle), Some(tree));
        }
    }

    #[test]
    fn remove_all_in_any_order_empties_tree() {
        let mut arena = Arena::new();
        let tree = arena.new_tree();
        let inserts = [3836, 3865, 4173, 1635, 4585, 8422, 4412, 2624, 2138, 128];
        let nodes: Vec<_> = inserts
            .iter()
            .map(|key| insert_key(&mut arena, tree, *key))
            .collect();

        for node in nodes.iter().rev() {
            arena.remove(*node).unwrap();
            assert!(arena.audit(tree).is_ok());
        }

        assert_eq!(arena.first(tree), None);
        assert_eq!(arena.last(tree), None);
        assert_eq!(arena.root(tree), None);
        for node in nodes {
            assert!(arena.is_orphan(node));
            assert_eq!(arena.parent(node), None);
            assert_eq!(arena.left(node), None);
            assert_eq!(arena.right(node), None);
        }
    }

    #[test]
    fn remove_orphan_fails() {
        let mut arena = Arena::<i32>::new();
        let node = arena.alloc(1);
        assert_eq!(arena.remove(node), Err(Error::NotLinked(node)));

        let freed = arena.alloc(2);
        arena.free(freed).unwrap();
        assert_eq!(arena.remove(freed), Err(Error::NoSuchNode(freed)));
    }

    #[test]
    fn free_requires_orphan() {
        let mut arena = Arena::new();
        let tree = arena.new_tree();
        let node = insert_key(&mut arena, tree, 7);

        assert_eq!(arena.free(node), Err(Error::AlreadyLinked(node)));
        assert_eq!(arena.release_tree(tree), Err(Error::TreeNotEmpty(tree)));

        arena.remove(node).unwrap();
        assert_eq!(arena.free(node), Ok(7));
        assert_eq!(arena.release_tree(tree), Ok(()));
        assert!(arena.is_empty());
    }

    #[test]
    fn replace_keeps_position() {
        let mut arena = Arena::new();
        let tree = arena.new_tree();
        for key in [5, 3, 8, 1, 4, 7, 9] {
            insert_key(&mut arena, tree, key);
        }

        for key in [5, 1, 8] {
            let old = find(&arena, tree, key).unwrap();
            let prev = arena.prev(old);
            let next = arena.next(old);
            let color = arena.color(old);

            let new = arena.alloc(key);
            arena.replace(old, new).unwrap();

            assert!(arena.is_orphan(old));
            assert_eq!(arena.tree_of(new), Some(tree));
            assert_eq!(arena.prev(new), prev);
            assert_eq!(arena.next(new), next);
            assert_eq!(arena.color(new), color);
            assert!(arena.audit(tree).is_ok());
        }

        assert_eq!(keys(&arena, tree), [1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn replace_preconditions() {
        let mut arena = Arena::new();
        let tree = arena.new_tree();
        let a = insert_key(&mut arena, tree, 1);
        let b = insert_key(&mut arena, tree, 2);
        let orphan = arena.alloc(3);

        assert_eq!(arena.replace(orphan, a), Err(Error::NotLinked(orphan)));
        assert_eq!(arena.replace(a, b), Err(Error::AlreadyLinked(b)));
        assert!(arena.audit(tree).is_ok());
        assert_eq!(keys(&arena, tree), [1, 2]);
    }

    mod proptests {
        use proptest::prelude::*;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        use super::*;

        #[cfg(not(miri))]
        const TREE_SIZE: usize = 500;
        #[cfg(miri)]
        const TREE_SIZE: usize = 30;

        #[cfg(not(miri))]
        const PROPTEST_CASES: u32 = 256;
        #[cfg(miri)]
        const PROPTEST_CASES: u32 = 10;

        proptest!(
            #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

            #[test]
            fn remove_by_handle(
                inserts in proptest::collection::hash_set(0..10000i32, 0..TREE_SIZE),
                seed in any::<u64>(),
            ) {
                let mut arena = Arena::new();
                let tree = arena.new_tree();
                let mut nodes: Vec<_> = inserts
                    .iter()
                    .map(|key| insert_key(&mut arena, tree, *key))
                    .collect();
                prop_assert!(arena.audit(tree).is_ok());

                nodes.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
                let (removed, kept) = nodes.split_at(nodes.len() / 2);
                for node in removed {
                    arena.remove(*node).unwrap();
                    prop_assert!(arena.audit(tree).is_ok());
                    prop_assert!(arena.is_orphan(*node));
                }

                let mut expected: Vec<_> = kept.iter().map(|node| arena[*node]).collect();
                expected.sort();

                let mut forward = Vec::new();
                let mut cursor = arena.first(tree);
                while let Some(node) = cursor {
                    forward.push(arena[node]);
                    cursor = arena.next(node);
                }
                prop_assert_eq!(&forward, &expected);

                let mut backward = Vec::new();
                let mut cursor = arena.last(tree);
                while let Some(node) = cursor {
                    backward.push(arena[node]);
                    cursor = arena.prev(node);
                }
                backward.reverse();
                prop_assert_eq!(&backward, &expected);

                for node in kept {
                    arena.remove(*node).unwrap();
                }
                prop_assert_eq!(arena.first(tree), None);
                prop_assert_eq!(arena.last(tree), None);
            }
        );
    }
}
