use core::fmt;
use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::arena::Arena;
use crate::audit::Violation;
use crate::error::Error;
use crate::node::{NodeId, TreeId};

/// An ordered map on top of the tree engine.
///
/// Each entry is one node whose payload is the `(key, value)` pair. The map
/// owns its arena, so nodes are allocated on insert and freed on delete.
pub struct RbMap<K, V> {
    arena: Arena<(K, V)>,
    tree: TreeId,
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for RbMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Entries<'a, K, V>(&'a RbMap<K, V>);

        impl<K, V> fmt::Debug for Entries<'_, K, V>
        where
            K: fmt::Debug,
            V: fmt::Debug,
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.0.iter()).finish()
            }
        }

        f.debug_struct("RbMap")
            .field("len", &self.len())
            .field("root", &self.arena.root(self.tree).map(|root| &self.arena[root].0))
            .field("entries", &Entries(self))
            .finish()
    }
}

impl<K, V> RbMap<K, V> {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let tree = arena.new_tree();
        Self { arena, tree }
    }

    #[inline]
    pub fn len(&self) -> usize {
        // every allocated node is linked, removed nodes are freed right away
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Inserts `key` with `value`, returning the value it replaced.
    ///
    /// On replacement the new key is kept.
    pub fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        let node = self.arena.alloc((key, value));
        let replaced =
            self.arena
                .search_insert_or_replace(self.tree, node, |a, b| a.0.cmp(&b.0), true);

        match replaced {
            Ok(None) => None,
            Ok(Some(old)) => self.arena.free(old).ok().map(|(_, value)| value),
            Err(err) => {
                // `node` is fresh and orphaned, so only corruption ends up here
                log::error!("rbtree map: insert failed: {err}");
                debug_assert!(matches!(err, Error::Corrupted(_)), "insert failed: {err}");
                if self.arena.is_orphan(node) {
                    self.arena.free(node).ok();
                }
                None
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_raw(key).map(|node| {
            let (k, v) = &self.arena[node];
            (k, v)
        })
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<(&K, &mut V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.get_raw(key)?;
        let (k, v) = &mut self.arena[node];
        Some((&*k, v))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_raw(key).is_some()
    }

    fn get_raw<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.arena.root(self.tree);
        match self.arena.search_by(root, |(k, _)| Ord::cmp(k.borrow(), key)) {
            Some((node, Ordering::Equal)) => Some(node),
            _ => None,
        }
    }

    pub fn delete<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.get_raw(key)?;
        if let Err(err) = self.arena.remove(node) {
            log::error!("rbtree map: delete failed: {err}");
            return None;
        }
        self.arena.free(node).ok()
    }

    pub fn min(&self) -> Option<(&K, &V)> {
        self.arena.first(self.tree).map(|node| self.entry(node))
    }

    pub fn max(&self) -> Option<(&K, &V)> {
        self.arena.last(self.tree).map(|node| self.entry(node))
    }

    /// Entry with the smallest key larger than `key`, which must be present.
    pub fn successor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.get_raw(key)?;
        self.arena.next(node).map(|node| self.entry(node))
    }

    /// Entry with the largest key smaller than `key`, which must be present.
    pub fn predecessor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.get_raw(key)?;
        self.arena.prev(node).map(|node| self.entry(node))
    }

    pub fn inorder_for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut cursor = self.arena.first(self.tree);
        while let Some(node) = cursor {
            cursor = self.arena.next(node);
            let (k, v) = &mut self.arena[node];
            f(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.arena.iter(self.tree).map(|(_, (k, v))| (k, v))
    }

    /// Runs [`Arena::audit`] on the underlying tree.
    pub fn audit(&self) -> Result<(), Violation> {
        self.arena.audit(self.tree)
    }

    fn entry(&self, node: NodeId) -> (&K, &V) {
        let (k, v) = &self.arena[node];
        (k, v)
    }
}

impl<K, V> FromIterator<(K, V)> for RbMap<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}
