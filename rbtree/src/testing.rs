use core::cmp::Ordering;

use crate::arena::Arena;
use crate::node::{NodeId, NodePos, TreeId};

pub(crate) fn cmp_i32(a: &i32, b: &i32) -> Ordering {
    a.cmp(b)
}

/// Allocates `key` and links it at its sorted position.
pub(crate) fn insert_key(arena: &mut Arena<i32>, tree: TreeId, key: i32) -> NodeId {
    let node = arena.alloc(key);
    arena
        .search_insert_or_replace(tree, node, cmp_i32, false)
        .unwrap();
    node
}

pub(crate) fn find(arena: &Arena<i32>, tree: TreeId, key: i32) -> Option<NodeId> {
    match arena.search_by(arena.root(tree), |n| n.cmp(&key)) {
        Some((node, Ordering::Equal)) => Some(node),
        _ => None,
    }
}

pub(crate) fn keys(arena: &Arena<i32>, tree: TreeId) -> Vec<i32> {
    arena.iter(tree).map(|(_, key)| *key).collect()
}

/// Plain binary search tree insertion, no rebalancing and no recoloring.
pub(crate) fn build_unbalanced(arena: &mut Arena<i32>, tree: TreeId, keys: &[i32]) {
    for key in keys {
        let node = arena.alloc(*key);
        match arena.search_by(arena.root(tree), |n| n.cmp(key)) {
            None => arena.link(node, None, NodePos::Root, tree).unwrap(),
            Some((parent, Ordering::Less)) => {
                arena.link(node, Some(parent), NodePos::Right, tree).unwrap()
            }
            Some((parent, Ordering::Greater)) => {
                arena.link(node, Some(parent), NodePos::Left, tree).unwrap()
            }
            Some((_, Ordering::Equal)) => panic!("duplicate key {key}"),
        }
    }
}

/// Renders the tree as nested `(left key right)` groups, nil children omitted.
pub(crate) fn shape(arena: &Arena<i32>, tree: TreeId) -> String {
    fn inner(arena: &Arena<i32>, node: NodeId, out: &mut String) {
        out.push('(');
        if let Some(left) = arena.left(node) {
            inner(arena, left, out);
            out.push(' ');
        }
        out.push_str(&arena[node].to_string());
        if let Some(right) = arena.right(node) {
            out.push(' ');
            inner(arena, right, out);
        }
        out.push(')');
    }

    let mut out = String::new();
    if let Some(root) = arena.root(tree) {
        inner(arena, root, &mut out);
    }
    out
}
