//! A red-black tree engine over caller-owned node storage.
//!
//! Nodes live in an [`Arena`] that the caller fills and drains explicitly with
//! [`Arena::alloc`] and [`Arena::free`]. A tree is nothing more than a root
//! cell inside that arena, named by a [`TreeId`]. Every linked node remembers
//! which root cell it belongs to, so "is this node on a tree, and which one"
//! and "where is the root of my tree" are both O(1) questions.
//!
//! The engine never compares payloads on its own. Ordering comes from a
//! comparator handed to [`Arena::search`] or
//! [`Arena::search_insert_or_replace`], or from explicit placement with
//! [`Arena::insert_left_or_root`] and [`Arena::insert_right_or_root`].
//!
//! ```
//! use rbtree::Arena;
//!
//! let mut arena = Arena::new();
//! let tree = arena.new_tree();
//! for key in [5, 3, 8] {
//!     let node = arena.alloc(key);
//!     arena
//!         .search_insert_or_replace(tree, node, |a: &i32, b: &i32| a.cmp(b), false)
//!         .unwrap();
//! }
//!
//! let keys: Vec<i32> = arena.iter(tree).map(|(_, k)| *k).collect();
//! assert_eq!(keys, [3, 5, 8]);
//! assert!(arena.audit(tree).is_ok());
//! ```
//!
//! [`RbMap`] wraps all of this into an ordinary ordered map.
#![deny(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod arena;
mod audit;
mod error;
mod insert;
mod iter;
mod map;
mod node;
mod remove;
mod rotate;
mod search;
#[cfg(test)]
mod testing;

pub use arena::Arena;
pub use audit::{Violation, ViolationKind};
pub use error::{Error, Result};
pub use iter::Iter;
pub use map::RbMap;
pub use node::{Color, Membership, NodeId, TreeId};
