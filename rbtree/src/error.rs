use thiserror::Error;

use crate::node::{NodeId, TreeId};

/// Errors returned by tree operations.
///
/// Every variant except [`Corrupted`](Error::Corrupted) is a precondition
/// failure: it is reported before anything is touched, so the arena is left
/// exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("node {0} does not exist")]
    NoSuchNode(NodeId),

    #[error("tree {0} does not exist")]
    NoSuchTree(TreeId),

    #[error("node {0} is already linked into a tree")]
    AlreadyLinked(NodeId),

    #[error("node {0} is not linked into any tree")]
    NotLinked(NodeId),

    #[error("node {0} is not a member of tree {1}")]
    NotMember(NodeId, TreeId),

    /// The requested child slot of the given parent is already taken.
    #[error("child slot of node {0} is occupied")]
    SlotOccupied(NodeId),

    /// A root insertion was requested but the tree already has a root.
    #[error("tree {0} already has a root")]
    TreeNotEmpty(TreeId),

    #[error("node {0} has no child on the rotation side")]
    MissingChild(NodeId),

    /// An equal node is already linked and replacement was not requested.
    #[error("node {0} compares equal and is already linked")]
    Duplicate(NodeId),

    /// Parent and child links disagree around this node. Its error flag has
    /// been raised.
    ///
    /// This cannot happen with exclusive, correct use of the API. Seeing it
    /// means the arena was corrupted or the engine has a bug.
    #[error("structural inconsistency detected at node {0}")]
    Corrupted(NodeId),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
