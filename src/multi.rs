use crate::acl::Acl;
use crate::consts::{CreateMode, ZkError};
use crate::data::Stat;

/// The kind of an operation inside a transaction. Carried alongside each
/// queued operation so its slot in the response can be reinterpreted later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Check,
    Create,
    Delete,
    SetData,
}

/// An operation that can exist as part of a transaction.
///
/// See `Transaction::commit` for more information.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    /// Check that the znode at `path` has the specified `version`. If the entry does not exist or
    /// has a different version than `version`, the transaction will fail. `None` matches any
    /// version.
    Check { path: String, version: Option<i32> },

    /// Create a node with the given `path`.
    Create {
        path: String,
        data: Vec<u8>,
        acl: Vec<Acl>,
        mode: CreateMode,
    },

    /// Delete the node at the given `path`.
    Delete { path: String, version: Option<i32> },

    /// Set the `data` for the node at the given `path`.
    SetData {
        path: String,
        data: Vec<u8>,
        version: Option<i32>,
    },
}

impl Op {
    /// The kind of this operation.
    pub fn kind(&self) -> OpKind {
        match self {
            Op::Check { .. } => OpKind::Check,
            Op::Create { .. } => OpKind::Create,
            Op::Delete { .. } => OpKind::Delete,
            Op::SetData { .. } => OpKind::SetData,
        }
    }
}

/// One entry of the response to a transaction. Entries answer operations by
/// position: the n-th entry is the outcome of the n-th submitted `Op`.
///
/// See `Transaction::commit` for more information.
#[derive(Clone, Debug, PartialEq)]
pub enum OpResult {
    /// Result of `Op::Check` or `Op::Delete` -- no information beyond success.
    Ack,

    /// Result of `Op::Create` -- the `path` is the path of the created node, which is useful if
    /// the node was created with `CreateMode::PersistentSequential` or
    /// `CreateMode::EphemeralSequential`.
    Create { path: String },

    /// Result of `Op::SetData` -- the `stat` is the new `Stat` value of the node.
    SetData { stat: Stat },

    /// An error marker. When the server rejects a transaction the response degenerates to a single
    /// leading `Error` entry carrying the code the whole batch was refused with.
    Error(ZkError),
}
