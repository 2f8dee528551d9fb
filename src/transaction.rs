use std::error::Error;
use std::fmt;

use crate::acl::Acl;
use crate::consts::{CreateMode, ZkError};
use crate::data::Stat;
use crate::multi::{Op, OpKind, OpResult};
use crate::paths::{self, Chroot};
use crate::retry::{self, RetryPolicy};
use crate::transport::MultiOpClient;

/// Why a transaction could not be built or committed.
#[derive(Clone, Debug, PartialEq)]
pub enum TxnError {
    /// A builder method or `commit` was invoked on a transaction whose
    /// `commit` already ran. This is a caller bug and is never retried; a
    /// failed commit burns the object just like a successful one.
    AlreadyCommitted,

    /// The caller handed a malformed path to a builder method. Nothing was
    /// queued.
    InvalidPath(String),

    /// The connection failed while committing and the retry policy gave up
    /// (or the failure was not one retrying could heal).
    Connection(ZkError),

    /// The server rejected the whole batch for a semantic reason, e.g. a
    /// failed version check or a missing node. Never retried; codes the
    /// library does not recognize classify as `ZkError::Unimplemented`.
    Rejected(ZkError),

    /// The server answered with a result list of the wrong length. This
    /// means the transport broke its ordering contract; always fatal.
    ResultCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for TxnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TxnError::AlreadyCommitted => write!(f, "transaction already committed"),
            TxnError::InvalidPath(path) => write!(f, "invalid path {:?}", path),
            TxnError::Connection(err) => write!(f, "connection failure: {}", err),
            TxnError::Rejected(err) => write!(f, "transaction failed: {}", err),
            TxnError::ResultCountMismatch { expected, actual } => write!(
                f,
                "result size {} doesn't match input size {}",
                actual, expected
            ),
        }
    }
}

impl Error for TxnError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TxnError::Connection(err) | TxnError::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// The outcome of one operation inside a committed transaction, in the same
/// position as the operation that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionResult {
    /// Which kind of operation this result answers.
    pub kind: OpKind,
    /// The path the operation was queued with, in the caller's namespace.
    pub for_path: String,
    /// For `Create` only: the path actually created, translated back into
    /// the caller's namespace. Differs from `for_path` when a sequential
    /// creation mode was used.
    pub result_path: Option<String>,
    /// For `SetData` only: the node's stat after the write.
    pub result_stat: Option<Stat>,
    /// `None` when this operation succeeded. Populated only if the server
    /// ever reports a per-entry error, which the protocol's atomicity
    /// guarantee makes unreachable today; handled anyway.
    pub error: Option<ZkError>,
}

/// Lifecycle of a transaction object. The transition is one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TxnState {
    Open,
    Committed,
}

/// Metadata remembered for every queued operation so its slot in the
/// response can be reinterpreted in the caller's namespace.
#[derive(Clone, Debug)]
struct QueuedOp {
    kind: OpKind,
    for_path: String,
}

/// An accumulator for operations to be committed as one atomic batch.
///
/// Operations are queued with the builder methods, which return the
/// transaction again so calls chain with `?`, then submitted together with
/// [`Transaction::commit`]. Queued operations are never merged, deduplicated
/// or reordered; the server receives them exactly as given, and the n-th
/// result answers the n-th operation.
///
/// A transaction is single-use: `commit`, successful or not, permanently
/// invalidates the object, and every later call answers
/// [`TxnError::AlreadyCommitted`]. Retries happen only inside `commit`,
/// through its retry policy. A transaction is also single-threaded:
/// accumulating from several threads at once is not supported.
pub struct Transaction<'a> {
    client: &'a dyn MultiOpClient,
    retry: &'a dyn RetryPolicy,
    chroot: Chroot,
    ops: Vec<Op>,
    queued: Vec<QueuedOp>,
    state: TxnState,
}

impl<'a> fmt::Debug for Transaction<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("state", &self.state)
            .field("chroot", &self.chroot)
            .field("ops", &self.ops)
            .finish()
    }
}

impl<'a> Transaction<'a> {
    /// Start an empty transaction committing through `client` under `retry`.
    /// Paths are translated through `chroot` on the way out and back.
    pub fn new(
        client: &'a dyn MultiOpClient,
        retry: &'a dyn RetryPolicy,
        chroot: Chroot,
    ) -> Transaction<'a> {
        Transaction {
            client,
            retry,
            chroot,
            ops: Vec::new(),
            queued: Vec::new(),
            state: TxnState::Open,
        }
    }

    /// Queue creation of a node at `path` with the given `data`, `acl` and
    /// `mode`.
    pub fn create(
        &mut self,
        path: &str,
        data: Vec<u8>,
        acl: Vec<Acl>,
        mode: CreateMode,
    ) -> Result<&mut Transaction<'a>, TxnError> {
        self.ensure_open()?;
        let server_path = self.fix(path)?;
        self.push(
            Op::Create {
                path: server_path,
                data,
                acl,
                mode,
            },
            path,
        );
        Ok(self)
    }

    /// Queue deletion of the node at `path`. `version` of `None` deletes
    /// regardless of the node's data version.
    pub fn delete(
        &mut self,
        path: &str,
        version: Option<i32>,
    ) -> Result<&mut Transaction<'a>, TxnError> {
        self.ensure_open()?;
        let server_path = self.fix(path)?;
        self.push(
            Op::Delete {
                path: server_path,
                version,
            },
            path,
        );
        Ok(self)
    }

    /// Queue a data write to the node at `path`. `version` of `None` writes
    /// regardless of the node's data version.
    pub fn set_data(
        &mut self,
        path: &str,
        data: Vec<u8>,
        version: Option<i32>,
    ) -> Result<&mut Transaction<'a>, TxnError> {
        self.ensure_open()?;
        let server_path = self.fix(path)?;
        self.push(
            Op::SetData {
                path: server_path,
                data,
                version,
            },
            path,
        );
        Ok(self)
    }

    /// Queue a version check of the node at `path`; `None` only checks that
    /// the node exists. The check writes nothing and contributes no fields
    /// to its result -- its only effect is to make the whole transaction
    /// fail when the expectation does not hold.
    pub fn check(
        &mut self,
        path: &str,
        version: Option<i32>,
    ) -> Result<&mut Transaction<'a>, TxnError> {
        self.ensure_open()?;
        let server_path = self.fix(path)?;
        self.push(
            Op::Check {
                path: server_path,
                version,
            },
            path,
        );
        Ok(self)
    }

    /// Number of operations queued so far.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Commit the queued operations as one atomic batch.
    ///
    /// On success the returned list holds exactly one [`TransactionResult`]
    /// per queued operation, in queueing order. On failure no results are
    /// returned at all: either every operation took effect or none did.
    ///
    /// The batch is re-submitted whole on transient connectivity failures
    /// for as long as the retry policy allows; once the policy declines, the
    /// connectivity error surfaces as [`TxnError::Connection`]. A rejection
    /// by the server surfaces as [`TxnError::Rejected`] and is never
    /// retried.
    pub fn commit(&mut self) -> Result<Vec<TransactionResult>, TxnError> {
        self.ensure_open()?;
        // Burn the object before the first attempt; a failed commit must not
        // be re-driven by calling commit again.
        self.state = TxnState::Committed;

        debug!("committing transaction of {} operation(s)", self.ops.len());

        let client = self.client;
        let ops = &self.ops[..];
        let raw = retry::call_with_retry(
            self.retry,
            |err: &TxnError| match err {
                TxnError::Connection(code) => retry::is_transient(*code),
                _ => false,
            },
            || {
                let results = client.multi(ops).map_err(TxnError::Connection)?;
                // A rejected batch degenerates to a single leading error
                // entry standing for the whole batch.
                if let Some(&OpResult::Error(code)) = results.first() {
                    return Err(TxnError::Rejected(code));
                }
                Ok(results)
            },
        )?;

        if raw.len() != self.queued.len() {
            return Err(TxnError::ResultCountMismatch {
                expected: self.queued.len(),
                actual: raw.len(),
            });
        }

        Ok(raw
            .into_iter()
            .zip(self.queued.iter())
            .map(|(result, queued)| wrap_result(&self.chroot, result, queued))
            .collect())
    }

    fn ensure_open(&self) -> Result<(), TxnError> {
        match self.state {
            TxnState::Open => Ok(()),
            TxnState::Committed => Err(TxnError::AlreadyCommitted),
        }
    }

    fn fix(&self, path: &str) -> Result<String, TxnError> {
        paths::validate_path(path).map_err(|_| TxnError::InvalidPath(path.to_string()))?;
        Ok(self.chroot.fix(path))
    }

    fn push(&mut self, op: Op, for_path: &str) {
        self.queued.push(QueuedOp {
            kind: op.kind(),
            for_path: for_path.to_string(),
        });
        self.ops.push(op);
    }
}

/// Reinterpret one raw result against the metadata of the operation that
/// produced it.
fn wrap_result(chroot: &Chroot, result: OpResult, queued: &QueuedOp) -> TransactionResult {
    let mut wrapped = TransactionResult {
        kind: queued.kind,
        for_path: queued.for_path.clone(),
        result_path: None,
        result_stat: None,
        error: None,
    };
    match result {
        OpResult::Create { path } => wrapped.result_path = Some(chroot.unfix(&path)),
        OpResult::SetData { stat } => wrapped.result_stat = Some(stat),
        OpResult::Error(code) => wrapped.error = Some(code),
        OpResult::Ack => {}
    }
    wrapped
}
