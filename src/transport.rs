use crate::consts::ZkError;
use crate::multi::{Op, OpResult};

/// Value returned from potentially-failing operations.
pub type ZkResult<T> = Result<T, ZkError>;

/// A connection capable of executing the store's atomic multi primitive.
///
/// `multi` submits the whole ordered batch as one request and must uphold two
/// guarantees the transaction layer depends on:
///
/// - Ordering: the n-th entry of the returned list answers the n-th submitted
///   operation. There is no other correlation mechanism.
/// - Atomicity: either every operation succeeded, or the batch was rejected
///   as a unit and the list degenerates to a single leading
///   `OpResult::Error` naming the reason.
///
/// Connection-level failures (as opposed to rejections) are reported through
/// the `Err` side, e.g. `ZkError::ConnectionLoss`.
pub trait MultiOpClient {
    fn multi(&self, ops: &[Op]) -> ZkResult<Vec<OpResult>>;
}
