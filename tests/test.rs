use std::cell::RefCell;
use std::collections::VecDeque;

use zkmulti::{MultiOpClient, Op, OpResult, Stat, ZkResult};

mod test_proto;

/// A scripted stand-in for a live connection. Replies are queued up front
/// with `push_reply`; every batch handed to `multi` is recorded so tests can
/// assert on what actually went over the wire.
pub struct MockClient {
    replies: RefCell<VecDeque<ZkResult<Vec<OpResult>>>>,
    batches: RefCell<Vec<Vec<Op>>>,
}

impl MockClient {
    pub fn new() -> MockClient {
        MockClient {
            replies: RefCell::new(VecDeque::new()),
            batches: RefCell::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: ZkResult<Vec<OpResult>>) {
        self.replies.borrow_mut().push_back(reply);
    }

    /// The batches submitted so far, oldest first.
    pub fn batches(&self) -> Vec<Vec<Op>> {
        self.batches.borrow().clone()
    }
}

impl MultiOpClient for MockClient {
    fn multi(&self, ops: &[Op]) -> ZkResult<Vec<OpResult>> {
        self.batches.borrow_mut().push(ops.to_vec());
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("mock client ran out of scripted replies")
    }
}

/// A stat whose data `version` is the only field of interest.
pub fn stat_with_version(version: i32) -> Stat {
    Stat {
        czxid: 10,
        mzxid: 11,
        ctime: 0,
        mtime: 0,
        version,
        cversion: 0,
        aversion: 0,
        ephemeral_owner: 0,
        data_length: 2,
        num_children: 0,
        pzxid: 11,
    }
}
