//! Atomic multi-operation transactions for ZooKeeper-style coordination
//! services.
//!
//! A [`Transaction`] batches create, delete, set-data and version-check
//! operations and commits them through a connection's atomic `multi`
//! primitive as one all-or-nothing request. The connection itself is an
//! injected collaborator (anything implementing [`MultiOpClient`]), as is the
//! [`RetryPolicy`] that decides whether a commit interrupted by a
//! connectivity failure is worth re-issuing.
//!
//! ```
//! use zkmulti::*;
//! use std::time::Duration;
//!
//! // A stand-in connection; a real one would speak to an ensemble.
//! struct Local;
//! impl MultiOpClient for Local {
//!     fn multi(&self, ops: &[Op]) -> ZkResult<Vec<OpResult>> {
//!         Ok(ops.iter()
//!               .map(|op| match op {
//!                   Op::Create { path, .. } => OpResult::Create { path: path.clone() },
//!                   _ => OpResult::Ack,
//!               })
//!               .collect())
//!     }
//! }
//!
//! let client = Local;
//! let retry = RetryNTimes::new(3, Duration::from_millis(100));
//! let mut txn = Transaction::new(&client, &retry, Chroot::none());
//! txn.create("/cfg", b"v1".to_vec(), Acl::open_unsafe().clone(), CreateMode::Persistent)
//!    .unwrap()
//!    .check("/cfg", None)
//!    .unwrap();
//! let results = txn.commit().unwrap();
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].result_path.as_deref(), Some("/cfg"));
//! ```

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate zkmulti_derive;

pub use crate::acl::*;
pub use crate::consts::*;
pub use crate::data::*;
pub use crate::multi::*;
pub use crate::paths::*;
pub use crate::retry::*;
pub use crate::transaction::*;
pub use crate::transport::*;

mod acl;
mod consts;
mod data;
mod multi;
mod paths;
pub mod proto;
mod retry;
mod transaction;
mod transport;
