//! A mailbox is the slot of the shared store that holds the undelivered messages
//! addressed by one process id.
//!
//! The key of a mailbox depends on nothing but the process id, so a parent holding
//! the pid of its child and the child itself find the same mailbox without any
//! further coordination. Whoever sends writes into the mailbox keyed by the
//! conversation's owner; whoever receives drains it.

mod codec;

mod model;
pub use model::*;

use crate::{config::KEY_NAMESPACE, process::Pid};

/// The key of the mailbox owned by `pid`.
pub fn mailbox_key(pid: Pid) -> String {
    format!("{KEY_NAMESPACE}.{pid}")
}
