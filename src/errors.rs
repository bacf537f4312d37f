//! Error types.
//!

use crate::process::{Pid, Signal};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailslotError {
    #[error("Not able to persist message for PID {0} with key {1}: {2}")]
    Persistence(Pid, String, String),
    #[error("Message persisted, but signal {1} could not be delivered to PID {0}: {2}")]
    Notification(Pid, Signal, std::io::Error),
    #[error("Store has no room for {1} bytes under key {0}.")]
    StoreFull(String, usize),
    #[error("Invalid store key: {0}")]
    InvalidKey(String),
    #[error("Mailbox {0} does not hold a valid message list: {1}")]
    CorruptMailbox(String, String),
    #[error("Timed out after {0:?} waiting for messages.")]
    Timeout(std::time::Duration),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Tokio error: {0}")]
    Tokio(#[from] tokio::task::JoinError),
}

impl MailslotError {
    /// Whether the message was lost because the shared store could not be written.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(..))
    }

    /// Whether the message was persisted but the recipient was not woken.
    ///
    /// Callers may retry [`crate::Endpoint::signal`] alone in this case.
    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Notification(..))
    }
}
