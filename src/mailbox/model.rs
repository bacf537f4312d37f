//! Reading and writing one mailbox.

use super::{codec, mailbox_key};
use crate::{
    process::Pid,
    store::{SharedStore, Ttl},
    MailslotError,
};
use serde::{de::DeserializeOwned, Serialize};

/// A handle on the mailbox of one process id, in a given store.
#[derive(Debug)]
pub struct Mailbox<'s, S> {
    store: &'s S,
    key: String,
}

impl<'s, S> Mailbox<'s, S>
where
    S: SharedStore,
{
    /// The mailbox owned by `pid`.
    pub fn new(store: &'s S, pid: Pid) -> Self {
        Self {
            store,
            key: mailbox_key(pid),
        }
    }

    /// Get the key of this mailbox.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Append a message after all pending ones.
    ///
    /// The mailbox is created if absent, and never expires.
    pub async fn push<T>(&self, message: &T) -> Result<(), MailslotError>
    where
        T: Serialize + ?Sized,
    {
        let message = serde_json::to_value(message)?;
        let key = self.key.clone();

        logger::trace!("Pushing {} into mailbox {}...", message, self.key);
        self.store
            .update(&self.key, Ttl::Forever, move |existing| {
                codec::append(&key, existing, message)
            })
            .await
    }

    /// Remove and return all pending messages, oldest first.
    ///
    /// An absent mailbox has no messages. If the messages cannot be decoded as `T`,
    /// they are put back ahead of anything pushed in the meantime, and
    /// [`MailslotError::CorruptMailbox`] is returned.
    pub async fn drain<T>(&self) -> Result<Vec<T>, MailslotError>
    where
        T: DeserializeOwned,
    {
        let Some(bytes) = self.store.take(&self.key).await? else {
            return Ok(Vec::new());
        };

        match codec::decode(&self.key, &bytes) {
            Ok(messages) => {
                logger::trace!("Drained {} messages from {}.", messages.len(), self.key);
                Ok(messages)
            }
            Err(err) => {
                let restored = self
                    .store
                    .update(&self.key, Ttl::Forever, move |existing| {
                        codec::restore(bytes, existing)
                    })
                    .await;

                if let Err(_restore_err) = restored {
                    logger::warn!(
                        "Failed to put undecodable messages back into {}: {}",
                        self.key,
                        _restore_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Check if there is nothing pending, without consuming anything.
    pub async fn is_empty(&self) -> Result<bool, MailslotError> {
        Ok(!self.store.exists(&self.key).await?)
    }
}
