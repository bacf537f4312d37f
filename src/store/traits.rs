//! The [`SharedStore`] trait.
//!

use super::Ttl;
use crate::MailslotError;

/// A keyed store shared between processes.
///
/// Values are opaque bytes. An absent key is [`None`]; an empty value is not absent.
#[allow(async_fn_in_trait)]
pub trait SharedStore {
    /// Check if a live value exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool, MailslotError>;

    /// Get the value under `key`, or [`None`] if it is absent or expired.
    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, MailslotError>;

    /// Remove the value under `key`.
    ///
    /// Returns if anything was removed.
    async fn delete(&self, key: &str) -> Result<bool, MailslotError>;

    /// Write `value` under `key`, replacing anything already there.
    async fn store(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), MailslotError>;

    /// Replace the value under `key` with the result of `f` applied to the current one.
    ///
    /// If `f` fails, the store is left untouched and its error is returned.
    ///
    /// # Note
    ///
    /// The default implementation is read, delete, then overwrite. Two writers
    /// updating the same key at once can lose one of the updates.
    async fn update<F>(&self, key: &str, ttl: Ttl, f: F) -> Result<(), MailslotError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<Vec<u8>, MailslotError> + Send + 'static,
    {
        let current = self.fetch(key).await?;
        let next = f(current)?;

        self.delete(key).await?;
        self.store(key, next, ttl).await
    }

    /// Remove the value under `key` and return it.
    ///
    /// # Note
    ///
    /// The default implementation is fetch, then delete. A write landing between
    /// the two is lost.
    async fn take(&self, key: &str) -> Result<Option<Vec<u8>>, MailslotError> {
        if !self.exists(key).await? {
            return Ok(None);
        }

        let value = self.fetch(key).await?;
        self.delete(key).await?;

        Ok(value)
    }
}
