//! A [`SharedStore`] living in the memory of the current process.
//!
//! Clones share the same entries, so every thread and task of one process sees the
//! same mailboxes. Useful to exercise endpoints without a second OS process.

use super::{SharedStore, Ttl};
use crate::MailslotError;

use fxhash::FxHashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<tokio::time::Instant>,
}

impl Entry {
    fn new(value: Vec<u8>, ttl: Ttl) -> Self {
        Self {
            value,
            expires_at: ttl
                .duration()
                .map(|duration| tokio::time::Instant::now() + duration),
        }
    }

    fn is_live(&self) -> bool {
        self.expires_at
            .map(|expires_at| expires_at > tokio::time::Instant::now())
            .unwrap_or(true)
    }
}

/// An in-process store, optionally bounded in the total bytes it holds.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<FxHashMap<String, Entry>>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Create a new, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new store refusing writes that would exceed `capacity` bytes of values.
    pub fn with_capacity_bytes(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Get the number of live entries.
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|entry| entry.is_live()).count()
    }

    /// Check if the store holds no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Fail with [`MailslotError::StoreFull`] if `len` bytes under `key` do not fit.
    fn check_capacity(
        &self,
        entries: &FxHashMap<String, Entry>,
        key: &str,
        len: usize,
    ) -> Result<(), MailslotError> {
        let Some(capacity) = self.capacity else {
            return Ok(());
        };

        let used: usize = entries
            .iter()
            .filter(|(existing, entry)| existing.as_str() != key && entry.is_live())
            .map(|(_, entry)| entry.value.len())
            .sum();

        if used + len > capacity {
            Err(MailslotError::StoreFull(key.to_owned(), len))
        } else {
            Ok(())
        }
    }
}

impl SharedStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, MailslotError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).is_some_and(Entry::is_live))
    }

    async fn fetch(&self, key: &str) -> Result<Option<Vec<u8>>, MailslotError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, MailslotError> {
        let mut entries = self.entries.write().await;
        logger::trace!("Removing entry {}...", key);
        Ok(entries.remove(key).is_some_and(|entry| entry.is_live()))
    }

    async fn store(&self, key: &str, value: Vec<u8>, ttl: Ttl) -> Result<(), MailslotError> {
        let mut entries = self.entries.write().await;
        self.check_capacity(&entries, key, value.len())?;

        entries.insert(key.to_owned(), Entry::new(value, ttl));
        Ok(())
    }

    /// Atomic: the whole read-modify-write happens under one write lock.
    async fn update<F>(&self, key: &str, ttl: Ttl, f: F) -> Result<(), MailslotError>
    where
        F: FnOnce(Option<Vec<u8>>) -> Result<Vec<u8>, MailslotError> + Send + 'static,
    {
        let mut entries = self.entries.write().await;

        let current = entries
            .get(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone());
        let next = f(current)?;
        self.check_capacity(&entries, key, next.len())?;

        entries.insert(key.to_owned(), Entry::new(next, ttl));
        Ok(())
    }

    /// Atomic: removal and retrieval are one operation.
    async fn take(&self, key: &str) -> Result<Option<Vec<u8>>, MailslotError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn store_fetch_delete() {
        let store = MemoryStore::new();

        assert!(!store.exists("a").await.unwrap());
        assert_eq!(store.fetch("a").await.unwrap(), None);

        store.store("a", b"one".to_vec(), Ttl::Forever).await.unwrap();
        assert!(store.exists("a").await.unwrap());
        assert_eq!(store.fetch("a").await.unwrap(), Some(b"one".to_vec()));

        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn empty_value_is_not_absent() {
        let store = MemoryStore::new();
        store.store("a", Vec::new(), Ttl::Forever).await.unwrap();

        assert!(store.exists("a").await.unwrap());
        assert_eq!(store.fetch("a").await.unwrap(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.store("a", b"one".to_vec(), Ttl::Forever).await.unwrap();
        assert_eq!(other.take("a").await.unwrap(), Some(b"one".to_vec()));
        assert!(!store.exists("a").await.unwrap());
    }

    #[tokio::test]
    async fn expired_entries_are_absent() {
        let store = MemoryStore::new();
        store
            .store("a", b"one".to_vec(), Ttl::For(std::time::Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(store.exists("a").await.unwrap());

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert!(!store.exists("a").await.unwrap());
        assert_eq!(store.fetch("a").await.unwrap(), None);
        assert_eq!(store.take("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_sees_current_value() {
        let store = MemoryStore::new();

        for _ in 0..3 {
            store
                .update("counter", Ttl::Forever, |current| {
                    let mut value = current.unwrap_or_default();
                    value.push(b'x');
                    Ok(value)
                })
                .await
                .unwrap();
        }

        assert_eq!(store.fetch("counter").await.unwrap(), Some(b"xxx".to_vec()));
    }

    #[tokio::test]
    async fn failed_update_leaves_value() {
        let store = MemoryStore::new();
        store.store("a", b"one".to_vec(), Ttl::Forever).await.unwrap();

        let result = store
            .update("a", Ttl::Forever, |_| {
                Err(MailslotError::CorruptMailbox("a".to_owned(), "test".to_owned()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.fetch("a").await.unwrap(), Some(b"one".to_vec()));
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let store = MemoryStore::with_capacity_bytes(4);

        store.store("a", b"abc".to_vec(), Ttl::Forever).await.unwrap();
        // Replacing a key does not count its old value.
        store.store("a", b"abcd".to_vec(), Ttl::Forever).await.unwrap();

        let result = store.store("b", b"e".to_vec(), Ttl::Forever).await;
        assert!(matches!(result, Err(MailslotError::StoreFull(key, 1)) if key == "b"));
        assert!(!store.exists("b").await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_updates_are_not_lost() {
        let store = MemoryStore::new();

        futures::future::join_all((0..32).map(|_| {
            store.update("counter", Ttl::Forever, |current| {
                let mut value = current.unwrap_or_default();
                value.push(b'x');
                Ok(value)
            })
        }))
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

        assert_eq!(store.fetch("counter").await.unwrap().map(|v| v.len()), Some(32));
    }
}
