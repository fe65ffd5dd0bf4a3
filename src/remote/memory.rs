//! In-memory backends.
//!
//! Back the integration tests (and any caller that wants a dry run against
//! a fake remote) with the same contracts as the real AWS clients.

use super::{EdgeCache, ObjectStore, RemoteResult};
use crate::snapshot::{FileRecord, Fingerprint};
use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A stored object, as the in-memory store keeps it.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub fingerprint: Fingerprint,
}

/// In-memory [`ObjectStore`].
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<FxHashMap<String, StoredObject>>,
    uploads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored object at `key`, if any.
    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().get(key).cloned()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// Total `put` calls over the store's lifetime.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn fingerprint(&self, key: &str) -> RemoteResult<Option<Fingerprint>> {
        Ok(self
            .objects
            .lock()
            .get(key)
            .map(|o| o.fingerprint.clone()))
    }

    async fn put(&self, record: &FileRecord) -> RemoteResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().insert(
            record.remote_key.clone(),
            StoredObject {
                body: record.body.clone(),
                content_type: record.content_type.clone(),
                cache_control: record.cache_control.clone(),
                fingerprint: record.fingerprint.clone(),
            },
        );
        Ok(())
    }
}

/// In-memory [`EdgeCache`] recording every invalidation batch.
#[derive(Default)]
pub struct MemoryCache {
    batches: Mutex<Vec<(String, Vec<String>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(caller_reference, paths)` batches issued so far.
    pub fn batches(&self) -> Vec<(String, Vec<String>)> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl EdgeCache for MemoryCache {
    async fn invalidate(&self, caller_reference: &str, paths: &[String]) -> RemoteResult<()> {
        self.batches
            .lock()
            .push((caller_reference.to_string(), paths.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_absent_key_is_none_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.fingerprint("never/published").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_lookup() {
        let store = MemoryStore::new();
        let record = FileRecord::new("/a", b"x".to_vec(), None, None);
        store.put(&record).await.unwrap();

        let fp = store.fingerprint("a").await.unwrap();
        assert_eq!(fp, Some(record.fingerprint));
        assert_eq!(store.upload_count(), 1);
    }
}
