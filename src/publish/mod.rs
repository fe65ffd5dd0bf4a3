//! Publisher: upload the changeset, then issue one cache invalidation.

use crate::diff::ChangeSet;
use crate::log;
use crate::logger::ProgressLine;
use crate::remote::{EdgeCache, ObjectStore};
use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploySummary {
    /// Routes discovered (after dedup).
    pub routes: usize,
    /// Records whose fingerprint differed from remote state.
    pub changed: usize,
    /// Whether an invalidation request was issued.
    pub invalidated: bool,
}

impl fmt::Display for DeploySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changed == 0 {
            write!(f, "{} routes, nothing changed", self.routes)
        } else {
            write!(
                f,
                "{} routes, {} uploaded, 1 invalidation",
                self.routes, self.changed
            )
        }
    }
}

/// Upload every changed record, then invalidate exactly the changed routes.
///
/// An empty changeset short-circuits: no upload, and no invalidation request
/// is ever issued with zero paths. Uploads all complete before the single
/// invalidation goes out. A failure mid-changeset leaves the store partially
/// updated - there is no rollback, the error simply propagates.
pub async fn publish(
    changes: &ChangeSet,
    store: &dyn ObjectStore,
    cache: &dyn EdgeCache,
) -> Result<()> {
    if changes.is_empty() {
        log!("publish"; "everything up to date");
        return Ok(());
    }

    let progress = ProgressLine::new("publish", &[("upload", changes.len())]);
    {
        let progress = &progress;
        let uploads = changes.records().iter().map(|record| async move {
            store
                .put(record)
                .await
                .with_context(|| format!("failed to upload {}", record.remote_key))?;
            progress.inc("upload");
            anyhow::Ok(())
        });
        try_join_all(uploads).await?;
    }
    progress.finish();

    let routes = changes.routes();
    cache
        .invalidate(&caller_reference(), &routes)
        .await
        .context("failed to invalidate changed paths")?;
    log!("publish"; "invalidated {} path(s)", routes.len());

    Ok(())
}

/// Unique reference per invalidation batch, so the CDN provider does not
/// deduplicate repeated requests.
fn caller_reference() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("stasis-{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff;
    use crate::remote::{MemoryCache, MemoryStore};
    use crate::snapshot::FileRecord;

    fn record(route: &str, body: &[u8]) -> FileRecord {
        FileRecord::new(route, body.to_vec(), None, None)
    }

    #[tokio::test]
    async fn test_empty_changeset_short_circuits() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();

        publish(&ChangeSet::default(), &store, &cache).await.unwrap();

        assert_eq!(store.upload_count(), 0);
        assert!(cache.batches().is_empty());
    }

    #[tokio::test]
    async fn test_uploads_then_single_invalidation() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let changes = diff::diff(vec![record("/", b"a"), record("/x", b"b")], &store)
            .await
            .unwrap();

        publish(&changes, &store, &cache).await.unwrap();

        assert_eq!(store.upload_count(), 2);
        let batches = cache.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1, vec!["/", "/x"]);
        assert!(!batches[0].0.is_empty());
    }

    #[tokio::test]
    async fn test_invalidation_uses_routes_not_keys() {
        let store = MemoryStore::new();
        let cache = MemoryCache::new();
        let changes = diff::diff(vec![record("/", b"a")], &store).await.unwrap();

        publish(&changes, &store, &cache).await.unwrap();

        // Uploaded under the remote key, invalidated under the route
        assert!(store.object("index.html").is_some());
        assert_eq!(cache.batches()[0].1, vec!["/"]);
    }
}
