//! Diff engine: select the records whose fingerprint differs from what is
//! currently published.

use crate::remote::{ObjectStore, RemoteResult};
use crate::snapshot::FileRecord;
use futures::future::try_join_all;

/// Records that need publishing, in snapshot order.
#[derive(Debug, Default)]
pub struct ChangeSet {
    records: Vec<FileRecord>,
}

impl ChangeSet {
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Route strings (leading slash intact) for cache invalidation.
    pub fn routes(&self) -> Vec<String> {
        self.records.iter().map(|r| r.route.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Compare every record against the store's last-published fingerprint.
///
/// A record is included iff the fingerprints differ; a never-published key
/// (`None`) always counts as different. All lookups complete before the
/// result is returned, so no upload starts while state is still being read.
pub async fn diff(records: Vec<FileRecord>, store: &dyn ObjectStore) -> RemoteResult<ChangeSet> {
    let lookups = records.iter().map(|r| store.fingerprint(&r.remote_key));
    let remote = try_join_all(lookups).await?;

    let records = records
        .into_iter()
        .zip(remote)
        .filter(|(record, published)| published.as_ref() != Some(&record.fingerprint))
        .map(|(record, _)| record)
        .collect();

    Ok(ChangeSet { records })
}
