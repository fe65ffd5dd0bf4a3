//! Object store and CDN contracts, plus their backends.
//!
//! The pipeline only sees the two traits here; concrete clients are
//! constructed once at startup and passed in as explicit handles.

pub mod cloudfront;
pub mod memory;
pub mod s3;

pub use cloudfront::CloudFrontCache;
pub use memory::{MemoryCache, MemoryStore};
pub use s3::S3Store;

use crate::snapshot::{FileRecord, Fingerprint};
use async_trait::async_trait;
use thiserror::Error;

/// Metadata key under which each object's fingerprint is stored.
pub const FINGERPRINT_METADATA_KEY: &str = "stasis-fingerprint";

/// Errors from the remote backends. A missing object is never an error -
/// lookups report it as `None`.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("object store error for '{key}': {message}")]
    Store { key: String, message: String },

    #[error("cdn error: {0}")]
    Cdn(String),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// The object store holding the published site.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Last-published fingerprint of `key`, or `None` if the object has
    /// never been published. Any failure other than not-found is fatal.
    async fn fingerprint(&self, key: &str) -> RemoteResult<Option<Fingerprint>>;

    /// Upload a record: public-read ACL, content-type / cache-control when
    /// present, fingerprint stored under [`FINGERPRINT_METADATA_KEY`].
    async fn put(&self, record: &FileRecord) -> RemoteResult<()>;
}

/// The CDN sitting in front of the object store.
#[async_trait]
pub trait EdgeCache: Send + Sync {
    /// Issue one invalidation batch covering `paths` (route strings with
    /// their leading slash, never remote keys). `caller_reference` must be
    /// unique per batch so the provider does not deduplicate the request.
    async fn invalidate(&self, caller_reference: &str, paths: &[String]) -> RemoteResult<()>;
}

/// Load the shared AWS config once, honoring an optional region and custom
/// endpoint (LocalStack / MinIO).
pub async fn load_aws_config(
    region: Option<String>,
    endpoint: Option<String>,
) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region));
    }
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}
