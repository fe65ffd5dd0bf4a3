//! S3 object-store backend.

use super::{FINGERPRINT_METADATA_KEY, ObjectStore, RemoteError, RemoteResult};
use crate::snapshot::{FileRecord, Fingerprint};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

/// S3-backed [`ObjectStore`] for one bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a store over the shared AWS config.
    ///
    /// A custom endpoint (LocalStack / MinIO) implies path-style addressing,
    /// since virtual-hosted buckets need DNS the emulators do not provide.
    pub fn new(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(config);
        if config.endpoint_url().is_some() {
            builder = builder.force_path_style(true);
        }
        Self {
            client: Client::from_conf(builder.build()),
            bucket: bucket.into(),
        }
    }

    fn store_error(&self, key: &str, message: String) -> RemoteError {
        RemoteError::Store {
            key: key.to_string(),
            message,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn fingerprint(&self, key: &str) -> RemoteResult<Option<Fingerprint>> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(head) => Ok(head
                .metadata()
                .and_then(|m| m.get(FINGERPRINT_METADATA_KEY))
                .map(|v| Fingerprint::from_metadata(v.as_str()))),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(None),
            Err(err) => Err(self.store_error(key, DisplayErrorContext(&err).to_string())),
        }
    }

    async fn put(&self, record: &FileRecord) -> RemoteResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&record.remote_key)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(record.body.clone()))
            .set_content_type(record.content_type.clone())
            .set_cache_control(record.cache_control.clone())
            .metadata(FINGERPRINT_METADATA_KEY, record.fingerprint.as_str())
            .send()
            .await
            .map_err(|err| {
                self.store_error(&record.remote_key, DisplayErrorContext(&err).to_string())
            })?;
        Ok(())
    }
}
