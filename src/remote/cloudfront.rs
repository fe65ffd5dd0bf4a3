//! CloudFront CDN backend.

use super::{EdgeCache, RemoteError, RemoteResult};
use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::error::DisplayErrorContext;
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};

/// CloudFront-backed [`EdgeCache`] for one distribution.
pub struct CloudFrontCache {
    client: Client,
    distribution_id: String,
}

impl CloudFrontCache {
    pub fn new(config: &aws_config::SdkConfig, distribution_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            distribution_id: distribution_id.into(),
        }
    }
}

#[async_trait]
impl EdgeCache for CloudFrontCache {
    async fn invalidate(&self, caller_reference: &str, paths: &[String]) -> RemoteResult<()> {
        let paths = Paths::builder()
            .quantity(paths.len() as i32)
            .set_items(Some(paths.to_vec()))
            .build()
            .map_err(|e| RemoteError::Cdn(e.to_string()))?;
        let batch = InvalidationBatch::builder()
            .caller_reference(caller_reference)
            .paths(paths)
            .build()
            .map_err(|e| RemoteError::Cdn(e.to_string()))?;

        self.client
            .create_invalidation()
            .distribution_id(&self.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(|err| RemoteError::Cdn(DisplayErrorContext(&err).to_string()))?;
        Ok(())
    }
}
