//! Object storage collaborator.
//!
//! The pipeline talks to storage through the [`ObjectStorage`] trait so tests
//! can substitute an in-memory implementation. Production uses S3.

use async_trait::async_trait;

use homestage_core::{Error, Result};

/// Narrow object-storage contract used by the upload pipeline.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Put the provided content into the bucket at the provided key.
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()>;
}

/// S3-backed object storage.
#[derive(Clone, Debug)]
pub struct S3ObjectStorage {
    inner: aws_sdk_s3::Client,
}

impl S3ObjectStorage {
    pub fn new(inner: aws_sdk_s3::Client) -> Self {
        Self { inner }
    }

    /// Build a client from the ambient AWS environment.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config))
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    #[tracing::instrument(skip(self, bytes))]
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        let body = aws_sdk_s3::primitives::ByteStream::from(bytes.to_vec());
        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(())
    }
}

/// Resolve a stored key to a browsable URL against the public base URL.
pub fn resolve_public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}
