//! [`ObjectStore`] backed by one S3 bucket.

use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, primitives::ByteStream};
use bytes::Bytes;
use tracing::{debug, warn};

use super::{ObjectStore, StorageError};

/// One S3 bucket. The primary and backup buckets each get their own instance
/// sharing a single SDK client.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StorageError> {
        let len = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/octet-stream")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                warn!(bucket = %self.bucket, key, error = %DisplayErrorContext(&e), "S3 put failed");
                StorageError::Backend(format!("put {key}: {}", DisplayErrorContext(&e)))
            })?;
        debug!(bucket = %self.bucket, key, bytes = len, "stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let context = DisplayErrorContext(&e).to_string();
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound {
                        key: key.to_owned(),
                    }
                } else {
                    warn!(bucket = %self.bucket, key, error = %context, "S3 get failed");
                    StorageError::Backend(format!("get {key}: {context}"))
                }
            })?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("read body of {key}: {e}")))?
            .into_bytes();

        debug!(bucket = %self.bucket, key, bytes = body.len(), "fetched object");
        Ok(body)
    }
}
