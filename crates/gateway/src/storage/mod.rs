//! Object storage for encrypted envelopes.
//!
//! Envelopes are opaque bytes keyed by `storage_path`; nothing in this module
//! inspects or transforms them.

pub mod s3;

#[cfg(test)]
pub mod memory;

pub use s3::S3ObjectStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors from an object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No object exists under the key.
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// The backend could not be reached or rejected the request.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A bucket of opaque objects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object.
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StorageError>;

    /// Fetch the object stored under `key`.
    async fn get(&self, key: &str) -> Result<Bytes, StorageError>;
}
