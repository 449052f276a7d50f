//! File metadata records and their store.
//!
//! A record is created once per successful upload and is never mutated; the
//! only other write is deletion.

pub mod sqlite;

pub use sqlite::SqliteMetadataStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileRecord {
    /// UUID v4 assigned at upload.
    pub id: String,
    /// Original filename as uploaded.
    pub filename: String,
    /// Object key of the envelope in both buckets.
    pub storage_path: String,
    /// Lowercase hex SHA-256 of the envelope.
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Object key for the envelope of file `id`.
    pub fn storage_path_for(id: &str) -> String {
        format!("{id}.enc")
    }
}

/// Errors from the metadata store.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A record with this id already exists.
    #[error("duplicate file id: {0}")]
    Duplicate(String),

    #[error("metadata database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for [`FileRecord`]s.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Persist a new record.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Duplicate`] if `record.id` is already taken.
    async fn insert(&self, record: &FileRecord) -> Result<(), MetadataError>;

    /// Look up a record by id.
    async fn find(&self, id: &str) -> Result<Option<FileRecord>, MetadataError>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<FileRecord>, MetadataError>;

    /// Remove a record. Returns `false` if there was nothing to remove.
    async fn delete(&self, id: &str) -> Result<bool, MetadataError>;

    /// Check database connectivity.
    async fn health_check(&self) -> Result<(), MetadataError>;
}
