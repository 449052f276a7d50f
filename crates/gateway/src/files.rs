//! Upload, download, list and delete of encrypted files.
//!
//! Ties the envelope codec to the metadata store, the two buckets and the
//! optional MFT transfer. HTTP concerns stay in [`crate::server`].

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use common::ServiceError;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::crypto::{self, CipherError, EnvelopeCodec, IntegrityError};
use crate::metadata::{FileRecord, MetadataError, MetadataStore};
use crate::storage::{ObjectStore, StorageError};
use crate::transfer::{self, TransferClient};

/// Which bucket a download reads from.
///
/// There is no automatic failover: the backup bucket is only read when the
/// caller asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Primary,
    Backup,
}

impl Source {
    fn as_str(self) -> &'static str {
        match self {
            Source::Primary => "primary",
            Source::Backup => "backup",
        }
    }
}

/// Errors from file operations.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl From<FileError> for ServiceError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound(_) => ServiceError::NotFound("File not found".into()),
            FileError::Integrity(e) => ServiceError::Integrity(e.to_string()),
            FileError::Storage(e) => ServiceError::Storage(e.to_string()),
            FileError::Cipher(e) => ServiceError::Internal(e.to_string()),
            FileError::Metadata(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

/// A decrypted download.
#[derive(Debug)]
pub struct Download {
    pub filename: String,
    pub plaintext: Vec<u8>,
}

/// The file service. Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct FileService {
    codec: EnvelopeCodec,
    metadata: Arc<dyn MetadataStore>,
    primary: Arc<dyn ObjectStore>,
    backup: Arc<dyn ObjectStore>,
    transfer: Option<Arc<dyn TransferClient>>,
}

impl FileService {
    pub fn new(
        codec: EnvelopeCodec,
        metadata: Arc<dyn MetadataStore>,
        primary: Arc<dyn ObjectStore>,
        backup: Arc<dyn ObjectStore>,
        transfer: Option<Arc<dyn TransferClient>>,
    ) -> Self {
        Self {
            codec,
            metadata,
            primary,
            backup,
            transfer,
        }
    }

    /// Encrypt and store `plaintext`, then record its metadata.
    ///
    /// The MFT copy is dispatched in the background and cannot fail the
    /// upload. Storage and metadata writes are awaited and their errors
    /// propagate.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::Storage`] if the primary bucket rejects the
    /// envelope and [`FileError::Metadata`] if the record cannot be written.
    pub async fn upload(&self, filename: &str, plaintext: &[u8]) -> Result<FileRecord, FileError> {
        let id = Uuid::new_v4().to_string();

        let envelope = Bytes::from(self.codec.encode(plaintext)?);
        let checksum = crypto::sha256_hex(&envelope);
        let storage_path = FileRecord::storage_path_for(&id);
        info!(id = %id, bytes = plaintext.len(), "encrypted upload");

        self.primary.put(&storage_path, envelope.clone()).await?;

        if let Some(client) = &self.transfer {
            // Detached: the handle is dropped and the outcome is only logged.
            let _ = transfer::dispatch(client.clone(), storage_path.clone(), envelope);
        }

        let record = FileRecord {
            id,
            filename: filename.to_owned(),
            storage_path,
            checksum,
            created_at: Utc::now(),
        };
        self.metadata.insert(&record).await?;
        info!(id = %record.id, "metadata saved");
        Ok(record)
    }

    /// Fetch, verify and decrypt file `id` from `source`.
    ///
    /// The checksum is compared before decryption is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::NotFound`] when no record exists,
    /// [`FileError::Storage`] when the bucket read fails, and
    /// [`FileError::Integrity`] on checksum or tag mismatch.
    pub async fn download(&self, id: &str, source: Source) -> Result<Download, FileError> {
        let record = self
            .metadata
            .find(id)
            .await?
            .ok_or_else(|| FileError::NotFound(id.to_owned()))?;

        let store = match source {
            Source::Primary => &self.primary,
            Source::Backup => &self.backup,
        };
        let envelope = store.get(&record.storage_path).await.map_err(|e| {
            warn!(id, source = source.as_str(), error = %e, "envelope fetch failed");
            e
        })?;

        if let Err(e) = crypto::verify_checksum(&envelope, &record.checksum) {
            warn!(id, source = source.as_str(), "checksum mismatch");
            return Err(e.into());
        }
        let plaintext = self.codec.decode(&envelope).map_err(|e| {
            warn!(id, source = source.as_str(), error = %e, "envelope failed authentication");
            e
        })?;

        Ok(Download {
            filename: record.filename,
            plaintext,
        })
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<FileRecord>, FileError> {
        Ok(self.metadata.list().await?)
    }

    /// Delete the metadata record of file `id`.
    ///
    /// The envelope stays in the buckets; bucket lifecycle rules own its
    /// removal.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::NotFound`] when no record exists.
    pub async fn delete(&self, id: &str) -> Result<(), FileError> {
        if self.metadata.delete(id).await? {
            info!(id, "metadata deleted");
            Ok(())
        } else {
            Err(FileError::NotFound(id.to_owned()))
        }
    }

    /// Ping the metadata store.
    pub async fn metadata_ready(&self) -> bool {
        match self.metadata.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "metadata health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::crypto::{key::KEY_LEN, SecretKey};
    use crate::metadata::SqliteMetadataStore;
    use crate::storage::memory::MemoryObjectStore;

    /// A service wired to in-memory collaborators, plus handles on them.
    pub struct Harness {
        pub service: FileService,
        pub primary: MemoryObjectStore,
        pub backup: MemoryObjectStore,
    }

    pub fn test_codec() -> EnvelopeCodec {
        EnvelopeCodec::new(SecretKey::from_bytes([0x42u8; KEY_LEN]))
    }

    pub async fn harness(transfer: Option<Arc<dyn TransferClient>>) -> Harness {
        let metadata = SqliteMetadataStore::in_memory().await.unwrap();
        let primary = MemoryObjectStore::new();
        let backup = MemoryObjectStore::new();
        let service = FileService::new(
            test_codec(),
            Arc::new(metadata),
            Arc::new(primary.clone()),
            Arc::new(backup.clone()),
            transfer,
        );
        Harness {
            service,
            primary,
            backup,
        }
    }
}
