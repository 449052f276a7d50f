//! SQLite-backed [`MetadataStore`].

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use super::{FileRecord, MetadataError, MetadataStore};

const CREATE_FILES_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS files (
    id           TEXT PRIMARY KEY NOT NULL,
    filename     TEXT NOT NULL,
    storage_path TEXT NOT NULL,
    checksum     TEXT NOT NULL,
    created_at   TEXT NOT NULL
)";

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_files_created_at ON files (created_at)";

/// Metadata store handle. Cheap to clone (pooled connections internally).
#[derive(Clone, Debug)]
pub struct SqliteMetadataStore {
    pool: SqlitePool,
}

impl SqliteMetadataStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Database`] if the file cannot be opened or the
    /// schema cannot be created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let store = Self { pool };
        store.migrate().await?;
        info!(path = %path.display(), "metadata store opened");
        Ok(store)
    }

    /// A private in-memory database, used by tests.
    ///
    /// Every connection to `:memory:` is a separate database, so the pool is
    /// pinned to a single connection that never expires.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, MetadataError> {
        use std::str::FromStr;

        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), MetadataError> {
        sqlx::query(CREATE_FILES_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_CREATED_AT_INDEX)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn insert(&self, record: &FileRecord) -> Result<(), MetadataError> {
        let result = sqlx::query(
            "INSERT INTO files (id, filename, storage_path, checksum, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.filename)
        .bind(&record.storage_path)
        .bind(&record.checksum)
        .bind(record.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(MetadataError::Duplicate(record.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, id: &str) -> Result<Option<FileRecord>, MetadataError> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, storage_path, checksum, created_at FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<FileRecord>, MetadataError> {
        let records = sqlx::query_as::<_, FileRecord>(
            "SELECT id, filename, storage_path, checksum, created_at FROM files \
             ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn delete(&self, id: &str) -> Result<bool, MetadataError> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), MetadataError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
