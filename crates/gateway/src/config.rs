//! Configuration loading and validation for the gateway service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::crypto::SecretKey;

/// Validated gateway configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 32-byte file encryption key. **Required.**
    pub secret_key_hex: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Filesystem path of the SQLite metadata database. Created if missing.
    #[serde(default = "default_metadata_db_path")]
    pub metadata_db_path: String,

    /// AWS region of both buckets.
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Endpoint override for S3-compatible stores (MinIO, LocalStack).
    #[serde(default)]
    pub s3_endpoint_url: Option<String>,

    /// Bucket that receives uploads and serves `GET /files/{id}`.
    #[serde(default = "default_primary_bucket")]
    pub primary_bucket: String,

    /// Bucket that serves `GET /files-backup/{id}`.
    #[serde(default = "default_backup_bucket")]
    pub backup_bucket: String,

    /// MFT endpoint receiving a best-effort copy of every envelope.
    /// Transfers are disabled when unset.
    #[serde(default)]
    pub mft_endpoint: Option<String>,

    /// Base64 of `username:password` for the MFT endpoint.
    #[serde(default)]
    pub mft_basic_auth: Option<String>,

    /// Upper bound on a single MFT transfer.
    #[serde(default = "default_mft_timeout")]
    pub mft_timeout_secs: u64,

    /// Per-request timeout applied by the router.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// OTLP endpoint for trace export. Logs only when unset.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    3000
}
fn default_metadata_db_path() -> String {
    "encrypted_storage.db".into()
}
fn default_aws_region() -> String {
    "ap-south-1".into()
}
fn default_primary_bucket() -> String {
    "file-store-vq".into()
}
fn default_backup_bucket() -> String {
    "file-store-wm-2".into()
}
fn default_mft_timeout() -> u64 {
    10
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Parse the configured key.
    ///
    /// # Errors
    ///
    /// Returns an error if `SECRET_KEY_HEX` is missing or malformed.
    pub fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_hex(&self.secret_key_hex).context("SECRET_KEY_HEX is missing or invalid")
    }

    /// The MFT endpoint and credential, when transfers are enabled.
    pub fn mft(&self) -> Option<(&str, &str)> {
        match (&self.mft_endpoint, &self.mft_basic_auth) {
            (Some(endpoint), Some(auth)) => Some((endpoint.as_str(), auth.as_str())),
            _ => None,
        }
    }

    pub fn mft_timeout(&self) -> Duration {
        Duration::from_secs(self.mft_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        self.secret_key()?;
        ensure_non_empty(&self.metadata_db_path, "METADATA_DB_PATH")?;
        ensure_non_empty(&self.aws_region, "AWS_REGION")?;
        ensure_non_empty(&self.primary_bucket, "PRIMARY_BUCKET")?;
        ensure_non_empty(&self.backup_bucket, "BACKUP_BUCKET")?;

        if let Some(endpoint) = &self.mft_endpoint {
            ensure_non_empty(endpoint, "MFT_ENDPOINT")?;
            let auth = self
                .mft_basic_auth
                .as_deref()
                .context("MFT_BASIC_AUTH is required when MFT_ENDPOINT is set")?;
            validate_basic_auth(auth)?;
        }
        if self.mft_timeout_secs == 0 {
            anyhow::bail!("MFT_TIMEOUT_SECS must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be > 0");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key_hex", &"[REDACTED]")
            .field("port", &self.port)
            .field("metadata_db_path", &self.metadata_db_path)
            .field("aws_region", &self.aws_region)
            .field("s3_endpoint_url", &self.s3_endpoint_url)
            .field("primary_bucket", &self.primary_bucket)
            .field("backup_bucket", &self.backup_bucket)
            .field("mft_endpoint", &self.mft_endpoint)
            .field("mft_basic_auth", &self.mft_basic_auth.as_ref().map(|_| "[REDACTED]"))
            .field("mft_timeout_secs", &self.mft_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

/// The credential is sent verbatim, so check it already is `base64(user:password)`.
fn validate_basic_auth(value: &str) -> Result<()> {
    let decoded = STANDARD
        .decode(value.trim())
        .context("MFT_BASIC_AUTH must be base64-encoded")?;
    if !decoded.contains(&b':') {
        anyhow::bail!("MFT_BASIC_AUTH must encode `username:password`");
    }
    Ok(())
}
