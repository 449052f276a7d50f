//! Request and response types exchanged over the public HTTP API.
//!
//! All bodies are JSON except file downloads, which are raw bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Upload endpoint
// ---------------------------------------------------------------------------

/// Successful response body for `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Identifier assigned to the stored file.
    pub id: String,
    /// Original filename as supplied in the multipart part.
    pub filename: String,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// One entry in the `GET /list` response array.
///
/// Storage path and checksum are internal and deliberately not exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Delete endpoint
// ---------------------------------------------------------------------------

/// Successful response body for `DELETE /files/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    /// The confirmation returned after a record is removed.
    pub fn deleted() -> Self {
        Self {
            message: "File deleted successfully".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.public_message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /` and `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether the metadata database answered a ping. Absent on `GET /`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_ready: Option<bool>,
}
