//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Integrity`] → 500
/// - [`ServiceError::Storage`] → 500
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed — missing multipart field or unreadable body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No metadata record exists for the requested file id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Stored bytes failed the checksum or AEAD tag check.
    ///
    /// Never retried and never repaired: corruption is not transient.
    #[error("integrity failure: {0}")]
    Integrity(String),

    /// Object storage could not be read or written.
    #[error("storage failure: {0}")]
    Storage(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Integrity(_) => 500,
            ServiceError::Storage(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the `code` field of error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Integrity(_) => "integrity_error",
            ServiceError::Storage(_) => "storage_error",
            ServiceError::Internal(_) => "internal_error",
        }
    }

    /// Message that is safe to return to callers.
    ///
    /// Storage and internal failures are collapsed to a generic message so
    /// bucket names and SQL errors stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::BadRequest(m) | ServiceError::NotFound(m) => m.clone(),
            ServiceError::Integrity(_) => "checksum or authentication tag mismatch".into(),
            ServiceError::Storage(_) => "read error".into(),
            ServiceError::Internal(_) => "internal error".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
        assert_eq!(ServiceError::Integrity("x".into()).http_status(), 500);
        assert_eq!(ServiceError::Storage("x".into()).http_status(), 500);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_distinct_for_integrity_and_storage() {
        assert_eq!(ServiceError::Integrity("x".into()).code(), "integrity_error");
        assert_eq!(ServiceError::Storage("x".into()).code(), "storage_error");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("file required".into());
        assert!(e.to_string().contains("file required"));
    }

    #[test]
    fn public_message_hides_backend_detail() {
        let e = ServiceError::Storage("bucket file-store-vq: access denied".into());
        assert_eq!(e.public_message(), "read error");
        let e = ServiceError::Internal("UNIQUE constraint failed: files.id".into());
        assert!(!e.public_message().contains("UNIQUE"));
    }
}
