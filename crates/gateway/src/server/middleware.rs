//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, response compression,
//! permissive CORS and the upload body limit.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum request body accepted by `POST /upload`.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Router-level limits, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        }
    }
}
