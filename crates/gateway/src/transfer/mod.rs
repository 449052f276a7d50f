//! Best-effort copy of each envelope to the external MFT endpoint.
//!
//! # Delivery semantics
//!
//! At most once, never retried, never awaited by the request that triggered
//! it. [`dispatch`] detaches the send onto the Tokio runtime; its outcome only
//! reaches the log.

pub mod mft;

pub use mft::MftClient;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from a transfer attempt.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The HTTP client could not be constructed.
    #[error("transfer client setup failed: {0}")]
    Setup(String),

    /// The request could not be sent or timed out.
    #[error("transfer request failed: {0}")]
    Request(String),
}

/// Sends one named blob to an external receiver.
#[async_trait]
pub trait TransferClient: Send + Sync {
    async fn send(&self, filename: &str, body: Bytes) -> Result<(), TransferError>;
}

/// Spawn a detached send of `body` under `filename`.
///
/// Returns immediately. The returned handle exists for tests; production
/// callers drop it.
pub fn dispatch(
    client: Arc<dyn TransferClient>,
    filename: String,
    body: Bytes,
) -> tokio::task::JoinHandle<()> {
    info!(filename = %filename, bytes = body.len(), "dispatching MFT transfer");
    tokio::spawn(async move {
        match client.send(&filename, body).await {
            Ok(()) => info!(filename = %filename, "MFT transfer completed"),
            Err(e) => warn!(filename = %filename, error = %e, "MFT transfer failed; ignored"),
        }
    })
}
