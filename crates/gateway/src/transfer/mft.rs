//! HTTP multipart client for the MFT inbox.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::AUTHORIZATION, multipart};
use tracing::debug;

use super::{TransferClient, TransferError};

/// Posts envelopes as a `file` multipart part with a static Basic credential.
///
/// Any HTTP status counts as delivered; only transport failures and timeouts
/// are errors.
#[derive(Clone)]
pub struct MftClient {
    http: reqwest::Client,
    endpoint: String,
    basic_auth: String,
}

impl MftClient {
    /// Build a client for `endpoint`.
    ///
    /// `basic_auth` is the already base64-encoded `username:password`.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Setup`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        basic_auth: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransferError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gateway/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TransferError::Setup(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            basic_auth: basic_auth.into(),
        })
    }
}

impl std::fmt::Debug for MftClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MftClient")
            .field("endpoint", &self.endpoint)
            .field("basic_auth", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TransferClient for MftClient {
    async fn send(&self, filename: &str, body: Bytes) -> Result<(), TransferError> {
        let part = multipart::Part::bytes(body.to_vec()).file_name(filename.to_owned());
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Basic {}", self.basic_auth))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransferError::Request(e.to_string()))?;

        debug!(filename, status = %resp.status(), "MFT responded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Multipart, State},
        http::{HeaderMap, StatusCode},
        routing::post,
        Router,
    };
    use tokio::sync::mpsc;

    type Received = (Option<String>, Option<String>, Vec<u8>);

    async fn inbox(
        State(tx): State<mpsc::UnboundedSender<Received>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() == Some("file") {
                let name = field.file_name().map(str::to_owned);
                let data = field.bytes().await.unwrap().to_vec();
                let _ = tx.send((auth.clone(), name, data));
            }
        }
        // Non-2xx on purpose: the client must still treat this as delivered.
        StatusCode::SERVICE_UNAVAILABLE
    }

    async fn spawn_inbox() -> (String, mpsc::UnboundedReceiver<Received>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route("/inbox/", post(inbox)).with_state(tx);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/inbox/"), rx)
    }

    #[tokio::test]
    async fn posts_multipart_with_basic_auth() {
        let (endpoint, mut rx) = spawn_inbox().await;
        let client = MftClient::new(endpoint, "dTpw", Duration::from_secs(5)).unwrap();

        client
            .send("1234.enc", Bytes::from_static(b"\x00\x01envelope"))
            .await
            .unwrap();

        let (auth, name, data) = rx.recv().await.unwrap();
        assert_eq!(auth.as_deref(), Some("Basic dTpw"));
        assert_eq!(name.as_deref(), Some("1234.enc"));
        assert_eq!(data, b"\x00\x01envelope");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            MftClient::new(format!("http://{addr}/"), "dTpw", Duration::from_secs(2)).unwrap();
        let err = client.send("x.enc", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, TransferError::Request(_)));
    }

    #[test]
    fn debug_redacts_credential() {
        let client = MftClient::new("http://mft/", "c2VjcmV0OnB3", Duration::from_secs(1)).unwrap();
        assert!(!format!("{client:?}").contains("c2VjcmV0OnB3"));
    }
}
