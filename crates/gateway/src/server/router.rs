//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use super::{handlers, middleware::Limits, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, limits: Limits) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/list", get(handlers::list))
        .route(
            "/files/:id",
            get(handlers::download).delete(handlers::delete),
        )
        .route("/files-backup/:id", get(handlers::download_backup))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(limits.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(limits.request_timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::testing::harness;
    use axum_test::TestServer;
    use common::protocol::HealthResponse;

    async fn server() -> TestServer {
        let h = harness(None).await;
        TestServer::new(build(AppState::new(h.service), Limits::default())).unwrap()
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = server().await;
        let resp = server.get("/unknown").expect_failure().await;
        resp.assert_status_not_found();
    }

    #[tokio::test]
    async fn root_reports_ok() {
        let server = server().await;
        let resp = server.get("/").await;
        resp.assert_status_ok();
        let body: HealthResponse = resp.json();
        assert_eq!(body.status, "ok");
        assert!(body.metadata_ready.is_none());
    }

    #[tokio::test]
    async fn health_pings_metadata() {
        let server = server().await;
        let resp = server.get("/health").await;
        resp.assert_status_ok();
        let body: HealthResponse = resp.json();
        assert_eq!(body.metadata_ready, Some(true));
    }

    #[tokio::test]
    async fn list_starts_empty() {
        let server = server().await;
        let resp = server.get("/list").await;
        resp.assert_status_ok();
        let rows: Vec<serde_json::Value> = resp.json();
        assert!(rows.is_empty());
    }
}
