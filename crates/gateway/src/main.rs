//! `gateway` — encrypted file gateway entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (JSON logs, optional OTLP).
//! 3. Build the envelope codec from `SECRET_KEY_HEX`.
//! 4. Initialise the S3 client and the primary/backup bucket stores.
//! 5. Open the SQLite metadata store.
//! 6. Build the MFT client when `MFT_ENDPOINT` is set.
//! 7. Build the Axum router and serve until ctrl-c.

mod aws;
mod config;
mod crypto;
mod files;
mod metadata;
mod server;
mod storage;
mod telemetry;
mod transfer;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use config::Config;
use crypto::EnvelopeCodec;
use files::FileService;
use metadata::{MetadataStore, SqliteMetadataStore};
use server::{middleware::Limits, state::AppState};
use storage::{ObjectStore, S3ObjectStore};
use transfer::{MftClient, TransferClient};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    // Telemetry is not yet up; the error reaches stderr through `main`'s return.
    let cfg = Config::from_env().context("configuration invalid")?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otel_exporter_otlp_endpoint.as_deref(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        "gateway starting"
    );

    // -----------------------------------------------------------------------
    // 3. Envelope codec
    // -----------------------------------------------------------------------
    let codec = EnvelopeCodec::new(cfg.secret_key()?);

    // -----------------------------------------------------------------------
    // 4. Buckets
    // -----------------------------------------------------------------------
    let aws = aws::AwsClients::init(&cfg.aws_region, cfg.s3_endpoint_url.as_deref()).await;
    let primary = S3ObjectStore::new(aws.s3.clone(), &cfg.primary_bucket);
    let backup = S3ObjectStore::new(aws.s3.clone(), &cfg.backup_bucket);
    info!(
        primary = primary.bucket(),
        backup = backup.bucket(),
        region = %cfg.aws_region,
        "object storage configured"
    );
    let primary: Arc<dyn ObjectStore> = Arc::new(primary);
    let backup: Arc<dyn ObjectStore> = Arc::new(backup);

    // -----------------------------------------------------------------------
    // 5. Metadata
    // -----------------------------------------------------------------------
    let metadata: Arc<dyn MetadataStore> = Arc::new(
        SqliteMetadataStore::open(&cfg.metadata_db_path)
            .await
            .with_context(|| format!("failed to open metadata db at {}", cfg.metadata_db_path))?,
    );

    // -----------------------------------------------------------------------
    // 6. MFT transfer
    // -----------------------------------------------------------------------
    let transfer: Option<Arc<dyn TransferClient>> = match cfg.mft() {
        Some((endpoint, auth)) => {
            info!(endpoint, "mft transfer enabled");
            Some(Arc::new(MftClient::new(endpoint, auth, cfg.mft_timeout())?))
        }
        None => {
            warn!("MFT_ENDPOINT not set; mft transfer disabled");
            None
        }
    };

    // -----------------------------------------------------------------------
    // 7. HTTP server
    // -----------------------------------------------------------------------
    let files = FileService::new(codec, metadata, primary, backup, transfer);
    let limits = Limits {
        request_timeout: cfg.request_timeout(),
        max_upload_bytes: cfg.max_upload_bytes,
    };
    let router = server::router::build(AppState::new(files), limits);

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    telemetry::shutdown_telemetry();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!("shutdown requested");
}
