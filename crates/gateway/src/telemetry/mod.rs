//! Structured logging and optional OTLP trace export.
//!
//! Logs are JSON lines on stdout. Spans are additionally exported over
//! OTLP/gRPC when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
//!
//! # Telemetry invariants
//!
//! - **No plaintext, key material or MFT credentials** in any span attribute
//!   or log field. File ids, sizes and bucket names are fine.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   overrides it when set.

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
