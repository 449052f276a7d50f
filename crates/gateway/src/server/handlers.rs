//! Axum request handlers for all service endpoints.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{DeleteResponse, ErrorResponse, FileSummary, HealthResponse, UploadResponse};
use common::ServiceError;
use tracing::{info, warn};

use super::state::AppState;
use crate::files::Source;

/// Multipart field that carries the upload.
const FILE_FIELD: &str = "file";

/// Filename recorded when the part carries none.
const DEFAULT_FILENAME: &str = "upload.bin";

/// `GET /` — liveness.
pub async fn root() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        metadata_ready: None,
    })
}

/// `GET /health` — readiness check.
///
/// Returns `200 OK` when the metadata database answers a ping and
/// `503 Service Unavailable` otherwise. Buckets are not checked.
pub async fn health(State(state): State<AppState>) -> Response {
    let metadata_ready = state.files.metadata_ready().await;
    let (status_code, status_str) = if metadata_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    let body = HealthResponse {
        status: status_str.into(),
        metadata_ready: Some(metadata_ready),
    };
    (status_code, Json(body)).into_response()
}

/// `POST /upload` — encrypt and store the multipart field `file`.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            let err = ErrorResponse::new("bad_request", rejection.body_text());
            return (rejection.status(), Json(err)).into_response();
        }
    };

    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(FILE_FIELD) {
                    continue;
                }
                let filename = field.file_name().unwrap_or(DEFAULT_FILENAME).to_owned();
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((filename, bytes));
                        break;
                    }
                    Err(e) => return multipart_error(e),
                }
            }
            Ok(None) => break,
            Err(e) => return multipart_error(e),
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(ServiceError::BadRequest("file required".into()));
    };

    info!(bytes = bytes.len(), "upload received");
    match state.files.upload(&filename, &bytes).await {
        Ok(record) => {
            let body = UploadResponse {
                id: record.id,
                filename: record.filename,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "upload failed");
            error_response(e.into())
        }
    }
}

/// `GET /files/{id}` — download from the primary bucket.
pub async fn download(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    serve_download(&state, &id, Source::Primary).await
}

/// `GET /files-backup/{id}` — download from the backup bucket.
///
/// A manual alternate path: the primary endpoint never falls back to it.
pub async fn download_backup(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    serve_download(&state, &id, Source::Backup).await
}

async fn serve_download(state: &AppState, id: &str, source: Source) -> Response {
    info!(id, ?source, "download requested");
    match state.files.download(id, source).await {
        Ok(download) => (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/octet-stream"),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&download.filename),
                ),
            ],
            download.plaintext,
        )
            .into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// `GET /list` — all files, newest first.
pub async fn list(State(state): State<AppState>) -> Response {
    match state.files.list().await {
        Ok(records) => {
            let rows: Vec<FileSummary> = records
                .into_iter()
                .map(|r| FileSummary {
                    id: r.id,
                    filename: r.filename,
                    created_at: r.created_at,
                })
                .collect();
            (StatusCode::OK, Json(rows)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "list failed");
            error_response(e.into())
        }
    }
}

/// `DELETE /files/{id}` — remove the metadata record.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    info!(id = %id, "delete requested");
    match state.files.delete(&id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResponse::deleted())).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(&err))).into_response()
}

/// Covers malformed bodies and the body limit (413).
fn multipart_error(e: MultipartError) -> Response {
    let err = ErrorResponse::new("bad_request", e.body_text());
    (e.status(), Json(err)).into_response()
}

/// `attachment; filename="..."` with anything outside printable ASCII, and
/// the characters that would break the quoted string, replaced by `_`.
fn content_disposition(filename: &str) -> HeaderValue {
    let safe: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
