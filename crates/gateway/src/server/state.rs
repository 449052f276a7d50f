//! Shared application state injected into every Axum handler.

use crate::files::FileService;

/// Application state shared across all request handlers.
///
/// Cheap to clone: [`FileService`] holds `Arc`s and the expanded AES key schedule.
#[derive(Clone)]
pub struct AppState {
    pub files: FileService,
}

impl AppState {
    pub fn new(files: FileService) -> Self {
        Self { files }
    }
}
