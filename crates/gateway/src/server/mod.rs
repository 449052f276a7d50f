//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Translate multipart uploads and path parameters into [`crate::files`] calls.
//! - Map domain errors to JSON error bodies.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
