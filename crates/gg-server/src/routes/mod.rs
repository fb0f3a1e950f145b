//! # Route Modules
//!
//! - `POST /upload` ([`upload`]): multipart upload of one archive
//! - `GET  /query` ([`artifacts::query`]): artifact names with their versions
//! - `GET  /download` ([`artifacts::download`]): raw archive bytes
//! - `GET  /check` ([`artifacts::check`]): recorded SHA-256 of an archive

pub mod artifacts;
pub mod upload;

use axum::Router;
use axum::routing::{get, post};

use crate::AppState;

/// All routes, without middleware.
pub fn router() -> Router<AppState> {
  Router::new()
    .route("/upload", post(upload::upload))
    .route("/query", get(artifacts::query))
    .route("/download", get(artifacts::download))
    .route("/check", get(artifacts::check))
}
