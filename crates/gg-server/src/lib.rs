//! # gg-server: HTTP transport
//!
//! Axum router exposing the store to clients:
//!
//! - `POST /upload` stages a multipart upload and ingests it
//! - `GET /query?name=` lists artifacts with their versions
//! - `GET /download?name=&version=` streams an archive
//! - `GET /check?name=&version=` returns an archive's SHA-256
//!
//! JSON responses use the [`Envelope`] shape and always carry HTTP 200;
//! failures are reported through the envelope's `status`.
//!
//! ## Middleware Stack (Tower)
//!
//! TraceLayer → DefaultBodyLimit

pub mod envelope;
pub mod error;
pub mod routes;
pub mod staging;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use envelope::Envelope;
pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Build the application router.
pub fn app(state: AppState) -> Router {
  let body_limit = DefaultBodyLimit::max(state.config().max_upload_bytes);
  routes::router()
    .layer(body_limit)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Serve `state` on `listener` until `shutdown` is cancelled.
pub async fn serve(
  listener: TcpListener,
  state: AppState,
  shutdown: CancellationToken,
) -> std::io::Result<()> {
  let addr = listener.local_addr()?;
  info!(%addr, root = %state.store().root().display(), "server_listening");
  axum::serve(listener, app(state))
    .with_graceful_shutdown(shutdown.cancelled_owned())
    .await
}
