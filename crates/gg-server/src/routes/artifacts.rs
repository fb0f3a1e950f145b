//! Read-side routes: `GET /query`, `GET /download`, `GET /check`.

use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use gg_store::{ArtifactStore, ArtifactSummary, StoreError};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::info;

use crate::envelope::Envelope;
use crate::error::AppError;
use crate::AppState;

/// Query string of `/query`.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
  /// Case-insensitive name filter; empty lists everything.
  #[serde(default)]
  pub name: String,
}

/// Query string of `/download` and `/check`.
#[derive(Debug, Default, Deserialize)]
pub struct ArtifactParams {
  #[serde(default)]
  pub name: String,

  /// Exact version; absent or empty means latest.
  pub version: Option<String>,
}

pub async fn query(
  State(state): State<AppState>,
  Query(params): Query<QueryParams>,
) -> Result<Json<Envelope<Vec<ArtifactSummary>>>, AppError> {
  let artifacts = state.store().list(&params.name).await?;
  Ok(Json(Envelope::ok(artifacts)))
}

/// Stream the resolved archive as an attachment.
pub async fn download(
  State(state): State<AppState>,
  Query(params): Query<ArtifactParams>,
) -> Result<Response, AppError> {
  let resolved = state
    .resolver()
    .resolve(&params.name, params.version.as_deref())
    .await?;

  let path = resolved.path();
  let file = tokio::fs::File::open(&path)
    .await
    .map_err(|source| StoreError::Io {
      path: path.clone(),
      source,
    })?;

  info!(
    name = %resolved.name,
    version = %resolved.version,
    file_name = %resolved.file_name,
    "artifact_download"
  );

  let headers = [
    (header::CONTENT_TYPE, "application/octet-stream".to_string()),
    (
      header::CONTENT_DISPOSITION,
      format!("attachment; filename={}", resolved.file_name),
    ),
  ];
  Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

/// Report the recorded SHA-256 of the resolved archive.
pub async fn check(
  State(state): State<AppState>,
  Query(params): Query<ArtifactParams>,
) -> Result<Json<Envelope<String>>, AppError> {
  let resolved = state
    .resolver()
    .resolve(&params.name, params.version.as_deref())
    .await?;
  let digest = state.store().read_sidecar(&resolved.path()).await?;
  Ok(Json(Envelope::ok(digest)))
}
