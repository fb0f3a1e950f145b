//! `POST /upload`

use axum::Json;
use axum::extract::{Multipart, State};

use crate::envelope::Envelope;
use crate::error::AppError;
use crate::staging::StagedUpload;
use crate::AppState;

/// Stage the `file` field and run it through ingestion.
///
/// The staging directory is dropped, and removed, before the response is
/// written.
pub async fn upload(
  State(state): State<AppState>,
  mut multipart: Multipart,
) -> Result<Json<Envelope>, AppError> {
  let staged = StagedUpload::receive(&mut multipart).await?;
  state
    .ingestor()
    .ingest(staged.dir(), staged.file_name())
    .await?;
  Ok(Json(Envelope::ok_empty()))
}
