//! # Application Error
//!
//! Maps pipeline and store errors onto the response envelope.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use gg_ingest::IngestError;
use gg_manifest::ManifestError;
use gg_store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::{Envelope, STATUS_BAD_REQUEST, STATUS_SERVER_ERROR};

/// Application-level error type that maps to envelope responses.
#[derive(Error, Debug)]
pub enum AppError {
  /// The multipart body could not be read.
  #[error("upload failed: {0}")]
  Multipart(#[from] MultipartError),

  /// The multipart body has no usable `file` field.
  #[error("upload failed: {0}")]
  MissingFile(&'static str),

  /// The uploaded file name has no accepted archive suffix.
  #[error("unsupported upload type '{file_name}': only .zip, .tar.gz and .tar are accepted")]
  UnsupportedType { file_name: String },

  /// Writing the upload to its staging directory failed.
  #[error("failed to stage upload: {0}")]
  Staging(#[source] std::io::Error),

  /// Ingestion rejected or failed the upload.
  #[error(transparent)]
  Ingest(#[from] IngestError),

  /// A store read failed.
  #[error(transparent)]
  Store(#[from] StoreError),
}

impl AppError {
  /// Envelope status for this error.
  pub fn status(&self) -> u16 {
    match self {
      Self::Multipart(_) | Self::MissingFile(_) | Self::UnsupportedType { .. } => {
        STATUS_BAD_REQUEST
      }
      Self::Staging(_) => STATUS_SERVER_ERROR,
      Self::Ingest(e) => ingest_status(e),
      Self::Store(e) => store_status(e),
    }
  }
}

fn ingest_status(err: &IngestError) -> u16 {
  match err {
    IngestError::UnpackFailed { .. } => STATUS_BAD_REQUEST,
    IngestError::Manifest(ManifestError::Io { .. }) => STATUS_SERVER_ERROR,
    IngestError::Manifest(_) => STATUS_BAD_REQUEST,
    IngestError::Store(e) => store_status(e),
    IngestError::Worker { .. } => STATUS_SERVER_ERROR,
  }
}

fn store_status(err: &StoreError) -> u16 {
  match err {
    StoreError::Io { .. } => STATUS_SERVER_ERROR,
    StoreError::NotFound { .. }
    | StoreError::SidecarNotFound { .. }
    | StoreError::InvalidKey { .. } => STATUS_BAD_REQUEST,
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = self.to_string();
    if status == STATUS_SERVER_ERROR {
      error!(error = %message, "request_failed");
    } else {
      warn!(error = %message, "request_rejected");
    }
    Json(Envelope::fail(status, message)).into_response()
  }
}
