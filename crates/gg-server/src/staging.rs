//! Staged uploads.
//!
//! Each upload is written into its own temporary directory, which the
//! ingestion pipeline then unpacks into. The directory is removed when the
//! [`StagedUpload`] is dropped, whichever way the request ends.

use std::path::Path;

use axum::extract::Multipart;
use gg_ingest::is_accepted_upload;
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::AppError;

/// Multipart field carrying the archive.
pub const UPLOAD_FIELD: &str = "file";

/// An uploaded archive saved to a scoped staging directory.
#[derive(Debug)]
pub struct StagedUpload {
  dir: TempDir,
  file_name: String,
}

impl StagedUpload {
  /// Read the `file` field out of `multipart` into a fresh staging directory.
  ///
  /// The client's file name is reduced to its last path component and must
  /// carry an accepted archive suffix before anything touches the disk.
  pub async fn receive(multipart: &mut Multipart) -> Result<Self, AppError> {
    while let Some(mut field) = multipart.next_field().await? {
      if field.name() != Some(UPLOAD_FIELD) {
        debug!(field = ?field.name(), "skipping_multipart_field");
        continue;
      }

      let file_name = field
        .file_name()
        .map(base_name)
        .filter(|name| !name.is_empty())
        .ok_or(AppError::MissingFile("the file field has no file name"))?
        .to_string();

      if !is_accepted_upload(&file_name) {
        return Err(AppError::UnsupportedType { file_name });
      }

      let dir = tempfile::Builder::new()
        .prefix("gg-upload-")
        .tempdir()
        .map_err(AppError::Staging)?;
      let path = dir.path().join(&file_name);
      let mut file = File::create(&path).await.map_err(AppError::Staging)?;

      let mut size = 0u64;
      while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await.map_err(AppError::Staging)?;
        size += chunk.len() as u64;
      }
      file.flush().await.map_err(AppError::Staging)?;

      info!(file_name = %file_name, size, staged_dir = %dir.path().display(), "upload_staged");
      return Ok(Self { dir, file_name });
    }

    Err(AppError::MissingFile("no file field in the request"))
  }

  /// Directory holding the upload.
  pub fn dir(&self) -> &Path {
    self.dir.path()
  }

  /// Upload file name, without any client-side directories.
  pub fn file_name(&self) -> &str {
    &self.file_name
  }
}

/// Last component of a client supplied path, for either separator.
fn base_name(raw: &str) -> &str {
  raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}
