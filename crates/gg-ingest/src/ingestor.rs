use std::path::Path;

use gg_manifest::Manifest;
use gg_store::{ArtifactStore, StoredArtifact, validate_segment};
use tracing::{debug, info, instrument, warn};

use crate::archive::{self, ArchiveFormat};
use crate::error::IngestError;

/// Runs uploads through unpack, manifest validation and commit.
pub struct Ingestor<S: ArtifactStore> {
  store: S,
}

impl<S: ArtifactStore> Ingestor<S> {
  /// Create an ingestor committing into `store`.
  pub fn new(store: S) -> Self {
    Self { store }
  }

  /// The store uploads are committed to.
  pub fn store(&self) -> &S {
    &self.store
  }

  /// Ingest the archive `staged_dir/file_name`.
  ///
  /// The archive is extracted into `staged_dir` itself, so the caller must
  /// hand over a directory holding nothing but the upload.
  #[instrument(name = "ingest", skip(self, staged_dir), fields(staged_dir = %staged_dir.display()))]
  pub async fn ingest(
    &self,
    staged_dir: &Path,
    file_name: &str,
  ) -> Result<StoredArtifact, IngestError> {
    validate_segment("file_name", file_name)?;
    let archive_path = staged_dir.join(file_name);

    let format = self.unpack(&archive_path, staged_dir, file_name).await?;
    debug!(?format, "archive_unpacked");

    let manifest = Manifest::load(staged_dir).await.inspect_err(|e| {
      warn!(file_name, error = %e, "manifest_rejected");
    })?;

    let stored = self
      .store
      .commit(&manifest.name, &manifest.version, &archive_path, file_name)
      .await?;

    info!(
      name = %stored.name,
      version = %stored.version,
      file_name = %stored.file_name,
      "upload_ingested"
    );
    Ok(stored)
  }

  async fn unpack(
    &self,
    archive_path: &Path,
    dest: &Path,
    file_name: &str,
  ) -> Result<ArchiveFormat, IngestError> {
    let archive_path = archive_path.to_path_buf();
    let dest = dest.to_path_buf();

    let result = tokio::task::spawn_blocking(move || archive::unpack(&archive_path, &dest))
      .await
      .map_err(|e| IngestError::Worker {
        message: e.to_string(),
      })?;

    result.map_err(|source| {
      warn!(file_name, error = %source, "unpack_failed");
      IngestError::UnpackFailed {
        file_name: file_name.to_string(),
        source,
      }
    })
  }
}
