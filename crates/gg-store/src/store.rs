use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;

use crate::error::StoreError;

/// An archive committed to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArtifact {
  pub name: String,
  pub version: String,

  /// `{root}/{name}/{version}`
  pub dir: PathBuf,

  /// Archive file name inside `dir`.
  pub file_name: String,

  /// Lowercase hex SHA-256 of the archive, as written to the sidecar.
  pub digest: String,
}

impl StoredArtifact {
  /// Full path to the archive.
  pub fn archive_path(&self) -> PathBuf {
    self.dir.join(&self.file_name)
  }
}

/// One artifact name and the versions stored under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
  pub name: String,
  pub versions: Vec<String>,
}

/// Durable storage for uploaded archives.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
  /// Write `source` as `{name}/{version}/{file_name}` plus its sidecar,
  /// replacing whatever was stored for `(name, version)` before.
  async fn commit(
    &self,
    name: &str,
    version: &str,
    source: &Path,
    file_name: &str,
  ) -> Result<StoredArtifact, StoreError>;

  /// Read the digest stored alongside an archive.
  async fn read_sidecar(&self, archive_path: &Path) -> Result<String, StoreError>;

  /// List artifacts whose name matches `filter` (case-insensitive pattern,
  /// empty matches all), with their versions.
  async fn list(&self, filter: &str) -> Result<Vec<ArtifactSummary>, StoreError>;
}
