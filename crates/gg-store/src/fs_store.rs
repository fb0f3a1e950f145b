use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gg_fs::ListFilter;
use tokio::fs;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{ReplaceMode, StoreConfig};
use crate::error::StoreError;
use crate::layout::{archive_pattern, is_hidden, validate_segment, visible_subdirs};
use crate::resolver::VersionResolver;
use crate::sidecar::{read_sidecar, write_sidecar};
use crate::store::{ArtifactStore, ArtifactSummary, StoredArtifact};

/// Filesystem-backed artifact store.
///
/// See the crate docs for the on-disk layout.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
  config: StoreConfig,
}

impl FsArtifactStore {
  /// Create a store from `config`. The root directory is created lazily on
  /// first commit.
  pub fn new(config: StoreConfig) -> Self {
    Self { config }
  }

  /// Root directory of the store.
  pub fn root(&self) -> &Path {
    &self.config.root
  }

  /// A resolver reading from this store's root.
  pub fn resolver(&self) -> VersionResolver {
    VersionResolver::new(&self.config.root)
  }

  fn version_dir(&self, name: &str, version: &str) -> PathBuf {
    self.config.root.join(name).join(version)
  }

  async fn replace_in_place(
    &self,
    target: &Path,
    source: &Path,
    file_name: &str,
  ) -> Result<String, StoreError> {
    remove_version(target).await?;

    fs::create_dir_all(target)
      .await
      .map_err(StoreError::io(target))?;

    populate(target, source, file_name).await
  }

  async fn replace_staged(
    &self,
    name: &str,
    version: &str,
    target: &Path,
    source: &Path,
    file_name: &str,
  ) -> Result<String, StoreError> {
    let artifact_dir = self.config.root.join(name);
    fs::create_dir_all(&artifact_dir)
      .await
      .map_err(StoreError::io(&artifact_dir))?;

    let staging = artifact_dir.join(format!(".{}.staging-{}", version, Uuid::new_v4()));
    fs::create_dir(&staging)
      .await
      .map_err(StoreError::io(&staging))?;

    let digest = match populate(&staging, source, file_name).await {
      Ok(digest) => digest,
      Err(e) => {
        discard_staging(&staging).await;
        return Err(e);
      }
    };

    swap_into_place(&staging, target).await?;
    Ok(digest)
  }
}

/// Remove a version directory. A missing directory is not an error.
async fn remove_version(target: &Path) -> Result<(), StoreError> {
  match fs::remove_dir_all(target).await {
    Ok(()) => {
      info!(target = %target.display(), "replaced_existing_version");
      Ok(())
    }
    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
    Err(source) => Err(StoreError::Io {
      path: target.to_path_buf(),
      source,
    }),
  }
}

/// Replace `target` with the fully populated `staging` directory. On failure
/// `staging` is removed as well.
async fn swap_into_place(staging: &Path, target: &Path) -> Result<(), StoreError> {
  let result = match remove_version(target).await {
    Ok(()) => fs::rename(staging, target)
      .await
      .map_err(StoreError::io(target)),
    Err(e) => Err(e),
  };
  if result.is_err() {
    discard_staging(staging).await;
  }
  result
}

async fn discard_staging(staging: &Path) {
  if let Err(e) = fs::remove_dir_all(staging).await {
    warn!(staging = %staging.display(), error = %e, "staging_cleanup_failed");
  }
}

/// Copy the archive into `dir` and write its sidecar.
async fn populate(dir: &Path, source: &Path, file_name: &str) -> Result<String, StoreError> {
  let archive = dir.join(file_name);
  gg_fs::copy_file(source, &archive)
    .await
    .map_err(StoreError::io(&archive))?;
  write_sidecar(&archive).await
}

fn reject_hidden(field: &'static str, value: &str) -> Result<(), StoreError> {
  if is_hidden(value) {
    return Err(StoreError::InvalidKey {
      field,
      value: value.to_string(),
      reason: "must not start with '.'",
    });
  }
  Ok(())
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
  #[instrument(name = "store_commit", skip(self, source))]
  async fn commit(
    &self,
    name: &str,
    version: &str,
    source: &Path,
    file_name: &str,
  ) -> Result<StoredArtifact, StoreError> {
    validate_segment("name", name)?;
    validate_segment("version", version)?;
    validate_segment("file_name", file_name)?;
    reject_hidden("name", name)?;
    reject_hidden("version", version)?;

    if !archive_pattern(name)?.is_match(file_name) {
      // Stored anyway; the resolver will not find it under `name`.
      warn!(name, file_name, "archive_name_mismatch");
    }

    let target = self.version_dir(name, version);
    let digest = match self.config.replace_mode {
      ReplaceMode::InPlace => self.replace_in_place(&target, source, file_name).await?,
      ReplaceMode::Staged => {
        self
          .replace_staged(name, version, &target, source, file_name)
          .await?
      }
    };

    info!(name, version, file_name, digest = %digest, "artifact_committed");

    Ok(StoredArtifact {
      name: name.to_string(),
      version: version.to_string(),
      dir: target,
      file_name: file_name.to_string(),
      digest,
    })
  }

  async fn read_sidecar(&self, archive_path: &Path) -> Result<String, StoreError> {
    read_sidecar(archive_path).await
  }

  async fn list(&self, filter: &str) -> Result<Vec<ArtifactSummary>, StoreError> {
    let filter = match ListFilter::pattern(filter) {
      Ok(filter) => filter,
      Err(e) => {
        warn!(filter, error = %e, "invalid_list_filter");
        return Ok(Vec::new());
      }
    };

    let names = visible_subdirs(&self.config.root, &filter).await?;
    let mut summaries = Vec::with_capacity(names.len());
    for name in names {
      let versions = visible_subdirs(&self.config.root.join(&name), &ListFilter::All).await?;
      summaries.push(ArtifactSummary { name, versions });
    }

    Ok(summaries)
  }
}
