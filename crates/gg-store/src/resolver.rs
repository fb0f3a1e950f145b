use std::path::{Path, PathBuf};

use gg_fs::ListFilter;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;
use crate::layout::{archive_pattern, visible_subdirs};
use crate::sidecar::read_sidecar;

/// A stored archive located by [`VersionResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedArtifact {
  pub name: String,

  /// The concrete version, also when "latest" was requested.
  pub version: String,

  /// `{root}/{name}/{version}`
  pub dir: PathBuf,

  /// Archive file name inside `dir`.
  pub file_name: String,
}

impl ResolvedArtifact {
  /// Full path to the archive.
  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.file_name)
  }
}

/// Maps `(name, version?)` queries onto the store layout.
///
/// Nothing is cached: every call lists the directories again.
#[derive(Debug, Clone)]
pub struct VersionResolver {
  root: PathBuf,
}

impl VersionResolver {
  /// Resolver over the store rooted at `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// Root directory of the store.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Versions stored for `name`, sorted lexicographically.
  pub async fn versions(&self, name: &str) -> Result<Vec<String>, StoreError> {
    let matches = visible_subdirs(&self.root, &ListFilter::exact(name)).await?;
    if matches.is_empty() {
      return Err(StoreError::NotFound {
        name: name.to_string(),
        version: None,
      });
    }
    visible_subdirs(&self.root.join(name), &ListFilter::All).await
  }

  /// Locate the archive for `name` at `version`.
  ///
  /// An absent or empty `version` selects the greatest version name in plain
  /// string order, so "2" is newer than "10". Within the version directory
  /// the first file name (sorted) matching `^<name>.*\.(zip|gz|tar)$` wins.
  pub async fn resolve(
    &self,
    name: &str,
    version: Option<&str>,
  ) -> Result<ResolvedArtifact, StoreError> {
    let version = version.filter(|v| !v.is_empty());
    let not_found = || StoreError::NotFound {
      name: name.to_string(),
      version: version.map(str::to_string),
    };

    let versions = match self.versions(name).await {
      Ok(versions) => versions,
      Err(StoreError::NotFound { .. }) => return Err(not_found()),
      Err(e) => return Err(e),
    };

    let selected = match version {
      Some(wanted) => versions.into_iter().find(|v| v == wanted),
      None => versions.into_iter().max(),
    }
    .ok_or_else(not_found)?;

    let dir = self.root.join(name).join(&selected);
    let pattern = archive_pattern(name)?;
    let mut files = gg_fs::list_files(&dir, &ListFilter::Matching(pattern))
      .await
      .map_err(StoreError::io(&dir))?;
    files.sort();

    let file_name = files.into_iter().next().ok_or_else(not_found)?;
    debug!(name, version = %selected, file_name = %file_name, "artifact_resolved");

    Ok(ResolvedArtifact {
      name: name.to_string(),
      version: selected,
      dir,
      file_name,
    })
  }

  /// Resolve the archive and read its recorded digest.
  ///
  /// A missing sidecar is [`StoreError::SidecarNotFound`], distinct from a
  /// missing archive.
  pub async fn resolve_digest(
    &self,
    name: &str,
    version: Option<&str>,
  ) -> Result<(ResolvedArtifact, String), StoreError> {
    let resolved = self.resolve(name, version).await?;
    let digest = read_sidecar(&resolved.path()).await?;
    Ok((resolved, digest))
  }
}
