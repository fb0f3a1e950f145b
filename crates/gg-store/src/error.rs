use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur when writing to or reading from the store.
#[derive(Debug, Error)]
pub enum StoreError {
  /// No stored artifact matches the query.
  #[error("artifact not found: {name}{}", at_version(.version))]
  NotFound {
    name: String,
    version: Option<String>,
  },

  /// The archive resolved but its `.sha256` sidecar is missing.
  #[error("sha256 sidecar not found: {}", .path.display())]
  SidecarNotFound { path: PathBuf },

  /// A name, version or file name cannot be used as a single path segment.
  #[error("invalid {field} '{value}': {reason}")]
  InvalidKey {
    field: &'static str,
    value: String,
    reason: &'static str,
  },

  /// Filesystem failure at `path`.
  #[error("store io error at {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

fn at_version(version: &Option<String>) -> String {
  version
    .as_deref()
    .map(|v| format!("@{v}"))
    .unwrap_or_default()
}

impl StoreError {
  pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
    move |source| Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}
