use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// The unpacked upload has no `gg.json` at its root.
  #[error("gg.json not found in {}, repackage the archive with a manifest", .dir.display())]
  Missing { dir: PathBuf },

  /// `gg.json` exists but is not a JSON object of the expected shape.
  #[error("malformed manifest: {0}")]
  Malformed(#[from] serde_json::Error),

  /// A required field is absent, empty, or unusable as a path segment.
  #[error("invalid manifest field '{field}': {reason}")]
  Invalid { field: &'static str, reason: String },

  /// IO error while reading the staged directory.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl ManifestError {
  /// The offending field for [`ManifestError::Invalid`].
  pub fn field(&self) -> Option<&'static str> {
    match self {
      Self::Invalid { field, .. } => Some(*field),
      _ => None,
    }
  }
}
