use std::path::Path;

use gg_fs::ListFilter;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::ManifestError;

/// File name of the manifest at the root of an unpacked upload.
pub const MANIFEST_FILE_NAME: &str = "gg.json";

/// Validated artifact metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
  /// Artifact name, used as the top-level directory in the store.
  pub name: String,

  /// Opaque version string, e.g. "1.0.0" or "2024-05-01".
  pub version: String,
}

/// Manifest as it appears on disk. Unknown keys are ignored and absent or
/// null fields are kept as `None` so validation can name them.
#[derive(Deserialize)]
struct RawManifest {
  name: Option<String>,
  version: Option<String>,
}

impl Manifest {
  /// Locate, parse and validate `gg.json` in `dir`.
  pub async fn load(dir: &Path) -> Result<Self, ManifestError> {
    let io_err = |source| ManifestError::Io {
      path: dir.to_path_buf(),
      source,
    };

    // Exact, case-sensitive match even on case-insensitive filesystems.
    let found = gg_fs::list_files(dir, &ListFilter::exact(MANIFEST_FILE_NAME))
      .await
      .map_err(io_err)?;
    if found.is_empty() {
      return Err(ManifestError::Missing {
        dir: dir.to_path_buf(),
      });
    }

    let path = dir.join(MANIFEST_FILE_NAME);
    let content = fs::read(&path)
      .await
      .map_err(|source| ManifestError::Io { path, source })?;

    let manifest = Self::parse(&content)?;
    debug!(name = %manifest.name, version = %manifest.version, "manifest_loaded");
    Ok(manifest)
  }

  /// Parse and validate manifest JSON.
  pub fn parse(content: &[u8]) -> Result<Self, ManifestError> {
    let raw: RawManifest = serde_json::from_slice(content)?;
    Self::validate(raw.name, raw.version)
  }

  /// Check the required fields. `name` is checked before `version`.
  fn validate(name: Option<String>, version: Option<String>) -> Result<Self, ManifestError> {
    let name = required("name", name)?;
    let version = required("version", version)?;
    Ok(Self { name, version })
  }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ManifestError> {
  let invalid = |reason: &str| ManifestError::Invalid {
    field,
    reason: reason.to_string(),
  };

  let value = value.ok_or_else(|| invalid("field is required"))?;
  if value.is_empty() {
    return Err(invalid("field must not be empty"));
  }
  if value == "." || value == ".." || value.contains(['/', '\\']) {
    return Err(invalid("field must be a single path segment"));
  }
  Ok(value)
}
