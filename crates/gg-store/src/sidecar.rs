use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::StoreError;

/// Suffix appended to an archive's file name to form its sidecar.
pub const SIDECAR_EXTENSION: &str = ".sha256";

/// `dir/foo.tar.gz` -> `dir/foo.tar.gz.sha256`.
pub fn sidecar_path(archive_path: &Path) -> PathBuf {
  let mut name = OsString::from(archive_path.as_os_str());
  name.push(SIDECAR_EXTENSION);
  PathBuf::from(name)
}

/// Hash `archive_path` and write the lowercase hex digest, with nothing else,
/// to its sidecar. Returns the digest.
pub async fn write_sidecar(archive_path: &Path) -> Result<String, StoreError> {
  let digest = gg_fs::digest_file(archive_path)
    .await
    .map_err(StoreError::io(archive_path))?;

  let path = sidecar_path(archive_path);
  fs::write(&path, digest.as_bytes())
    .await
    .map_err(StoreError::io(&path))?;

  Ok(digest)
}

/// Read the digest recorded next to `archive_path`.
pub async fn read_sidecar(archive_path: &Path) -> Result<String, StoreError> {
  let path = sidecar_path(archive_path);
  match fs::read_to_string(&path).await {
    Ok(digest) => Ok(digest),
    Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::SidecarNotFound { path }),
    Err(source) => Err(StoreError::Io { path, source }),
  }
}
