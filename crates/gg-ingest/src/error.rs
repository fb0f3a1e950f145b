use gg_manifest::ManifestError;
use gg_store::StoreError;

use crate::archive::UnpackError;

/// Errors that can occur while ingesting an upload.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
  /// The archive could not be extracted. The client has to upload again.
  #[error("failed to unpack {file_name}: {source}")]
  UnpackFailed {
    file_name: String,
    #[source]
    source: UnpackError,
  },

  /// The unpacked upload has no usable manifest.
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  /// The store rejected or failed the commit.
  #[error(transparent)]
  Store(#[from] StoreError),

  /// The blocking unpack worker died before reporting back.
  #[error("unpack worker failed: {message}")]
  Worker { message: String },
}
