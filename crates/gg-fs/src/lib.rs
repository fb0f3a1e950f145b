//! gg Filesystem Helpers
//!
//! Plain filesystem primitives the artifact store and resolver are built on:
//! existence checks, filtered directory listing, file copy and SHA-256
//! content digests.
//!
//! Listings come back in whatever order the filesystem enumerates them.
//! Callers that need an order sort explicitly.

mod digest;
mod list;

pub use digest::{DIGEST_HEX_LEN, digest_file};
pub use list::{ListFilter, list_files, list_subdirs};

use std::io;
use std::path::Path;

use tokio::fs;

/// Returns true if something exists at `path`.
///
/// Permission errors and the like are reported as "does not exist".
pub async fn exists(path: &Path) -> bool {
  fs::try_exists(path).await.unwrap_or(false)
}

/// Copy `src` to `dst`, replacing `dst` if present.
///
/// On failure `dst` may be missing or partially written; the error is
/// always returned.
pub async fn copy_file(src: &Path, dst: &Path) -> io::Result<u64> {
  fs::copy(src, dst).await
}
