use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

const READ_CHUNK: usize = 64 * 1024;

/// Compute the SHA-256 digest of a file as lowercase hex.
pub async fn digest_file(path: &Path) -> io::Result<String> {
  let mut file = File::open(path).await?;
  let mut hasher = Sha256::new();
  let mut buf = vec![0u8; READ_CHUNK];

  loop {
    let n = file.read(&mut buf).await?;
    if n == 0 {
      break;
    }
    hasher.update(&buf[..n]);
  }

  Ok(hex::encode(hasher.finalize()))
}
