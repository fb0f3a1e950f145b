use std::io::ErrorKind;
use std::path::Path;

use gg_fs::ListFilter;
use regex::Regex;

use crate::error::StoreError;

/// Archive extensions the resolver recognises inside a version directory.
const ARCHIVE_EXTENSIONS: &str = "zip|gz|tar";

/// Pattern an archive file name must match to be served for artifact `name`:
/// `^<name>.*\.(zip|gz|tar)$`.
///
/// `name` is matched literally, so names containing regex metacharacters
/// (`web.v2`, `c++`) only match themselves.
pub fn archive_pattern(name: &str) -> Result<Regex, StoreError> {
  Regex::new(&format!(
    r"^{}.*\.({})$",
    regex::escape(name),
    ARCHIVE_EXTENSIONS
  ))
  .map_err(|_| StoreError::InvalidKey {
    field: "name",
    value: name.to_string(),
    reason: "cannot build archive pattern",
  })
}

/// Entries starting with a dot are store internals (staging directories)
/// and never count as artifacts or versions.
pub fn is_hidden(entry_name: &str) -> bool {
  entry_name.starts_with('.')
}

/// Reject values that are not usable as exactly one path segment below the
/// store root.
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), StoreError> {
  let reason = if value.is_empty() {
    Some("must not be empty")
  } else if value == "." || value == ".." {
    Some("must not be a relative directory reference")
  } else if value.contains(['/', '\\', '\0']) {
    Some("must not contain path separators")
  } else {
    None
  };

  match reason {
    Some(reason) => Err(StoreError::InvalidKey {
      field,
      value: value.to_string(),
      reason,
    }),
    None => Ok(()),
  }
}

/// Sorted, non-hidden subdirectory names of `dir` passing `filter`.
///
/// A missing `dir` lists as empty.
pub(crate) async fn visible_subdirs(
  dir: &Path,
  filter: &ListFilter,
) -> Result<Vec<String>, StoreError> {
  let mut names = match gg_fs::list_subdirs(dir, filter).await {
    Ok(names) => names,
    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
    Err(source) => {
      return Err(StoreError::Io {
        path: dir.to_path_buf(),
        source,
      });
    }
  };
  names.retain(|n| !is_hidden(n));
  names.sort();
  Ok(names)
}
