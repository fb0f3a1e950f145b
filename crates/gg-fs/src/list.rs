use std::io;
use std::path::Path;

use regex::Regex;
use tokio::fs;

/// Predicate applied to entry names by [`list_subdirs`] and [`list_files`].
#[derive(Debug, Clone)]
pub enum ListFilter {
  /// Keep every entry.
  All,
  /// Keep entries whose name matches the regex.
  Matching(Regex),
  /// Keep only the entry with exactly this name.
  Exact(String),
}

impl ListFilter {
  /// Case-insensitive search for `keywords` anywhere in the entry name.
  ///
  /// `keywords` is interpreted as a regular expression. An empty string
  /// keeps everything.
  pub fn pattern(keywords: &str) -> Result<Self, regex::Error> {
    if keywords.is_empty() {
      return Ok(Self::All);
    }
    Regex::new(&format!("(?i).*{}.*", keywords)).map(Self::Matching)
  }

  /// Keep only `name`.
  pub fn exact(name: impl Into<String>) -> Self {
    Self::Exact(name.into())
  }

  /// Whether `name` passes the filter.
  pub fn matches(&self, name: &str) -> bool {
    match self {
      Self::All => true,
      Self::Matching(re) => re.is_match(name),
      Self::Exact(expected) => expected == name,
    }
  }
}

#[derive(Clone, Copy)]
enum Kind {
  Dir,
  File,
}

/// Names of the directories in `dir` that pass `filter`.
pub async fn list_subdirs(dir: &Path, filter: &ListFilter) -> io::Result<Vec<String>> {
  list(dir, filter, Kind::Dir).await
}

/// Names of the regular files in `dir` that pass `filter`.
pub async fn list_files(dir: &Path, filter: &ListFilter) -> io::Result<Vec<String>> {
  list(dir, filter, Kind::File).await
}

async fn list(dir: &Path, filter: &ListFilter, kind: Kind) -> io::Result<Vec<String>> {
  let mut entries = fs::read_dir(dir).await?;
  let mut names = Vec::new();

  while let Some(entry) = entries.next_entry().await? {
    // Non UTF-8 names can never match an artifact name or version.
    let Ok(name) = entry.file_name().into_string() else {
      continue;
    };
    if !filter.matches(&name) {
      continue;
    }

    let keep = match kind {
      Kind::Dir => entry.file_type().await?.is_dir(),
      Kind::File => entry.file_type().await?.is_file(),
    };
    if keep {
      names.push(name);
    }
  }

  Ok(names)
}
