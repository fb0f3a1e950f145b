use std::path::PathBuf;

/// How a commit replaces an existing `(name, version)` directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplaceMode {
  /// Remove the old directory, recreate it, then copy and hash into it.
  ///
  /// A crash between removal and the end of the copy leaves the version
  /// absent (never half-old, half-new).
  #[default]
  InPlace,

  /// Build the new version in a hidden sibling directory first, then remove
  /// the old directory and rename the new one into place.
  ///
  /// A crash while copying or hashing leaves the previous version intact.
  /// The window where the version is absent shrinks to the remove + rename.
  Staged,
}

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
  /// Root directory holding one subdirectory per artifact name.
  pub root: PathBuf,

  /// Replace strategy for re-uploads.
  pub replace_mode: ReplaceMode,
}

impl StoreConfig {
  /// Configuration rooted at `root` with the default replace mode.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      replace_mode: ReplaceMode::default(),
    }
  }

  /// Set the replace strategy.
  pub fn with_replace_mode(mut self, replace_mode: ReplaceMode) -> Self {
    self.replace_mode = replace_mode;
    self
  }
}
