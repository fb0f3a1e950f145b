//! # Application State
//!
//! Shared state for the Axum application: the ingestion pipeline, a version
//! resolver over the same store, and the server configuration.

use std::sync::Arc;

use gg_ingest::Ingestor;
use gg_store::{FsArtifactStore, VersionResolver};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default cap on a request body, and with it on a single upload.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Port to listen on.
  pub port: u16,

  /// Largest accepted request body in bytes.
  pub max_upload_bytes: usize,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
  ingestor: Arc<Ingestor<FsArtifactStore>>,
  resolver: VersionResolver,
  config: AppConfig,
}

impl AppState {
  /// State serving `store` with `config`.
  pub fn new(store: FsArtifactStore, config: AppConfig) -> Self {
    let resolver = store.resolver();
    Self {
      ingestor: Arc::new(Ingestor::new(store)),
      resolver,
      config,
    }
  }

  pub fn ingestor(&self) -> &Ingestor<FsArtifactStore> {
    &self.ingestor
  }

  pub fn store(&self) -> &FsArtifactStore {
    self.ingestor.store()
  }

  pub fn resolver(&self) -> &VersionResolver {
    &self.resolver
  }

  pub fn config(&self) -> &AppConfig {
    &self.config
  }
}
