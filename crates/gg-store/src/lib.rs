//! gg Store
//!
//! The durable side of gg. Artifacts live on disk as
//!
//! ```text
//! {root}/
//! └── web-scaffold/
//!     ├── 1.0.0/
//!     │   ├── web-scaffold-1.0.0.zip
//!     │   └── web-scaffold-1.0.0.zip.sha256
//!     └── 1.1.0/
//!         ├── web-scaffold.tar.gz
//!         └── web-scaffold.tar.gz.sha256
//! ```
//!
//! [`FsArtifactStore`] commits archives into that layout, replacing a
//! `(name, version)` wholesale when it is uploaded again. [`VersionResolver`]
//! maps a name and optional version back to the stored archive, picking the
//! lexicographically greatest version when none is given.
//!
//! Nothing here locks. Two writers committing the same key race and the last
//! one wins; readers may briefly see the version missing while it is being
//! replaced.

mod config;
mod error;
mod fs_store;
mod layout;
mod resolver;
mod sidecar;
mod store;

pub use config::{ReplaceMode, StoreConfig};
pub use error::StoreError;
pub use fs_store::FsArtifactStore;
pub use layout::{archive_pattern, is_hidden, validate_segment};
pub use resolver::{ResolvedArtifact, VersionResolver};
pub use sidecar::{SIDECAR_EXTENSION, read_sidecar, sidecar_path, write_sidecar};
pub use store::{ArtifactStore, ArtifactSummary, StoredArtifact};
