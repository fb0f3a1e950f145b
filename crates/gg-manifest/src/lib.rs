//! gg Manifest
//!
//! Every uploaded archive carries a `gg.json` file at its root declaring the
//! artifact's name and version. This crate locates that file in an unpacked
//! upload, deserializes it, and checks the required fields.

mod error;
mod manifest;

pub use error::ManifestError;
pub use manifest::{MANIFEST_FILE_NAME, Manifest};
