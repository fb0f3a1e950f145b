//! gg Ingest
//!
//! Turns a staged upload into a stored artifact:
//!
//! 1. unpack the uploaded archive into the staging directory,
//! 2. load and validate the `gg.json` manifest it contained,
//! 3. commit the original archive to the store under the manifest's
//!    name and version.
//!
//! The staging directory belongs to the caller, who must remove it however
//! ingestion ends. Nothing reaches the store unless all three steps succeed.

pub mod archive;
mod error;
mod ingestor;
mod upload;

pub use archive::{ArchiveFormat, UnpackError};
pub use error::IngestError;
pub use ingestor::Ingestor;
pub use upload::{ACCEPTED_UPLOAD_SUFFIXES, is_accepted_upload};
