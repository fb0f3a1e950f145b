//! Archive extraction.
//!
//! Uploads are zip files, gzip-compressed tarballs, or plain tarballs. The
//! format is sniffed from the file's leading bytes and falls back to the file
//! name when the header is inconclusive (pre-POSIX tarballs carry no magic).
//!
//! Entries are extracted into the directory holding the archive, so the
//! archive itself must survive: no entry may be written over it, existing
//! files are never overwritten, and link entries are refused outright.
//!
//! Extraction is blocking; async callers run it on the blocking pool.

use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const GZIP_MAGIC: &[u8] = b"\x1f\x8b";
const TAR_MAGIC: &[u8] = b"ustar";
const TAR_MAGIC_OFFSET: usize = 257;
const SNIFF_LEN: u64 = 512;
const UNIX_FILE_TYPE_MASK: u32 = 0o170000;
const UNIX_SYMLINK: u32 = 0o120000;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
  Zip,
  TarGz,
  Tar,
}

/// Errors that can occur while extracting an archive.
#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
  /// Neither the content nor the file name identify a supported format.
  #[error("unrecognised archive format: {}", .path.display())]
  UnknownFormat { path: PathBuf },

  /// An entry would be written outside the destination directory.
  #[error("archive entry escapes the destination: {entry}")]
  UnsafeEntry { entry: String },

  /// A symlink or hard link entry.
  #[error("archive entry is a link: {entry}")]
  LinkEntry { entry: String },

  /// An entry would replace the archive being extracted.
  #[error("archive entry would overwrite the archive itself: {entry}")]
  ReservedEntry { entry: String },

  /// The zip container is corrupt or uses unsupported features.
  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  /// Reading the archive or writing an entry failed.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

impl ArchiveFormat {
  /// Identify the format of the archive at `path`.
  pub fn detect(path: &Path) -> io::Result<Option<Self>> {
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;

    let by_name = path
      .file_name()
      .and_then(|n| n.to_str())
      .and_then(Self::from_file_name);

    Ok(Self::sniff(&header).or(by_name))
  }

  /// Identify a format from leading bytes.
  pub fn sniff(header: &[u8]) -> Option<Self> {
    if header.starts_with(ZIP_MAGIC) || header.starts_with(ZIP_EMPTY_MAGIC) {
      Some(Self::Zip)
    } else if header.starts_with(GZIP_MAGIC) {
      Some(Self::TarGz)
    } else if header
      .get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len())
      .is_some_and(|magic| magic == TAR_MAGIC)
    {
      Some(Self::Tar)
    } else {
      None
    }
  }

  /// Identify a format from a file name suffix.
  pub fn from_file_name(file_name: &str) -> Option<Self> {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".zip") {
      Some(Self::Zip)
    } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") || lower.ends_with(".gz") {
      Some(Self::TarGz)
    } else if lower.ends_with(".tar") {
      Some(Self::Tar)
    } else {
      None
    }
  }
}

/// Extract `archive` into `dest`, returning the detected format.
///
/// Fails on the first entry that is a link, escapes `dest`, names the
/// archive itself, or collides with an existing file.
pub fn unpack(archive: &Path, dest: &Path) -> Result<ArchiveFormat, UnpackError> {
  let format = ArchiveFormat::detect(archive)?.ok_or_else(|| UnpackError::UnknownFormat {
    path: archive.to_path_buf(),
  })?;
  let reserved = archive.file_name();

  let file = BufReader::new(File::open(archive)?);
  match format {
    ArchiveFormat::Zip => unpack_zip(file, dest, reserved)?,
    ArchiveFormat::TarGz => unpack_tar(GzDecoder::new(file), dest, reserved)?,
    ArchiveFormat::Tar => unpack_tar(file, dest, reserved)?,
  }

  Ok(format)
}

fn unpack_tar<R: Read>(
  reader: R,
  dest: &Path,
  reserved: Option<&OsStr>,
) -> Result<(), UnpackError> {
  let mut archive = tar::Archive::new(reader);
  archive.set_overwrite(false);

  for entry in archive.entries()? {
    let mut entry = entry?;
    let path = entry.path()?.into_owned();
    let name = || path.display().to_string();

    let kind = entry.header().entry_type();
    if kind.is_symlink() || kind.is_hard_link() {
      return Err(UnpackError::LinkEntry { entry: name() });
    }
    if is_reserved(&path, reserved) {
      return Err(UnpackError::ReservedEntry { entry: name() });
    }
    // unpack_in refuses entries containing `..` and reports them as false.
    if !entry.unpack_in(dest)? {
      return Err(UnpackError::UnsafeEntry { entry: name() });
    }
  }
  Ok(())
}

fn unpack_zip<R: Read + io::Seek>(
  reader: R,
  dest: &Path,
  reserved: Option<&OsStr>,
) -> Result<(), UnpackError> {
  let mut archive = zip::ZipArchive::new(reader)?;

  for index in 0..archive.len() {
    let mut file = archive.by_index(index)?;
    let Some(path) = file.enclosed_name() else {
      return Err(UnpackError::UnsafeEntry {
        entry: file.name().to_string(),
      });
    };

    if file
      .unix_mode()
      .is_some_and(|mode| mode & UNIX_FILE_TYPE_MASK == UNIX_SYMLINK)
    {
      return Err(UnpackError::LinkEntry {
        entry: path.display().to_string(),
      });
    }
    if is_reserved(&path, reserved) {
      return Err(UnpackError::ReservedEntry {
        entry: path.display().to_string(),
      });
    }

    let target = dest.join(&path);
    if file.is_dir() {
      fs::create_dir_all(&target)?;
      continue;
    }
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut out = OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&target)?;
    io::copy(&mut file, &mut out)?;
  }
  Ok(())
}

/// Whether `path` names the top-level entry `reserved`, ignoring `./`.
fn is_reserved(path: &Path, reserved: Option<&OsStr>) -> bool {
  let Some(reserved) = reserved else {
    return false;
  };
  let mut parts = path.components().filter(|c| *c != Component::CurDir);
  matches!(
    (parts.next(), parts.next()),
    (Some(Component::Normal(first)), None) if first == reserved
  )
}
