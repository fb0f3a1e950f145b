//! Archive fixtures for ingestion tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

pub fn manifest(name: &str, version: &str) -> Vec<u8> {
  format!(r#"{{"name":"{name}","version":"{version}","description":"fixture"}}"#).into_bytes()
}

pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
  let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
  let options = zip::write::SimpleFileOptions::default();
  for (path, content) in files {
    writer.start_file(*path, options).unwrap();
    writer.write_all(content).unwrap();
  }
  writer.finish().unwrap().into_inner()
}

pub fn tar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
  let mut builder = tar::Builder::new(Vec::new());
  for (path, content) in files {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, path, *content).unwrap();
  }
  builder.into_inner().unwrap()
}

pub fn tar_gz_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
  let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
  encoder.write_all(&tar_bytes(files)).unwrap();
  encoder.finish().unwrap()
}

/// Write `bytes` as `file_name` into a fresh staging directory.
pub fn stage(file_name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join(file_name);
  std::fs::write(&path, bytes).unwrap();
  (dir, path)
}

/// Every file below `root`, relative and sorted.
pub fn tree(root: &Path) -> Vec<String> {
  fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
      return;
    };
    for entry in entries {
      let path = entry.unwrap().path();
      if path.is_dir() {
        walk(root, &path, out);
      } else {
        out.push(
          path
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .into_owned(),
        );
      }
    }
  }

  let mut out = Vec::new();
  walk(root, root, &mut out);
  out.sort();
  out
}
