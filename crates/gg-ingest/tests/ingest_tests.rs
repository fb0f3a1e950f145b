//! End-to-end ingestion into a filesystem store.

mod common;

use std::io::{Cursor, Write};

use common::{manifest, stage, tar_bytes, tar_gz_bytes, tree, zip_bytes};
use gg_ingest::{IngestError, Ingestor, UnpackError};
use gg_manifest::ManifestError;
use gg_store::{FsArtifactStore, StoreConfig, StoreError};

fn ingestor(root: &std::path::Path) -> Ingestor<FsArtifactStore> {
  Ingestor::new(FsArtifactStore::new(StoreConfig::new(root)))
}

#[tokio::test]
async fn zip_upload_round_trips() {
  let root = tempfile::tempdir().unwrap();
  let archive = zip_bytes(&[
    ("gg.json", &manifest("web", "1.0.0")),
    ("src/index.html", b"<html></html>"),
  ]);
  let (staged, _) = stage("web-1.0.0.zip", &archive);
  let ingestor = ingestor(root.path());

  let stored = ingestor
    .ingest(staged.path(), "web-1.0.0.zip")
    .await
    .unwrap();

  assert_eq!(stored.name, "web");
  assert_eq!(stored.version, "1.0.0");
  assert_eq!(
    tree(root.path()),
    vec![
      "web/1.0.0/web-1.0.0.zip",
      "web/1.0.0/web-1.0.0.zip.sha256"
    ]
  );

  let resolver = ingestor.store().resolver();
  let (resolved, digest) = resolver
    .resolve_digest("web", Some("1.0.0"))
    .await
    .unwrap();
  assert_eq!(std::fs::read(resolved.path()).unwrap(), archive);
  assert_eq!(digest, stored.digest);
}

#[tokio::test]
async fn tar_gz_upload_is_stored_as_uploaded() {
  let root = tempfile::tempdir().unwrap();
  let archive = tar_gz_bytes(&[("gg.json", &manifest("cli", "0.3"))]);
  let (staged, _) = stage("cli.tar.gz", &archive);
  let ingestor = ingestor(root.path());

  ingestor.ingest(staged.path(), "cli.tar.gz").await.unwrap();

  let resolved = ingestor
    .store()
    .resolver()
    .resolve("cli", None)
    .await
    .unwrap();
  assert_eq!(resolved.file_name, "cli.tar.gz");
  assert_eq!(std::fs::read(resolved.path()).unwrap(), archive);
}

#[tokio::test]
async fn plain_tar_upload() {
  let root = tempfile::tempdir().unwrap();
  let archive = tar_bytes(&[("gg.json", &manifest("lib", "7"))]);
  let (staged, _) = stage("lib-7.tar", &archive);
  let ingestor = ingestor(root.path());

  let stored = ingestor.ingest(staged.path(), "lib-7.tar").await.unwrap();

  assert_eq!(stored.version, "7");
}

#[tokio::test]
async fn reupload_replaces_previous_archive() {
  let root = tempfile::tempdir().unwrap();
  let ingestor = ingestor(root.path());

  let first = zip_bytes(&[("gg.json", &manifest("web", "1")), ("a.txt", b"one")]);
  let (staged, _) = stage("web-old.zip", &first);
  let first_stored = ingestor.ingest(staged.path(), "web-old.zip").await.unwrap();

  let second = zip_bytes(&[("gg.json", &manifest("web", "1")), ("a.txt", b"two")]);
  let (staged, _) = stage("web-new.zip", &second);
  let second_stored = ingestor.ingest(staged.path(), "web-new.zip").await.unwrap();

  assert_eq!(
    tree(root.path()),
    vec!["web/1/web-new.zip", "web/1/web-new.zip.sha256"]
  );
  let (_, digest) = ingestor
    .store()
    .resolver()
    .resolve_digest("web", Some("1"))
    .await
    .unwrap();
  assert_eq!(digest, second_stored.digest);
  assert_ne!(digest, first_stored.digest);
}

#[tokio::test]
async fn missing_manifest_leaves_store_untouched() {
  let root = tempfile::tempdir().unwrap();
  let archive = zip_bytes(&[("readme.md", b"no manifest here")]);
  let (staged, _) = stage("web.zip", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::Manifest(ManifestError::Missing { .. })
  ));
  assert!(tree(root.path()).is_empty());
}

#[tokio::test]
async fn empty_version_leaves_store_untouched() {
  let root = tempfile::tempdir().unwrap();
  let archive = zip_bytes(&[("gg.json", &manifest("web", ""))]);
  let (staged, _) = stage("web.zip", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  match err {
    IngestError::Manifest(ManifestError::Invalid { field, .. }) => assert_eq!(field, "version"),
    other => panic!("unexpected error: {other}"),
  }
  assert!(tree(root.path()).is_empty());
}

#[tokio::test]
async fn malformed_manifest() {
  let root = tempfile::tempdir().unwrap();
  let archive = zip_bytes(&[("gg.json", b"{ nope")]);
  let (staged, _) = stage("web.zip", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::Manifest(ManifestError::Malformed(_))
  ));
}

#[tokio::test]
async fn manifest_in_subdirectory_does_not_count() {
  let root = tempfile::tempdir().unwrap();
  let archive = zip_bytes(&[("web/gg.json", &manifest("web", "1"))]);
  let (staged, _) = stage("web.zip", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::Manifest(ManifestError::Missing { .. })
  ));
}

#[tokio::test]
async fn corrupt_archive_fails_unpack() {
  let root = tempfile::tempdir().unwrap();
  let (staged, _) = stage("web.tar.gz", b"\x1f\x8b garbage");
  let ingestor = ingestor(root.path());

  let err = ingestor
    .ingest(staged.path(), "web.tar.gz")
    .await
    .unwrap_err();

  assert!(matches!(err, IngestError::UnpackFailed { .. }));
  assert!(tree(root.path()).is_empty());
}

#[tokio::test]
async fn missing_upload_fails_unpack() {
  let root = tempfile::tempdir().unwrap();
  let staged = tempfile::tempdir().unwrap();
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  assert!(matches!(err, IngestError::UnpackFailed { .. }));
}

#[tokio::test]
async fn unknown_artifact_after_failed_ingest() {
  let root = tempfile::tempdir().unwrap();
  let ingestor = ingestor(root.path());

  let err = ingestor
    .store()
    .resolver()
    .resolve("nonexistent", None)
    .await
    .unwrap_err();

  assert!(matches!(err, StoreError::NotFound { .. }));
}

fn tar_with_symlink(manifest_bytes: &[u8], link: &str, target: &std::path::Path) -> Vec<u8> {
  let mut builder = tar::Builder::new(Vec::new());
  let mut header = tar::Header::new_gnu();
  header.set_size(manifest_bytes.len() as u64);
  header.set_mode(0o644);
  header.set_cksum();
  builder
    .append_data(&mut header, "gg.json", manifest_bytes)
    .unwrap();

  let mut header = tar::Header::new_gnu();
  header.set_entry_type(tar::EntryType::Symlink);
  header.set_size(0);
  header.set_mode(0o777);
  builder.append_link(&mut header, link, target).unwrap();
  builder.into_inner().unwrap()
}

#[tokio::test]
async fn tar_entry_cannot_replace_the_upload() {
  let root = tempfile::tempdir().unwrap();
  let archive = tar_bytes(&[
    ("gg.json", &manifest("web", "1")),
    ("web.tar", b"NOT THE UPLOAD"),
  ]);
  let (staged, _) = stage("web.tar", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.tar").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::UnpackFailed {
      source: UnpackError::ReservedEntry { .. },
      ..
    }
  ));
  assert!(tree(root.path()).is_empty());
}

#[tokio::test]
async fn zip_entry_cannot_replace_the_upload() {
  let root = tempfile::tempdir().unwrap();
  let archive = zip_bytes(&[
    ("gg.json", &manifest("web", "1")),
    ("web.zip", b"NOT THE UPLOAD"),
  ]);
  let (staged, _) = stage("web.zip", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::UnpackFailed {
      source: UnpackError::ReservedEntry { .. },
      ..
    }
  ));
  assert!(tree(root.path()).is_empty());
}

#[tokio::test]
async fn tar_symlink_to_server_file_is_not_stored() {
  let root = tempfile::tempdir().unwrap();
  let outside = tempfile::tempdir().unwrap();
  let secret = outside.path().join("secret.txt");
  std::fs::write(&secret, b"SERVER SECRET").unwrap();
  let archive = tar_with_symlink(&manifest("web", "1"), "web.tar", &secret);
  let (staged, _) = stage("web.tar", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.tar").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::UnpackFailed {
      source: UnpackError::LinkEntry { .. },
      ..
    }
  ));
  assert!(tree(root.path()).is_empty());
}

#[tokio::test]
async fn zip_symlink_to_server_file_is_not_stored() {
  let root = tempfile::tempdir().unwrap();
  let outside = tempfile::tempdir().unwrap();
  let secret = outside.path().join("secret.txt");
  std::fs::write(&secret, b"SERVER SECRET").unwrap();

  let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
  let options = zip::write::SimpleFileOptions::default();
  writer.start_file("gg.json", options).unwrap();
  writer.write_all(&manifest("web", "1")).unwrap();
  writer
    .add_symlink("web.zip", secret.to_str().unwrap(), options)
    .unwrap();
  let archive = writer.finish().unwrap().into_inner();
  let (staged, _) = stage("web.zip", &archive);
  let ingestor = ingestor(root.path());

  let err = ingestor.ingest(staged.path(), "web.zip").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::UnpackFailed {
      source: UnpackError::LinkEntry { .. },
      ..
    }
  ));
  assert!(tree(root.path()).is_empty());
}
