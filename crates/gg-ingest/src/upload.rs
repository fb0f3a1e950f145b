/// File name suffixes accepted for upload, compared case-insensitively.
///
/// `.tar.gz` is one compound suffix: `web.tar.gz` is accepted while a bare
/// `web.gz` or `web.tgz` is not.
pub const ACCEPTED_UPLOAD_SUFFIXES: [&str; 3] = [".zip", ".tar.gz", ".tar"];

/// Whether an uploaded file name has an accepted archive suffix.
pub fn is_accepted_upload(file_name: &str) -> bool {
  let lower = file_name.to_ascii_lowercase();
  ACCEPTED_UPLOAD_SUFFIXES
    .iter()
    .any(|suffix| lower.ends_with(suffix))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_accepts_zip_and_tar() {
    assert!(is_accepted_upload("web-1.0.zip"));
    assert!(is_accepted_upload("web-1.0.tar"));
  }

  #[test]
  fn test_tar_gz_is_a_compound_suffix() {
    assert!(is_accepted_upload("web-1.0.tar.gz"));
    assert!(!is_accepted_upload("web-1.0.gz"));
    assert!(!is_accepted_upload("web-1.0.tgz"));
  }

  #[test]
  fn test_case_insensitive() {
    assert!(is_accepted_upload("WEB.ZIP"));
    assert!(is_accepted_upload("web.Tar.Gz"));
  }

  #[test]
  fn test_rejects_other_types() {
    assert!(!is_accepted_upload("web.txt"));
    assert!(!is_accepted_upload("web.zip.sha256"));
    assert!(!is_accepted_upload("zip"));
    assert!(!is_accepted_upload(""));
  }
}
