//! SHA-256 content comparison.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::DetectError;
use crate::{ChangeDetector, ChangeVerdict, UpdateMethod};

/// Detects changes by hashing both files in full.
///
/// Timestamps are ignored entirely. Cost is proportional to the size of the
/// two files.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Detector;

/// Compute the SHA-256 digest of a file's contents.
///
/// # Errors
///
/// * [`DetectError::Stat`] if the file cannot be opened
/// * [`DetectError::Read`] if reading fails part way through
pub fn file_digest(path: &Path) -> Result<[u8; 32], DetectError> {
    let mut file = File::open(path).map_err(|source| DetectError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|source| DetectError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(hasher.finalize().into())
}

impl ChangeDetector for Sha256Detector {
    fn method(&self) -> UpdateMethod {
        UpdateMethod::Sha256
    }

    fn needs_update(&self, source: &Path, target: &Path) -> Result<ChangeVerdict, DetectError> {
        let source_digest = file_digest(source)?;
        let target_digest = file_digest(target)?;

        Ok(ChangeVerdict::from(source_digest != target_digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{FileTime, set_file_mtime};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_is_up_to_date() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");
        fs::write(&source, "test content").unwrap();
        fs::write(&target, "test content").unwrap();

        let verdict = Sha256Detector.needs_update(&source, &target).unwrap();

        assert_eq!(verdict, ChangeVerdict::UpToDate);
    }

    #[test]
    fn test_different_content_needs_update() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");
        fs::write(&source, "test content").unwrap();
        fs::write(&target, "different content").unwrap();

        let verdict = Sha256Detector.needs_update(&source, &target).unwrap();

        assert_eq!(verdict, ChangeVerdict::NeedsUpdate);
    }

    #[test]
    fn test_mtime_is_ignored() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");
        fs::write(&source, "test content").unwrap();
        fs::write(&target, "test content").unwrap();
        set_file_mtime(&source, FileTime::from_unix_time(1_700_003_600, 0)).unwrap();
        set_file_mtime(&target, FileTime::from_unix_time(1_700_000_000, 0)).unwrap();

        let verdict = Sha256Detector.needs_update(&source, &target).unwrap();

        assert_eq!(verdict, ChangeVerdict::UpToDate);
    }

    #[test]
    fn test_digest_known_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        fs::write(&path, "").unwrap();

        let digest = file_digest(&path).unwrap();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();

        assert_eq!(
            hex,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "content").unwrap();
        let missing = dir.path().join("missing.txt");

        assert!(Sha256Detector.needs_update(&source, &missing).is_err());
        assert!(Sha256Detector.needs_update(&missing, &source).is_err());
    }
}
