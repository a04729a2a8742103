//! Single-file copy implementation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs::{self, File};
use std::io;
use std::path::Path;

use filetime::FileTime;

use crate::error::CopyError;

/// Options controlling how a file is written to its destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Stage the copy in a temporary sibling file and rename it into place.
    ///
    /// When disabled the target is truncated and written in place, so an I/O
    /// failure part way through leaves a partial file behind.
    pub atomic: bool,
}

/// Result of a successful copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyResult {
    /// Number of bytes written to the target.
    pub bytes_copied: u64,
    /// Whether the source modification time was applied to the target.
    pub mtime_preserved: bool,
}

/// Create every missing parent directory of `target`.
///
/// New directories get mode `0755` on Unix.
///
/// # Errors
///
/// * If a directory cannot be created
pub fn create_parent_dirs(target: &Path) -> Result<(), CopyError> {
    let Some(parent) = target.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(parent)
        .map_err(|e| CopyError::CreateDirError {
            path: parent.to_path_buf(),
            io_error: e,
        })
}

/// Copy `source` to `target`, replacing any existing target content.
///
/// The target's modification time is set to the source's. Failing to do so
/// is logged as a warning and reported through
/// [`CopyResult::mtime_preserved`], but does not fail the copy.
///
/// # Arguments
///
/// * `source` - Source file path
/// * `target` - Target file path
/// * `options` - Write mode options
///
/// # Errors
///
/// * If a parent directory of `target` cannot be created
/// * If `source` cannot be opened
/// * If `target` (or its staging file) cannot be created
/// * If streaming the contents fails
/// * If the staged copy cannot be renamed into place
pub fn copy_file(
    source: &Path,
    target: &Path,
    options: &CopyOptions,
) -> Result<CopyResult, CopyError> {
    log::debug!("Copying file: {} -> {}", source.display(), target.display());

    create_parent_dirs(target)?;

    let mut input = File::open(source).map_err(|e| CopyError::OpenSourceError {
        path: source.to_path_buf(),
        io_error: e,
    })?;

    let result = if options.atomic {
        copy_staged(source, target, &mut input)?
    } else {
        copy_in_place(source, target, &mut input)?
    };

    log::trace!(
        "Copied {} -> {} ({} bytes)",
        source.display(),
        target.display(),
        result.bytes_copied
    );

    Ok(result)
}

/// Truncate `target` and stream into it directly.
fn copy_in_place(source: &Path, target: &Path, input: &mut File) -> Result<CopyResult, CopyError> {
    let mut output = File::create(target).map_err(|e| CopyError::CreateTargetError {
        path: target.to_path_buf(),
        io_error: e,
    })?;

    let bytes_copied = io::copy(input, &mut output).map_err(|e| CopyError::FileCopyError {
        source_path: source.to_path_buf(),
        target_path: target.to_path_buf(),
        io_error: e,
    })?;
    drop(output);

    let mtime_preserved = preserve_mtime(source, input, target);

    Ok(CopyResult {
        bytes_copied,
        mtime_preserved,
    })
}

/// Stream into a temporary file next to `target`, then rename it over `target`.
///
/// The staging file is removed if any step before the rename fails.
fn copy_staged(source: &Path, target: &Path, input: &mut File) -> Result<CopyResult, CopyError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".treesync-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| CopyError::CreateTargetError {
            path: dir.to_path_buf(),
            io_error: e,
        })?;

    let bytes_copied =
        io::copy(input, staged.as_file_mut()).map_err(|e| CopyError::FileCopyError {
            source_path: source.to_path_buf(),
            target_path: target.to_path_buf(),
            io_error: e,
        })?;

    // Staging files are created owner-only; give the result the source's mode.
    match input.metadata() {
        Ok(metadata) => {
            if let Err(e) = fs::set_permissions(staged.path(), metadata.permissions()) {
                log::warn!(
                    "Failed to apply permissions of {} to {}: {e}",
                    source.display(),
                    target.display()
                );
            }
        }
        Err(e) => log::warn!("Failed to stat source file {}: {e}", source.display()),
    }

    let mtime_preserved = preserve_mtime(source, input, staged.path());

    staged
        .persist(target)
        .map_err(|e| CopyError::PersistError {
            path: target.to_path_buf(),
            io_error: e.error,
        })?;

    Ok(CopyResult {
        bytes_copied,
        mtime_preserved,
    })
}

/// Apply the source's modification time to `written`, warning on failure.
fn preserve_mtime(source: &Path, input: &File, written: &Path) -> bool {
    let metadata = match input.metadata() {
        Ok(metadata) => metadata,
        Err(e) => {
            log::warn!(
                "Failed to stat source file {} for modtime: {e}",
                source.display()
            );
            return false;
        }
    };

    let mtime = FileTime::from_last_modification_time(&metadata);
    match filetime::set_file_mtime(written, mtime) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Failed to preserve modtime for {}: {e}", written.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn staging_leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with(".treesync-"))
            .collect()
    }

    #[test]
    fn test_copy_file_creates_new() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");

        fs::write(&source, "hello world").unwrap();

        let result = copy_file(&source, &target, &CopyOptions::default()).unwrap();

        assert_eq!(result.bytes_copied, 11);
        assert!(result.mtime_preserved);
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello world");
    }

    #[test]
    fn test_copy_file_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("a/b/c/target.txt");

        fs::write(&source, "nested").unwrap();

        copy_file(&source, &target, &CopyOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "nested");
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_dirs_are_not_wider_than_0755() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("made/target.txt");

        create_parent_dirs(&target).unwrap();

        let mode = fs::metadata(dir.path().join("made"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o700, 0o700);
        assert_eq!(mode & 0o022, 0);
    }

    #[test]
    fn test_copy_file_overwrites_and_truncates() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");

        fs::write(&source, "new").unwrap();
        fs::write(&target, "much longer old content").unwrap();

        copy_file(&source, &target, &CopyOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_copy_file_preserves_mtime() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target.txt");

        fs::write(&source, "timed").unwrap();
        let mtime = FileTime::from_unix_time(1_700_000_100, 222_000_000);
        filetime::set_file_mtime(&source, mtime).unwrap();

        for atomic in [false, true] {
            copy_file(&source, &target, &CopyOptions { atomic }).unwrap();

            let copied = FileTime::from_last_modification_time(&fs::metadata(&target).unwrap());
            assert_eq!(copied, mtime, "atomic = {atomic}");
        }
    }

    #[test]
    fn test_copy_file_source_not_found() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("nonexistent.txt");
        let target = dir.path().join("target.txt");

        let err = copy_file(&source, &target, &CopyOptions::default()).unwrap_err();

        assert!(matches!(err, CopyError::OpenSourceError { ref path, .. } if *path == source));
        assert!(!target.exists());
    }

    #[test]
    fn test_copy_file_target_is_directory() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("target");

        fs::write(&source, "content").unwrap();
        fs::create_dir(&target).unwrap();

        let err = copy_file(&source, &target, &CopyOptions::default()).unwrap_err();

        assert!(matches!(err, CopyError::CreateTargetError { .. }));
        assert!(target.is_dir());
    }

    #[test]
    fn test_atomic_copy_leaves_no_staging_files() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let target = dir.path().join("out/target.txt");

        fs::write(&source, "staged").unwrap();

        copy_file(&source, &target, &CopyOptions { atomic: true }).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "staged");
        assert!(staging_leftovers(&dir.path().join("out")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_copy_keeps_source_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("run.sh");
        let target = dir.path().join("copy.sh");

        fs::write(&source, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o750)).unwrap();

        copy_file(&source, &target, &CopyOptions { atomic: true }).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
    }

    // Reading a directory handle fails with EISDIR after open succeeds, which
    // exercises the mid-stream failure path.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_stream_failure_in_place_leaves_partial_target() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("not_a_file");
        let target = dir.path().join("target.txt");

        fs::create_dir(&source).unwrap();
        fs::write(&target, "previous content").unwrap();

        let err = copy_file(&source, &target, &CopyOptions::default()).unwrap_err();

        assert!(matches!(err, CopyError::FileCopyError { .. }));
        assert_eq!(fs::read_to_string(&target).unwrap(), "");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_stream_failure_atomic_keeps_previous_target() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("not_a_file");
        let target = dir.path().join("target.txt");

        fs::create_dir(&source).unwrap();
        fs::write(&target, "previous content").unwrap();

        let err = copy_file(&source, &target, &CopyOptions { atomic: true }).unwrap_err();

        assert!(matches!(err, CopyError::FileCopyError { .. }));
        assert_eq!(fs::read_to_string(&target).unwrap(), "previous content");
        assert!(staging_leftovers(dir.path()).is_empty());
    }
}
