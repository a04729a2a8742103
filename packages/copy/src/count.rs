//! Fast regular-file counting using jwalk.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

/// Count the regular files a sync pass would visit under `path`.
///
/// - If path is a regular file: returns 1
/// - If path is a directory: returns count of regular files recursively
/// - If path doesn't exist: returns 0
///
/// A symlinked `path` is resolved; symlinks inside the tree are not followed
/// or counted. Unreadable subdirectories are silently left out, so the
/// result is a lower bound suitable for sizing a progress bar.
#[must_use]
pub fn count_files(path: &Path) -> u64 {
    let Ok(metadata) = path.metadata() else {
        return 0;
    };

    if metadata.is_file() {
        return 1;
    }

    if !metadata.is_dir() {
        return 0;
    }

    jwalk::WalkDir::new(path)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .parallelism(jwalk::Parallelism::Serial)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count() as u64
}
