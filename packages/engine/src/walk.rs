//! Tree enumeration and per-entry dispatch shared by both passes.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::EntryError;
use crate::event::{CopyKind, EntryOutcome, Pass, SyncEvent};
use crate::tally::TallyTracker;

/// A non-directory entry produced while walking a root.
#[derive(Debug)]
pub(crate) enum WalkItem {
    /// A regular file.
    File(PathBuf),
    /// A symlink, socket, FIFO or device node.
    Special(PathBuf),
    /// A directory below the root could not be read.
    Failed {
        /// The directory, or the root when the failing path is unknown.
        path: PathBuf,
        /// What went wrong.
        error: EntryError,
    },
}

/// Enumerate every non-directory entry below `root`, depth first.
///
/// Symlinks are reported, never followed. The root itself is not reported,
/// even when it is a symlink to a directory. Sibling order is whatever the
/// filesystem returns.
pub(crate) fn walk_entries(root: &Path, jobs: usize) -> impl Iterator<Item = WalkItem> + '_ {
    let parallelism = if jobs > 1 {
        jwalk::Parallelism::RayonNewPool(jobs)
    } else {
        jwalk::Parallelism::Serial
    };

    jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(false)
        .parallelism(parallelism)
        .into_iter()
        .filter_map(move |entry| match entry {
            Err(e) => Some(WalkItem::Failed {
                path: root.to_path_buf(),
                error: EntryError::Walk {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                },
            }),
            Ok(mut entry) => {
                let path = entry.path();
                if let Some(e) = entry.read_children_error.take() {
                    return Some(WalkItem::Failed {
                        error: EntryError::Walk {
                            path: path.clone(),
                            message: e.to_string(),
                        },
                        path,
                    });
                }
                if entry.depth == 0 {
                    return None;
                }

                let file_type = entry.file_type();
                if file_type.is_dir() {
                    log::trace!("Skipping directory: {}", path.display());
                    None
                } else if file_type.is_file() {
                    Some(WalkItem::File(path))
                } else {
                    Some(WalkItem::Special(path))
                }
            }
        })
}

/// Run `visit` on every item, on the calling thread or on a pool of `jobs`
/// workers.
pub(crate) fn for_each_item<I, F>(items: I, jobs: usize, visit: F)
where
    I: Iterator<Item = WalkItem>,
    F: Fn(WalkItem) + Send + Sync,
{
    if jobs <= 1 {
        items.for_each(visit);
        return;
    }

    match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
        Ok(pool) => {
            let items: Vec<WalkItem> = items.collect();
            log::debug!("Processing {} entries on {jobs} workers", items.len());
            pool.install(|| items.into_par_iter().for_each(visit));
        }
        Err(e) => {
            log::warn!("Failed to start {jobs} workers, continuing on one thread: {e}");
            items.for_each(visit);
        }
    }
}

/// Count, log and publish the outcome of one entry.
pub(crate) fn record_outcome<F>(
    pass: Pass,
    tracker: &TallyTracker,
    path: &Path,
    outcome: &EntryOutcome,
    on_event: &F,
) where
    F: Fn(&SyncEvent<'_>) + Sync,
{
    tracker.record(outcome);

    match outcome {
        EntryOutcome::Copied {
            kind: CopyKind::New,
            bytes,
        } => log::info!("New file: {} ({bytes} bytes)", path.display()),
        EntryOutcome::Copied {
            kind: CopyKind::Updated,
            bytes,
        } => log::info!("Modified file: {} ({bytes} bytes)", path.display()),
        EntryOutcome::UpToDate => log::debug!("Skipping unchanged file: {}", path.display()),
        EntryOutcome::Deleted => log::info!("Deleted missing file: {}", path.display()),
        EntryOutcome::Kept => log::debug!("File exists in source, keeping: {}", path.display()),
        EntryOutcome::Ignored => {
            log::info!("Ignoring {}: not a regular file", path.display());
        }
        EntryOutcome::Failed(e) => log::error!("{pass} failed for {}: {e}", path.display()),
    }

    on_event(&SyncEvent::Entry {
        pass,
        path,
        outcome,
    });
}

/// Express `path` relative to `root`, or describe why it cannot be.
pub(crate) fn relative_to<'a>(path: &'a Path, root: &Path) -> Result<&'a Path, EntryError> {
    path.strip_prefix(root)
        .map_err(|_| EntryError::RelativePath {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn collect(root: &Path, jobs: usize) -> (Vec<PathBuf>, Vec<PathBuf>, usize) {
        let mut files = Vec::new();
        let mut special = Vec::new();
        let mut failed = 0;
        for item in walk_entries(root, jobs) {
            match item {
                WalkItem::File(p) => files.push(p.strip_prefix(root).unwrap().to_path_buf()),
                WalkItem::Special(p) => special.push(p.strip_prefix(root).unwrap().to_path_buf()),
                WalkItem::Failed { .. } => failed += 1,
            }
        }
        files.sort();
        special.sort();
        (files, special, failed)
    }

    #[test]
    fn test_walk_entries_yields_files_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        fs::write(dir.path().join("sub/deeper/b.txt"), "b").unwrap();

        for jobs in [1, 4] {
            let (files, special, failed) = collect(dir.path(), jobs);
            assert_eq!(
                files,
                vec![
                    PathBuf::from(".hidden"),
                    PathBuf::from("a.txt"),
                    PathBuf::from("sub/deeper/b.txt"),
                ]
            );
            assert!(special.is_empty());
            assert_eq!(failed, 0);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_entries_reports_symlinks_as_special() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real_dir")).unwrap();
        fs::write(dir.path().join("real_dir/inner.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real_dir"), dir.path().join("dir_link"))
            .unwrap();

        let (files, special, _) = collect(dir.path(), 1);

        assert_eq!(files, vec![PathBuf::from("real_dir/inner.txt")]);
        assert_eq!(special, vec![PathBuf::from("dir_link")]);
    }

    #[test]
    fn test_for_each_item_visits_every_item_once() {
        for jobs in [1, 3] {
            let items = (0..50).map(|i| WalkItem::File(PathBuf::from(format!("f{i}"))));
            let seen = Mutex::new(Vec::new());

            for_each_item(items, jobs, |item| {
                if let WalkItem::File(p) = item {
                    seen.lock().unwrap().push(p);
                }
            });

            let mut seen = seen.into_inner().unwrap();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 50);
        }
    }

    #[test]
    fn test_relative_to_rejects_foreign_paths() {
        let err = relative_to(Path::new("/elsewhere/file"), Path::new("/root")).unwrap_err();
        assert!(matches!(err, EntryError::RelativePath { .. }));
        assert_eq!(
            relative_to(Path::new("/root/a/b"), Path::new("/root")).unwrap(),
            Path::new("a/b")
        );
    }
}
