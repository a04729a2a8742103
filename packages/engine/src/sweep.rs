//! Sweep pass: remove target files that no longer exist in the source.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io;
use std::path::Path;

use crate::PassOptions;
use crate::error::EntryError;
use crate::event::{EntryOutcome, Pass, SyncEvent};
use crate::tally::{Tally, TallyTracker};
use crate::walk::{WalkItem, for_each_item, record_outcome, relative_to, walk_entries};

/// Walk `target_root` and delete every regular file whose counterpart under
/// `source_root` does not exist.
///
/// Only existence is checked, never content. A file is deleted only when the
/// source lookup reports not-found; any other lookup error keeps the file and
/// is recorded. Directories left empty are not removed, and special entries
/// in the target are never touched.
///
/// The source is checked on disk for every entry, so files created by an
/// earlier copy pass are seen as present.
///
/// # Arguments
///
/// * `source_root` - Reference tree
/// * `target_root` - Tree to prune
/// * `options` - Worker count (copy mode is ignored)
/// * `on_event` - Callback for progress events
#[must_use]
pub fn sweep_missing<F>(
    source_root: &Path,
    target_root: &Path,
    options: &PassOptions,
    on_event: F,
) -> Tally
where
    F: Fn(&SyncEvent<'_>) + Sync,
{
    log::info!(
        "Starting cleanup of missing files from {}",
        target_root.display()
    );
    on_event(&SyncEvent::PassStarted {
        pass: Pass::Sweep,
        root: target_root,
    });

    let tracker = TallyTracker::new();
    let on_event = &on_event;
    let tracker_ref = &tracker;

    for_each_item(
        walk_entries(target_root, options.jobs),
        options.jobs,
        |item| match item {
            WalkItem::File(target) => {
                tracker_ref.increment_seen();
                match relative_to(&target, target_root) {
                    Ok(relative) => {
                        let outcome = remove_if_missing(&source_root.join(relative), &target)
                            .unwrap_or_else(EntryOutcome::Failed);
                        record_outcome(Pass::Sweep, tracker_ref, relative, &outcome, on_event);
                    }
                    Err(e) => {
                        let outcome = EntryOutcome::Failed(e);
                        record_outcome(Pass::Sweep, tracker_ref, &target, &outcome, on_event);
                    }
                }
            }
            WalkItem::Special(path) => {
                tracker_ref.increment_seen();
                let shown = relative_to(&path, target_root).unwrap_or(&path);
                record_outcome(
                    Pass::Sweep,
                    tracker_ref,
                    shown,
                    &EntryOutcome::Ignored,
                    on_event,
                );
            }
            WalkItem::Failed { path, error } => {
                let shown = relative_to(&path, target_root).unwrap_or(&path);
                record_outcome(
                    Pass::Sweep,
                    tracker_ref,
                    shown,
                    &EntryOutcome::Failed(error),
                    on_event,
                );
            }
        },
    );

    let tally = tracker.snapshot();
    log::info!(
        "Cleanup completed: {} files checked, {} deleted, {} errors",
        tally.seen,
        tally.applied,
        tally.errors
    );
    on_event(&SyncEvent::PassFinished {
        pass: Pass::Sweep,
        tally,
    });

    tally
}

fn remove_if_missing(source: &Path, target: &Path) -> Result<EntryOutcome, EntryError> {
    // A dangling symlink in the source still counts as present.
    match fs::symlink_metadata(source) {
        Ok(_) => Ok(EntryOutcome::Kept),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::remove_file(target).map_err(|e| EntryError::Delete {
                path: target.to_path_buf(),
                source: e,
            })?;
            Ok(EntryOutcome::Deleted)
        }
        Err(e) => Err(EntryError::Stat {
            path: source.to_path_buf(),
            source: e,
        }),
    }
}
