//! Copy pass: walk the source tree and transfer new or stale files.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io;
use std::path::Path;

use treesync_copy::copy_file;
use treesync_detect::ChangeDetector;

use crate::PassOptions;
use crate::error::EntryError;
use crate::event::{CopyKind, EntryOutcome, Pass, SyncEvent};
use crate::tally::{Tally, TallyTracker};
use crate::walk::{WalkItem, for_each_item, record_outcome, relative_to, walk_entries};

/// Walk `source_root` and bring `target_root` up to date.
///
/// Every regular file below the source is visited once. A file is copied when
/// its counterpart under `target_root` is missing or `detector` reports it
/// stale. Failures are recorded per entry and never stop the walk; symlinks
/// and other special entries are counted as skipped.
///
/// # Arguments
///
/// * `source_root` - Tree to mirror
/// * `target_root` - Tree to update
/// * `detector` - Staleness strategy for files present on both sides
/// * `options` - Worker count and copy mode
/// * `on_event` - Callback for progress events
#[must_use]
pub fn diff_tree<F>(
    source_root: &Path,
    target_root: &Path,
    detector: &dyn ChangeDetector,
    options: &PassOptions,
    on_event: F,
) -> Tally
where
    F: Fn(&SyncEvent<'_>) + Sync,
{
    log::info!(
        "Copying from {} to {} using {} detection",
        source_root.display(),
        target_root.display(),
        detector.method()
    );
    on_event(&SyncEvent::PassStarted {
        pass: Pass::Copy,
        root: source_root,
    });

    let tracker = TallyTracker::new();
    let on_event = &on_event;
    let tracker_ref = &tracker;

    for_each_item(
        walk_entries(source_root, options.jobs),
        options.jobs,
        |item| match item {
            WalkItem::File(source) => {
                tracker_ref.increment_seen();
                match relative_to(&source, source_root) {
                    Ok(relative) => {
                        let target = target_root.join(relative);
                        let outcome = transfer_if_stale(&source, &target, detector, options)
                            .unwrap_or_else(EntryOutcome::Failed);
                        record_outcome(Pass::Copy, tracker_ref, relative, &outcome, on_event);
                    }
                    Err(e) => {
                        let outcome = EntryOutcome::Failed(e);
                        record_outcome(Pass::Copy, tracker_ref, &source, &outcome, on_event);
                    }
                }
            }
            WalkItem::Special(path) => {
                tracker_ref.increment_seen();
                let shown = relative_to(&path, source_root).unwrap_or(&path);
                record_outcome(
                    Pass::Copy,
                    tracker_ref,
                    shown,
                    &EntryOutcome::Ignored,
                    on_event,
                );
            }
            WalkItem::Failed { path, error } => {
                let shown = relative_to(&path, source_root).unwrap_or(&path);
                record_outcome(
                    Pass::Copy,
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
        "Copy pass completed: {} files processed, {} copied, {} skipped, {} errors",
        tally.seen,
        tally.applied,
        tally.skipped,
        tally.errors
    );
    on_event(&SyncEvent::PassFinished {
        pass: Pass::Copy,
        tally,
    });

    tally
}

/// Decide what to do with one source file and do it.
fn transfer_if_stale(
    source: &Path,
    target: &Path,
    detector: &dyn ChangeDetector,
    options: &PassOptions,
) -> Result<EntryOutcome, EntryError> {
    log::trace!("Processing: {} -> {}", source.display(), target.display());

    // symlink_metadata so a symlinked destination is never written through.
    let kind = match fs::symlink_metadata(target) {
        Ok(metadata) if metadata.is_file() => {
            if !detector.needs_update(source, target)?.needs_update() {
                return Ok(EntryOutcome::UpToDate);
            }
            CopyKind::Updated
        }
        Ok(_) => {
            return Err(EntryError::NotAFile {
                path: target.to_path_buf(),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => CopyKind::New,
        Err(e) => {
            return Err(EntryError::Stat {
                path: target.to_path_buf(),
                source: e,
            });
        }
    };

    let result = copy_file(source, target, &options.copy)?;

    Ok(EntryOutcome::Copied {
        kind,
        bytes: result.bytes_copied,
    })
}
