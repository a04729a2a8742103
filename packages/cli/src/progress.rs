//! Progress bar utilities for the CLI.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Mutex;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use treesync_copy::count_files;
use treesync_engine::{EntryOutcome, Pass, SyncEvent};

/// Progress bar manager for sync passes.
///
/// One bar per pass, sized by the number of regular files under the walked
/// root and advanced by one for every entry that is not an ignored special
/// file.
pub struct ProgressManager {
    multi: MultiProgress,
    current: Mutex<Option<ProgressBar>>,
    enabled: bool,
}

impl ProgressManager {
    /// Create a new progress manager.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            current: Mutex::new(None),
            enabled,
        }
    }

    /// Create a progress bar for a pass.
    ///
    /// If progress is disabled, returns a hidden progress bar.
    #[must_use]
    pub fn create_pass_bar(&self, pass: Pass, total: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  {prefix:<8} [{bar:25.green/dim}] {pos}/{len} files {wide_msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━─"),
        );
        pb.set_prefix(pass.to_string());
        pb
    }

    /// Update bars from a run event. Safe to call from worker threads.
    pub fn observe(&self, event: &SyncEvent<'_>) {
        if !self.enabled {
            return;
        }

        let Ok(mut current) = self.current.lock() else {
            return;
        };

        match event {
            SyncEvent::PassStarted { pass, root } => {
                let bar = self.create_pass_bar(*pass, count_files(root));
                if let Some(previous) = current.replace(bar) {
                    previous.finish_and_clear();
                }
            }
            SyncEvent::Entry { path, outcome, .. } => {
                if !counts_toward_total(outcome) {
                    return;
                }
                if let Some(bar) = current.as_ref() {
                    bar.set_message(path.display().to_string());
                    bar.inc(1);
                }
            }
            SyncEvent::PassFinished { .. } => {
                if let Some(bar) = current.take() {
                    bar.finish_and_clear();
                }
            }
            SyncEvent::Phase(_) => {}
        }
    }

    /// Clear any active progress bars (for clean output after completion).
    pub fn clear(&self) {
        if let Some(bar) = self.current.lock().ok().and_then(|mut c| c.take()) {
            bar.finish_and_clear();
        }
        self.multi.clear().ok();
    }
}

/// Whether an entry is among those `count_files` sized the bar with.
///
/// Walk failures are kept: they stand for files that were not reached.
const fn counts_toward_total(outcome: &EntryOutcome) -> bool {
    !matches!(outcome, EntryOutcome::Ignored)
}
