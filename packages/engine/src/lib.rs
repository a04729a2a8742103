//! One-way directory synchronization engine.
//!
//! This crate makes a target tree match a source tree:
//!
//! * Root validation, creating the target when it is missing
//! * A copy pass that transfers new and stale files
//! * An optional sweep pass that removes files absent from the source
//! * Per-entry error isolation with aggregated [`Tally`] counters
//! * Progress events for UI integration
//!
//! # Example
//!
//! ```rust,ignore
//! use treesync_engine::{SyncOptions, run_sync};
//!
//! let options = SyncOptions::new(source, target).update_method("sha256");
//! let report = run_sync(&options, |event| println!("{event:?}"))?;
//! println!("{} copied, {} errors", report.copy.applied, report.copy.errors);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod event;
mod guard;
mod run;
mod sweep;
mod tally;
mod walk;
mod walker;

pub use error::{EntryError, RootRole, SyncError, ValidationError};
pub use event::{CopyKind, EntryOutcome, Pass, SyncEvent};
pub use guard::validate_sync_roots;
pub use run::{RunOutcome, RunPhase, RunReport, SyncOptions, Synchronizer, run_sync};
pub use sweep::sweep_missing;
pub use tally::{Tally, TallyTracker};
pub use treesync_copy::CopyOptions;
pub use treesync_detect::{ChangeDetector, ChangeVerdict, DetectError, UpdateMethod, detector_for};
pub use walker::diff_tree;

/// Options shared by both passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassOptions {
    /// Number of worker threads for per-file work. `1` keeps the pass on
    /// the calling thread.
    pub jobs: usize,
    /// How files are written during the copy pass.
    pub copy: CopyOptions,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            jobs: 1,
            copy: CopyOptions::default(),
        }
    }
}
