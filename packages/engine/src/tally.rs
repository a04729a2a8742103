//! Per-pass counters.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::event::EntryOutcome;

/// Counters produced by one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Entries visited (regular files and ignored special entries).
    pub seen: u64,
    /// Files copied (copy pass) or deleted (sweep pass).
    pub applied: u64,
    /// Entries left untouched without error.
    pub skipped: u64,
    /// Entries that failed, plus directory enumeration failures.
    pub errors: u64,
}

impl Tally {
    /// Whether any entry failed during the pass.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Thread-safe tally accumulator using atomics.
///
/// Workers record outcomes concurrently; [`TallyTracker::snapshot`] produces
/// the final [`Tally`] once the pass is done.
#[derive(Debug, Default)]
pub struct TallyTracker {
    seen: AtomicU64,
    applied: AtomicU64,
    skipped: AtomicU64,
    errors: AtomicU64,
}

impl TallyTracker {
    /// Create a tracker with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a visited entry.
    pub fn increment_seen(&self) {
        self.seen.fetch_add(1, Ordering::SeqCst);
    }

    /// Count a failure that is not tied to a visited entry.
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    /// Count the outcome of a visited entry.
    pub fn record(&self, outcome: &EntryOutcome) {
        let counter = if outcome.is_applied() {
            &self.applied
        } else if outcome.is_skipped() {
            &self.skipped
        } else {
            &self.errors
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Get the current counters.
    #[must_use]
    pub fn snapshot(&self) -> Tally {
        Tally {
            seen: self.seen.load(Ordering::SeqCst),
            applied: self.applied.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            errors: self.errors.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntryError;
    use crate::event::CopyKind;
    use std::path::PathBuf;

    #[test]
    fn test_record_routes_outcomes() {
        let tracker = TallyTracker::new();

        for outcome in [
            EntryOutcome::Copied {
                kind: CopyKind::New,
                bytes: 3,
            },
            EntryOutcome::Deleted,
            EntryOutcome::UpToDate,
            EntryOutcome::Kept,
            EntryOutcome::Ignored,
            EntryOutcome::Failed(EntryError::NotAFile {
                path: PathBuf::from("x"),
            }),
        ] {
            tracker.increment_seen();
            tracker.record(&outcome);
        }
        tracker.increment_errors();

        let tally = tracker.snapshot();
        assert_eq!(
            tally,
            Tally {
                seen: 6,
                applied: 2,
                skipped: 3,
                errors: 2,
            }
        );
        assert!(tally.has_errors());
    }

    #[test]
    fn test_default_tally_is_clean() {
        assert!(!TallyTracker::new().snapshot().has_errors());
    }
}
