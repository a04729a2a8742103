//! Progress events emitted during a run.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::EntryError;
use crate::run::RunPhase;
use crate::tally::Tally;

/// One traversal of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pass {
    /// Walk the source and transfer new or stale files.
    Copy,
    /// Walk the target and remove files missing from the source.
    Sweep,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Sweep => write!(f, "sweep"),
        }
    }
}

/// Why a file was transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    /// The destination did not exist.
    New,
    /// The destination existed but was stale.
    Updated,
}

/// What happened to a single entry during a pass.
#[derive(Debug)]
pub enum EntryOutcome {
    /// The file was transferred.
    Copied {
        /// Whether the file was new or replaced a stale copy.
        kind: CopyKind,
        /// Bytes written.
        bytes: u64,
    },
    /// The destination already matched the source.
    UpToDate,
    /// The destination file was absent from the source and was removed.
    Deleted,
    /// The destination file still exists in the source and was kept.
    Kept,
    /// The entry is not a regular file (symlink, socket, device, ...) and was
    /// left alone.
    Ignored,
    /// The entry failed; the walk continues.
    Failed(EntryError),
}

impl EntryOutcome {
    /// Whether the entry resulted in a copy or a delete.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Copied { .. } | Self::Deleted)
    }

    /// Whether the entry was left untouched without error.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::UpToDate | Self::Kept | Self::Ignored)
    }

    /// The entry's error, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&EntryError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// A progress event. Consumers may ignore any of them.
#[derive(Debug)]
pub enum SyncEvent<'a> {
    /// The run moved to a new phase.
    Phase(RunPhase),
    /// A pass began walking `root`.
    PassStarted {
        /// The pass.
        pass: Pass,
        /// The tree being walked.
        root: &'a Path,
    },
    /// An entry was processed.
    ///
    /// `path` is relative to the walked root, or the full path when no
    /// relative form could be computed.
    Entry {
        /// The pass.
        pass: Pass,
        /// The entry path.
        path: &'a Path,
        /// What happened.
        outcome: &'a EntryOutcome,
    },
    /// A pass finished.
    PassFinished {
        /// The pass.
        pass: Pass,
        /// Final counters for the pass.
        tally: Tally,
    },
}
