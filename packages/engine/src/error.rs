//! Error types for sync runs.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use treesync_copy::CopyError;
use treesync_detect::DetectError;

/// Which side of the sync a root path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRole {
    /// The tree being mirrored.
    Source,
    /// The tree being updated.
    Target,
}

impl fmt::Display for RootRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// A root directory failed validation. Fatal to the run.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The root could not be inspected.
    #[error("{role} directory {} is not accessible: {source}", path.display())]
    NotAccessible {
        /// Which root failed.
        role: RootRole,
        /// The root path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The root exists but is not a directory.
    #[error("{role} path {} is not a directory", path.display())]
    NotADirectory {
        /// Which root failed.
        role: RootRole,
        /// The root path.
        path: PathBuf,
    },

    /// The target root was missing and could not be created.
    #[error("Cannot create {role} directory {}: {source}", path.display())]
    CreateDir {
        /// Which root failed.
        role: RootRole,
        /// The root path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// One root is the other, or lies inside it.
    #[error("source {} and target {} overlap", source_root.display(), target_root.display())]
    Overlapping {
        /// The resolved source root.
        source_root: PathBuf,
        /// The resolved target root.
        target_root: PathBuf,
    },
}

/// Errors that abort a run before any file is touched.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The change detection method could not be resolved.
    #[error(transparent)]
    Method(#[from] DetectError),

    /// A root directory failed validation.
    #[error("Directory validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// A failure confined to a single entry of a pass.
///
/// These are recorded in the pass tally and never stop the walk.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The entry could not be expressed relative to its root.
    #[error("Cannot compute relative path for {} under {}", path.display(), root.display())]
    RelativePath {
        /// The entry path.
        path: PathBuf,
        /// The root it was expected under.
        root: PathBuf,
    },

    /// A counterpart path could not be inspected.
    #[error("Cannot stat {}: {source}", path.display())]
    Stat {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The destination exists but is a directory, symlink or special file.
    #[error("Destination {} exists but is not a regular file", path.display())]
    NotAFile {
        /// The destination path.
        path: PathBuf,
    },

    /// The change detector failed.
    #[error("Change detection failed: {0}")]
    Detect(#[from] DetectError),

    /// Copying the file failed.
    #[error("Transfer failed: {0}")]
    Transfer(#[from] CopyError),

    /// A file confirmed missing from the source could not be removed.
    #[error("Failed to delete {}: {source}", path.display())]
    Delete {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be read during the walk.
    #[error("Failed to read directory {}: {message}", path.display())]
    Walk {
        /// The directory that could not be read.
        path: PathBuf,
        /// Error message from the walker.
        message: String,
    },
}
