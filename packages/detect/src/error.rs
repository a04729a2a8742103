//! Error types for change detection.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while comparing two files.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The requested change detection method is not known.
    #[error("Unsupported update method {0:?} (supported: modtime, sha256)")]
    UnsupportedMethod(String),

    /// Failed to get file metadata.
    #[error("Failed to stat {}: {source}", path.display())]
    Stat {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file contents for hashing.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
