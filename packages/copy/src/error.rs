//! Error types for copy operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Errors that can occur while transferring a single file.
///
/// Every variant is fatal for the file being copied only.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Failed to create a parent directory of the target.
    #[error("Failed to create directory {}: {io_error}", path.display())]
    CreateDirError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to open the source file for reading.
    #[error("Failed to open source {}: {io_error}", path.display())]
    OpenSourceError {
        /// The source path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to create or truncate the target file.
    #[error("Failed to create target {}: {io_error}", path.display())]
    CreateTargetError {
        /// The target (or staging) path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Streaming bytes from source to target failed.
    #[error("Failed to copy {} to {}: {io_error}", source_path.display(), target_path.display())]
    FileCopyError {
        /// Source file path.
        source_path: PathBuf,
        /// Target file path.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Renaming the staged copy over the target failed.
    #[error("Failed to replace {}: {io_error}", path.display())]
    PersistError {
        /// The target path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },
}
