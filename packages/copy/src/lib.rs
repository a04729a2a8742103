//! Single-file transfer for treesync.
//!
//! This crate provides the copy step of a sync pass:
//!
//! * Missing parent directories are created (mode `0755` on Unix)
//! * File contents are streamed from source to destination
//! * The source modification time is carried over to the destination
//! * An optional atomic mode stages the copy in a sibling temporary file
//! * Fast regular-file counting for progress display
//!
//! # Example
//!
//! ```rust,ignore
//! use treesync_copy::{CopyOptions, copy_file, count_files};
//!
//! let total = count_files(source_root);
//!
//! let result = copy_file(source, target, &CopyOptions { atomic: true })?;
//! println!("{} bytes copied", result.bytes_copied);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod copy;
mod count;
mod error;

pub use copy::{CopyOptions, CopyResult, copy_file, create_parent_dirs};
pub use count::count_files;
pub use error::CopyError;
