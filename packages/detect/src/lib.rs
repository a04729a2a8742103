//! Change detection strategies for treesync.
//!
//! A [`ChangeDetector`] decides whether a destination file is stale with
//! respect to its source counterpart. Two strategies are provided:
//!
//! * [`ModTimeDetector`] - compares size and modification time (fast, metadata only)
//! * [`Sha256Detector`] - compares SHA-256 digests of the full contents
//!
//! Strategies are selected by name through [`detector_for`], which rejects
//! anything other than `modtime` or `sha256`.
//!
//! # Example
//!
//! ```rust,ignore
//! use treesync_detect::detector_for;
//!
//! let detector = detector_for("sha256")?;
//! if detector.needs_update(source, target)?.needs_update() {
//!     println!("{} is stale", target.display());
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod method;
mod modtime;
mod sha256;

use std::fmt;
use std::path::Path;

pub use error::DetectError;
pub use method::UpdateMethod;
pub use modtime::ModTimeDetector;
pub use sha256::{Sha256Detector, file_digest};

/// Outcome of comparing a source file with its destination counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeVerdict {
    /// The destination differs from the source and must be rewritten.
    NeedsUpdate,
    /// The destination already matches the source.
    UpToDate,
}

impl ChangeVerdict {
    /// Whether the destination must be rewritten.
    #[must_use]
    pub const fn needs_update(self) -> bool {
        matches!(self, Self::NeedsUpdate)
    }
}

impl From<bool> for ChangeVerdict {
    fn from(stale: bool) -> Self {
        if stale { Self::NeedsUpdate } else { Self::UpToDate }
    }
}

impl fmt::Display for ChangeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedsUpdate => write!(f, "needs-update"),
            Self::UpToDate => write!(f, "up-to-date"),
        }
    }
}

/// A strategy for deciding whether a destination file is stale.
///
/// Implementations hold no state between calls and may be shared across
/// worker threads.
pub trait ChangeDetector: fmt::Debug + Send + Sync {
    /// The method this detector implements.
    fn method(&self) -> UpdateMethod;

    /// Compare `source` against an existing `target`.
    ///
    /// # Errors
    ///
    /// * If either file cannot be inspected or read
    fn needs_update(&self, source: &Path, target: &Path) -> Result<ChangeVerdict, DetectError>;
}

/// Build the detector registered under `method`.
///
/// # Errors
///
/// * [`DetectError::UnsupportedMethod`] for any name other than `modtime` or `sha256`
pub fn detector_for(method: &str) -> Result<Box<dyn ChangeDetector>, DetectError> {
    let method: UpdateMethod = method.parse()?;
    log::debug!("Using {method} change detection");
    Ok(method.detector())
}
