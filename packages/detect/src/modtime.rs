//! Size and modification time comparison.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::error::DetectError;
use crate::{ChangeDetector, ChangeVerdict, UpdateMethod};

/// Detects changes by comparing file size and modification time.
///
/// Only metadata is read, so this is constant-time per file. Two files with
/// the same size and timestamp but different bytes are reported up to date,
/// and a touched but otherwise identical file is reported stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModTimeDetector;

/// Size and modification time of a single file.
fn stamp(path: &Path) -> Result<(u64, SystemTime), DetectError> {
    let stat_error = |source| DetectError::Stat {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(stat_error)?;
    let modified = metadata.modified().map_err(stat_error)?;

    Ok((metadata.len(), modified))
}

impl ChangeDetector for ModTimeDetector {
    fn method(&self) -> UpdateMethod {
        UpdateMethod::ModTime
    }

    fn needs_update(&self, source: &Path, target: &Path) -> Result<ChangeVerdict, DetectError> {
        let (source_len, source_modified) = stamp(source)?;
        let (target_len, target_modified) = stamp(target)?;

        if source_len != target_len {
            log::trace!(
                "Size differs for {}: {source_len} != {target_len}",
                target.display()
            );
            return Ok(ChangeVerdict::NeedsUpdate);
        }

        // SystemTime equality keeps the full precision the filesystem reports.
        Ok(ChangeVerdict::from(source_modified != target_modified))
    }
}
