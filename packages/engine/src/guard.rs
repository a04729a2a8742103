//! Root directory validation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{RootRole, ValidationError};

/// Validate both roots before any traversal.
///
/// The source must exist and be a directory. Roots that are the same
/// directory, or nested inside one another, are rejected before anything is
/// created. The target is then created, along with missing ancestors, when
/// absent; it must be a directory otherwise.
///
/// # Errors
///
/// * If the source is missing, inaccessible or not a directory
/// * If the target is not a directory or cannot be created
/// * If the roots overlap
pub fn validate_sync_roots(source: &Path, target: &Path) -> Result<(), ValidationError> {
    log::debug!(
        "Validating roots: source={} target={}",
        source.display(),
        target.display()
    );

    require_directory(RootRole::Source, source)?;

    let source_root = canonical(RootRole::Source, source)?;
    let target_root = resolve_pending(RootRole::Target, target)?;
    if source_root.starts_with(&target_root) || target_root.starts_with(&source_root) {
        return Err(ValidationError::Overlapping {
            source_root,
            target_root,
        });
    }

    ensure_directory(RootRole::Target, target)
}

fn require_directory(role: RootRole, path: &Path) -> Result<(), ValidationError> {
    let metadata = fs::metadata(path).map_err(|e| ValidationError::NotAccessible {
        role,
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.is_dir() {
        Ok(())
    } else {
        Err(ValidationError::NotADirectory {
            role,
            path: path.to_path_buf(),
        })
    }
}

fn ensure_directory(role: RootRole, path: &Path) -> Result<(), ValidationError> {
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(0o755);
            }
            builder
                .create(path)
                .map_err(|e| ValidationError::CreateDir {
                    role,
                    path: path.to_path_buf(),
                    source: e,
                })?;
            log::info!("Created {role} directory {}", path.display());
            Ok(())
        }
        _ => require_directory(role, path),
    }
}

/// Canonicalize the nearest existing ancestor of `path` and append the rest.
fn resolve_pending(role: RootRole, path: &Path) -> Result<PathBuf, ValidationError> {
    let absolute = std::path::absolute(path).map_err(|e| ValidationError::NotAccessible {
        role,
        path: path.to_path_buf(),
        source: e,
    })?;

    for ancestor in absolute.ancestors() {
        if let Ok(resolved) = fs::canonicalize(ancestor) {
            let rest = absolute.strip_prefix(ancestor).unwrap_or_else(|_| Path::new(""));
            return Ok(resolved.join(rest));
        }
    }

    Ok(absolute)
}

fn canonical(role: RootRole, path: &Path) -> Result<PathBuf, ValidationError> {
    fs::canonicalize(path).map_err(|e| ValidationError::NotAccessible {
        role,
        path: path.to_path_buf(),
        source: e,
    })
}
