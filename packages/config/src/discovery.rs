//! Configuration file discovery.
//!
//! Looks for `treesync.toml` in the working directory, then for
//! `treesync/config.toml` under the user's configuration directory.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const CONFIG_FILE_NAME: &str = "treesync.toml";

/// Find the configuration file that applies to `cwd`, if any.
#[must_use]
pub fn discover_config(cwd: &Path) -> Option<PathBuf> {
    let candidates = std::iter::once(cwd.join(CONFIG_FILE_NAME)).chain(user_config_path());
    first_existing(candidates)
}

/// `<config dir>/treesync/config.toml`, when the platform has a config dir.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("treesync").join("config.toml"))
}

fn first_existing(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    let found = candidates.into_iter().find(|path| {
        log::trace!("Checking for config at {}", path.display());
        path.is_file()
    });

    if let Some(path) = &found {
        log::debug!("Found config file {}", path.display());
    }

    found
}
