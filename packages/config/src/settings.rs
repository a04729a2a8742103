//! Layered settings resolution.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::{LoadedConfig, LogLevel};

const DEFAULT_UPDATE_METHOD: &str = "modtime";

/// Values given on the command line. `None` defers to the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Source directory, used as given.
    pub source: Option<PathBuf>,
    /// Target directory, used as given.
    pub target: Option<PathBuf>,
    /// Remove target files that are absent from the source.
    pub delete_missing: Option<bool>,
    /// Change detection method name.
    pub update_method: Option<String>,
    /// Logging verbosity.
    pub log_level: Option<LogLevel>,
    /// Worker threads per pass; `0` means one per CPU.
    pub jobs: Option<usize>,
    /// Stage copies in a temporary file and rename them into place.
    pub atomic: Option<bool>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Tree to mirror.
    pub source: PathBuf,
    /// Tree to update.
    pub target: PathBuf,
    /// Whether the sweep pass runs.
    pub delete_missing: bool,
    /// Change detection method name. Unvalidated; unknown names are rejected
    /// when the run starts.
    pub update_method: String,
    /// Logging verbosity.
    pub log_level: LogLevel,
    /// Worker threads per pass. Always at least 1.
    pub jobs: usize,
    /// Stage copies in a temporary file and rename them into place.
    pub atomic: bool,
    /// The config file that contributed, if any.
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Merge overrides, the config file and defaults, in that order.
    ///
    /// Relative roots from the config file are resolved against the
    /// directory holding it. Command line roots are used as given.
    ///
    /// # Errors
    ///
    /// * If no layer names a source or a target directory
    pub fn resolve(
        loaded: Option<&LoadedConfig>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = loaded.map(|l| &l.config);
        let config_dir = loaded.map(|l| l.config_dir.as_path());

        let source = pick_root(
            overrides.source.as_ref(),
            file.and_then(|f| f.source.as_ref()),
            config_dir,
            "source",
        )?;
        let target = pick_root(
            overrides.target.as_ref(),
            file.and_then(|f| f.target.as_ref()),
            config_dir,
            "target",
        )?;

        let jobs = overrides
            .jobs
            .or_else(|| file.and_then(|f| f.jobs))
            .unwrap_or(1);

        Ok(Self {
            source,
            target,
            delete_missing: overrides
                .delete_missing
                .or_else(|| file.and_then(|f| f.delete_missing))
                .unwrap_or(false),
            update_method: overrides
                .update_method
                .clone()
                .or_else(|| file.and_then(|f| f.update_method.clone()))
                .unwrap_or_else(|| DEFAULT_UPDATE_METHOD.to_string()),
            log_level: overrides
                .log_level
                .or_else(|| file.and_then(|f| f.log_level))
                .unwrap_or_default(),
            jobs: if jobs == 0 { num_cpus::get().max(1) } else { jobs },
            atomic: overrides
                .atomic
                .or_else(|| file.and_then(|f| f.atomic))
                .unwrap_or(false),
            config_path: loaded.map(|l| l.config_path.clone()),
        })
    }
}

fn pick_root(
    cli: Option<&PathBuf>,
    from_file: Option<&PathBuf>,
    config_dir: Option<&Path>,
    name: &'static str,
) -> Result<PathBuf, ConfigError> {
    cli.cloned()
        .or_else(|| from_file.map(|p| relative_to_config(p, config_dir)))
        .ok_or(ConfigError::MissingRoot(name))
}

fn relative_to_config(path: &Path, config_dir: Option<&Path>) -> PathBuf {
    match config_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    }
}
