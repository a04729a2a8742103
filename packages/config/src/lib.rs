//! Configuration loading for treesync.
//!
//! Settings come from three layers, highest precedence first:
//!
//! * Command line overrides ([`ConfigOverrides`])
//! * An optional TOML file (`treesync.toml`, or the user config file)
//! * Built-in defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use treesync_config::{ConfigOverrides, Settings, discover_config, load_config};
//!
//! let loaded = discover_config(&cwd).map(|p| load_config(&p)).transpose()?;
//! let settings = Settings::resolve(loaded.as_ref(), &ConfigOverrides::default())?;
//! println!("{} -> {}", settings.source.display(), settings.target.display());
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod discovery;
mod error;
mod settings;
mod toml_loader;
mod types;

pub use discovery::{CONFIG_FILE_NAME, discover_config, user_config_path};
pub use error::ConfigError;
pub use settings::{ConfigOverrides, Settings};
pub use toml_loader::load_toml_config;
pub use types::{FileConfig, LoadedConfig, LogLevel};

use std::path::Path;

/// Load a configuration file along with its location.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed
/// * If the path has no parent directory
pub fn load_config(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let config = load_toml_config(path)?;

    let config_dir = path
        .parent()
        .ok_or_else(|| ConfigError::InvalidPath(path.to_path_buf()))?
        .to_path_buf();

    Ok(LoadedConfig {
        config,
        config_path: path.to_path_buf(),
        config_dir,
    })
}
