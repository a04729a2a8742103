//! Error types for configuration loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config {}: {source}", path.display())]
    TomlParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Unknown log level name.
    #[error("Invalid log level {0:?} (expected error, warn, info, debug or trace)")]
    InvalidLogLevel(String),

    /// Neither the command line nor the config file named a root.
    #[error("No {0} directory given (pass it as an argument or set `{0}` in the config file)")]
    MissingRoot(&'static str),

    /// Invalid configuration path.
    #[error("Invalid config path: {}", .0.display())]
    InvalidPath(PathBuf),
}
