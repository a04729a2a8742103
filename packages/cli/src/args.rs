//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use treesync_config::{ConfigOverrides, LogLevel};

/// CLI arguments for treesync.
#[derive(Debug, Parser)]
#[command(
    name = "treesync",
    about = "Make a target directory tree mirror a source tree",
    version
)]
pub struct Args {
    /// Directory to copy from.
    #[arg(index = 1)]
    pub source: Option<PathBuf>,

    /// Directory to copy into (created if missing).
    #[arg(index = 2)]
    pub target: Option<PathBuf>,

    /// Delete target files that no longer exist in the source.
    #[arg(long)]
    pub delete_missing: bool,

    /// Change detection method: `modtime` or `sha256`.
    #[arg(long, value_name = "METHOD")]
    pub update_method: Option<String>,

    /// Log level: error, warn, info, debug or trace.
    #[arg(long, value_name = "LEVEL", value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Shorthand for `--log-level debug`.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Config file to use instead of discovering one.
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore config files.
    #[arg(long = "no-config")]
    pub no_config: bool,

    /// Worker threads per pass (0 = one per CPU).
    #[arg(long, short = 'j', value_name = "N")]
    pub jobs: Option<usize>,

    /// Write each copy to a temporary file and rename it into place.
    #[arg(long)]
    pub atomic: bool,

    /// Disable progress bars (useful for CI environments).
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Print the run report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Command line values that take precedence over the config file.
    ///
    /// Boolean flags only override when given; they cannot switch off a
    /// setting enabled in the config file.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source: self.source.clone(),
            target: self.target.clone(),
            delete_missing: self.delete_missing.then_some(true),
            update_method: self.update_method.clone(),
            log_level: self
                .log_level
                .or_else(|| self.verbose.then_some(LogLevel::Debug)),
            jobs: self.jobs,
            atomic: self.atomic.then_some(true),
        }
    }

    /// Determine if we should show progress bars.
    #[must_use]
    pub const fn should_show_progress(&self) -> bool {
        !self.no_progress && !self.json
    }
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    value.parse().map_err(|e: treesync_config::ConfigError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_roots() {
        let args = Args::try_parse_from(["treesync", "src", "dst"]).unwrap();
        let overrides = args.overrides();

        assert_eq!(overrides.source, Some(PathBuf::from("src")));
        assert_eq!(overrides.target, Some(PathBuf::from("dst")));
        assert_eq!(overrides.delete_missing, None);
        assert_eq!(overrides.atomic, None);
        assert!(args.should_show_progress());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "treesync",
            "--delete-missing",
            "--update-method",
            "sha256",
            "-j",
            "4",
            "--atomic",
            "--json",
            "a",
            "b",
        ])
        .unwrap();
        let overrides = args.overrides();

        assert_eq!(overrides.delete_missing, Some(true));
        assert_eq!(overrides.update_method.as_deref(), Some("sha256"));
        assert_eq!(overrides.jobs, Some(4));
        assert_eq!(overrides.atomic, Some(true));
        assert!(!args.should_show_progress());
    }

    #[test]
    fn test_verbose_yields_to_explicit_level() {
        let verbose = Args::try_parse_from(["treesync", "-v"]).unwrap();
        let both = Args::try_parse_from(["treesync", "-v", "--log-level", "ERROR"]).unwrap();

        assert_eq!(verbose.overrides().log_level, Some(LogLevel::Debug));
        assert_eq!(both.overrides().log_level, Some(LogLevel::Error));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Args::try_parse_from(["treesync", "--log-level", "loud"]).is_err());
        assert!(Args::try_parse_from(["treesync", "--jobs", "-1"]).is_err());
        assert!(Args::try_parse_from(["treesync", "--config", "x.toml", "--no-config"]).is_err());
        assert!(Args::try_parse_from(["treesync", "a", "b", "c"]).is_err());
    }
}
