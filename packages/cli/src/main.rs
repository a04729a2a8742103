//! treesync CLI entry point.
//!
//! Makes a target directory tree mirror a source tree, one way.
//!
//! Exit status: `0` when every entry synced, `1` when the run finished with
//! per-file errors, `2` when it was aborted or the configuration is invalid.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod output;
mod progress;

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use path_clean::PathClean;

use args::Args;
use progress::ProgressManager;
use treesync_config::{ConfigError, LoadedConfig, Settings, discover_config, load_config};
use treesync_engine::{CopyOptions, PassOptions, RunOutcome, SyncEvent, SyncOptions, run_sync};

const EXIT_COMPLETED_WITH_ERRORS: u8 = 1;
const EXIT_ABORTED: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match resolve_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            output::print_error(&e.to_string());
            return ExitCode::from(EXIT_ABORTED);
        }
    };

    pretty_env_logger::formatted_builder()
        .filter_level(settings.log_level.to_level_filter())
        .init();

    if let Some(path) = &settings.config_path {
        log::debug!("Using config file {}", path.display());
    }

    match run(&args, &settings) {
        Ok(RunOutcome::Success) => ExitCode::SUCCESS,
        Ok(RunOutcome::CompletedWithErrors) => ExitCode::from(EXIT_COMPLETED_WITH_ERRORS),
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

/// Merge the command line with the config file and make the roots absolute.
fn resolve_settings(args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    let cwd = env::current_dir()?;
    let loaded = load_layered_config(args, &cwd)?;

    let mut settings = Settings::resolve(loaded.as_ref(), &args.overrides())?;
    settings.source = absolute(&cwd, &settings.source);
    settings.target = absolute(&cwd, &settings.target);

    Ok(settings)
}

fn load_layered_config(args: &Args, cwd: &Path) -> Result<Option<LoadedConfig>, ConfigError> {
    if args.no_config {
        return Ok(None);
    }

    let path = match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => discover_config(cwd),
    };

    path.map(|p| load_config(&p)).transpose()
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path).clean()
}

/// Run the sync and print its report.
fn run(args: &Args, settings: &Settings) -> Result<RunOutcome, Box<dyn std::error::Error>> {
    let options = SyncOptions::new(settings.source.clone(), settings.target.clone())
        .update_method(settings.update_method.clone())
        .delete_missing(settings.delete_missing)
        .pass_options(PassOptions {
            jobs: settings.jobs,
            copy: CopyOptions {
                atomic: settings.atomic,
            },
        });

    if !args.json {
        output::print_header(&options.source, &options.target, &options.update_method);
    }

    let progress_mgr = ProgressManager::new(args.should_show_progress());
    let result = run_sync(&options, |event: &SyncEvent<'_>| progress_mgr.observe(event));
    progress_mgr.clear();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
        match report.outcome() {
            RunOutcome::Success => output::print_success(),
            RunOutcome::CompletedWithErrors => output::print_completed_with_errors(&report),
        }
    }

    Ok(report.outcome())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("treesync").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_absolute_cleans_relative_roots() {
        let cwd = Path::new("/work/dir");

        assert_eq!(absolute(cwd, Path::new("./a/../b")), PathBuf::from("/work/dir/b"));
        assert_eq!(absolute(cwd, Path::new("/abs/x/")), PathBuf::from("/abs/x"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let args = parse(&["--config", "missing.toml"]);

        assert!(matches!(
            load_layered_config(&args, dir.path()),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_local_config_discovered_unless_disabled() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("treesync.toml"),
            "source = \"data\"\nupdate-method = \"sha256\"\n",
        )
        .unwrap();

        let loaded = load_layered_config(&parse(&[]), dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(loaded.config.update_method.as_deref(), Some("sha256"));
        assert_eq!(loaded.config_dir, dir.path());

        assert!(
            load_layered_config(&parse(&["--no-config"]), dir.path())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_run_reports_outcome() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.txt"), "a").unwrap();
        fs::write(source.join("sub/b.txt"), "b").unwrap();

        let args = parse(&["--no-progress", "--no-config"]);
        let settings = Settings::resolve(
            None,
            &treesync_config::ConfigOverrides {
                source: Some(source),
                target: Some(target.clone()),
                ..args.overrides()
            },
        )
        .unwrap();

        assert_eq!(run(&args, &settings).unwrap(), RunOutcome::Success);
        assert_eq!(fs::read_to_string(target.join("sub/b.txt")).unwrap(), "b");
    }

    #[test]
    fn test_run_aborts_on_unknown_method() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let args = parse(&["--no-progress", "--update-method", "lz4"]);
        let settings = Settings::resolve(
            None,
            &treesync_config::ConfigOverrides {
                source: Some(source),
                target: Some(dir.path().join("target")),
                ..args.overrides()
            },
        )
        .unwrap();

        assert!(run(&args, &settings).is_err());
        assert!(!dir.path().join("target").exists());
    }
}
