//! Run orchestration: validate roots, copy, then optionally sweep.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use treesync_detect::{UpdateMethod, detector_for};

use crate::PassOptions;
use crate::error::SyncError;
use crate::event::SyncEvent;
use crate::guard::validate_sync_roots;
use crate::sweep::sweep_missing;
use crate::tally::Tally;
use crate::walker::diff_tree;

/// Everything a run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Tree to mirror.
    pub source: PathBuf,
    /// Tree to update.
    pub target: PathBuf,
    /// Name of the change detection method (`modtime` or `sha256`).
    pub update_method: String,
    /// Remove target files that are absent from the source.
    pub delete_missing: bool,
    /// Worker count and copy mode for both passes.
    pub pass: PassOptions,
}

impl SyncOptions {
    /// Options with `modtime` detection, no sweep and a single worker.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            update_method: UpdateMethod::ModTime.to_string(),
            delete_missing: false,
            pass: PassOptions::default(),
        }
    }

    /// Set the change detection method by name.
    #[must_use]
    pub fn update_method(mut self, method: impl Into<String>) -> Self {
        self.update_method = method.into();
        self
    }

    /// Enable or disable the sweep pass.
    #[must_use]
    pub const fn delete_missing(mut self, enabled: bool) -> Self {
        self.delete_missing = enabled;
        self
    }

    /// Set the worker count and copy mode.
    #[must_use]
    pub const fn pass_options(mut self, pass: PassOptions) -> Self {
        self.pass = pass;
        self
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunPhase {
    /// Not started; the change detector is resolved here.
    Idle,
    /// Checking and creating the root directories.
    ValidatingRoots,
    /// Running the copy pass.
    Copying,
    /// Running the sweep pass.
    Sweeping,
    /// Finished, successfully or not.
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ValidatingRoots => write!(f, "validating roots"),
            Self::Copying => write!(f, "copying"),
            Self::Sweeping => write!(f, "sweeping"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Overall result of a run that was not aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunOutcome {
    /// No entry failed in any pass.
    Success,
    /// Every pass ran to completion but at least one entry failed.
    CompletedWithErrors,
}

/// Counters for each pass of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// The change detection method used.
    pub update_method: UpdateMethod,
    /// Copy pass counters.
    pub copy: Tally,
    /// Sweep pass counters, when the sweep ran.
    pub sweep: Option<Tally>,
}

impl RunReport {
    /// Whether any pass recorded an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.copy.has_errors() || self.sweep.is_some_and(|t| t.has_errors())
    }

    /// Collapse the per-pass counters into a single outcome.
    #[must_use]
    pub fn outcome(&self) -> RunOutcome {
        if self.has_errors() {
            RunOutcome::CompletedWithErrors
        } else {
            RunOutcome::Success
        }
    }
}

/// Drives one run through its phases.
///
/// Strategy resolution and root validation are fatal; once the copy pass has
/// started, every reached pass runs to completion and per-entry failures only
/// show up in the returned [`RunReport`].
pub struct Synchronizer<F> {
    options: SyncOptions,
    phase: RunPhase,
    on_event: F,
}

impl<F> Synchronizer<F>
where
    F: Fn(&SyncEvent<'_>) + Sync,
{
    /// Prepare a run. Nothing touches the filesystem until [`Self::run`].
    #[must_use]
    pub const fn new(options: SyncOptions, on_event: F) -> Self {
        Self {
            options,
            phase: RunPhase::Idle,
            on_event,
        }
    }

    /// The phase the run is in.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Execute the run.
    ///
    /// # Errors
    ///
    /// * [`SyncError::Method`] if the update method is not supported
    /// * [`SyncError::Validation`] if a root directory fails validation
    pub fn run(&mut self) -> Result<RunReport, SyncError> {
        self.enter(RunPhase::Idle);
        log::info!(
            "Starting synchronization from {} to {}",
            self.options.source.display(),
            self.options.target.display()
        );

        let detector = match detector_for(&self.options.update_method) {
            Ok(detector) => detector,
            Err(e) => {
                log::error!("Failed to create update strategy: {e}");
                self.enter(RunPhase::Done);
                return Err(e.into());
            }
        };

        self.enter(RunPhase::ValidatingRoots);
        if let Err(e) = validate_sync_roots(&self.options.source, &self.options.target) {
            log::error!("Directory validation failed: {e}");
            self.enter(RunPhase::Done);
            return Err(e.into());
        }

        self.enter(RunPhase::Copying);
        let copy = diff_tree(
            &self.options.source,
            &self.options.target,
            detector.as_ref(),
            &self.options.pass,
            &self.on_event,
        );

        let sweep = if self.options.delete_missing {
            self.enter(RunPhase::Sweeping);
            Some(sweep_missing(
                &self.options.source,
                &self.options.target,
                &self.options.pass,
                &self.on_event,
            ))
        } else {
            log::debug!("Skipping sweep (delete missing disabled)");
            None
        };

        self.enter(RunPhase::Done);

        let report = RunReport {
            update_method: detector.method(),
            copy,
            sweep,
        };
        match report.outcome() {
            RunOutcome::Success => log::info!("Synchronization completed successfully"),
            RunOutcome::CompletedWithErrors => {
                log::warn!("Synchronization completed with errors - check logs for details");
            }
        }

        Ok(report)
    }

    fn enter(&mut self, phase: RunPhase) {
        log::debug!("Run phase: {} -> {phase}", self.phase);
        self.phase = phase;
        (self.on_event)(&SyncEvent::Phase(phase));
    }
}

/// Run a complete sync with `options`.
///
/// # Errors
///
/// * [`SyncError::Method`] if the update method is not supported
/// * [`SyncError::Validation`] if a root directory fails validation
pub fn run_sync<F>(options: &SyncOptions, on_event: F) -> Result<RunReport, SyncError>
where
    F: Fn(&SyncEvent<'_>) + Sync,
{
    Synchronizer::new(options.clone(), on_event).run()
}
