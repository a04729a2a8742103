//! Terminal output formatting.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use colored::Colorize;
use treesync_engine::{Pass, RunReport, Tally};

/// Print a header message.
pub fn print_header(source: &Path, target: &Path, method: &str) {
    println!(
        "\n{} {} {} {} ({})\n",
        "🔁",
        source.display().to_string().cyan(),
        "→".dimmed(),
        target.display().to_string().cyan(),
        method.dimmed()
    );
}

/// Print the counters of one pass.
pub fn print_pass_summary(pass: Pass, tally: &Tally) {
    let (applied, skipped) = match pass {
        Pass::Copy => ("copied", "up to date"),
        Pass::Sweep => ("deleted", "kept"),
    };
    let marker = if tally.has_errors() {
        "✗".red()
    } else {
        "✓".green()
    };
    let errors = format!("{} errors", tally.errors);

    println!(
        "{} {:<6} {} seen, {} {}, {} {}, {}",
        marker,
        pass.to_string().bold(),
        tally.seen,
        tally.applied,
        applied,
        tally.skipped,
        skipped,
        if tally.has_errors() {
            errors.red()
        } else {
            errors.dimmed()
        }
    );
}

/// Print both pass summaries.
pub fn print_report(report: &RunReport) {
    print_pass_summary(Pass::Copy, &report.copy);
    if let Some(sweep) = &report.sweep {
        print_pass_summary(Pass::Sweep, sweep);
    }
    println!();
}

/// Print success message.
pub fn print_success() {
    println!("{} Sync complete!", "✅");
}

/// Print the completed-with-errors message.
pub fn print_completed_with_errors(report: &RunReport) {
    let errors = report.copy.errors + report.sweep.map_or(0, |t| t.errors);
    println!(
        "{} Sync finished with {} error{} (see log output)",
        "⚠️",
        errors.to_string().red().bold(),
        if errors == 1 { "" } else { "s" }
    );
}

/// Print error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
