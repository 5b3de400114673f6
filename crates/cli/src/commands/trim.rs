use std::fs;

use anyhow::{Context, Result};
use include_trim_core::editor::FsEditor;
use include_trim_core::model::DecisionKind;
use include_trim_core::services::{
    FileOutcome, MinimizeOptions, Minimizer, PendingTrial, RunReport,
};

use crate::commands::{resolve_config, ConfigOverrides};
use crate::display_relative;

/// Run the minimizer over the configured tree and return its report.
pub fn run_trim(overrides: &ConfigOverrides) -> Result<RunReport> {
    run_trim_with(overrides, &PendingTrial::new())
}

/// Like [`run_trim`], publishing each in-flight trial to `pending` for an interrupt handler.
pub fn run_trim_with(overrides: &ConfigOverrides, pending: &PendingTrial) -> Result<RunReport> {
    let mut config = resolve_config(overrides)?;
    config.validate().context("Cannot start include minimization")?;

    let corpus = config.corpus();
    let oracle = config.oracle();
    let minimizer = Minimizer::new(&corpus, &FsEditor, &oracle)
        .with_options(MinimizeOptions { check_baseline: config.check_baseline })
        .with_pending(pending.clone());
    let report = minimizer
        .run(&config.root)
        .with_context(|| format!("Include minimization of {} failed", config.root.display()))?;
    Ok(report)
}

/// `trim`: minimize includes, then print a summary (or JSON) and optionally save the report.
pub fn trim_command(
    overrides: &ConfigOverrides,
    json: bool,
    report_path: Option<&str>,
    pending: &PendingTrial,
) -> Result<()> {
    let report = run_trim_with(overrides, pending)?;

    if let Some(path) = report_path {
        let body = serde_json::to_string_pretty(&report)?;
        fs::write(path, body).with_context(|| format!("Failed to write report to {}", path))?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_summary(&report);
    if let Some(path) = report_path {
        println!("Report written to {}", path);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    let root = report.root.as_path();
    let changed = report.changed_files();

    println!("Include trim complete:");
    println!("  Root: {}", root.display());
    println!("  Build: {}", report.build_command);
    println!(
        "  Files: {} ({} changed, {} skipped)",
        report.files.len(),
        changed.len(),
        report.skipped_count()
    );
    println!("  Removed includes: {}", report.removed_count());
    println!("  Kept includes: {}", report.kept_count());
    println!("  Duplicate includes: {}", report.already_absent_count());

    if !changed.is_empty() {
        println!();
        println!("Changed files:");
        for file in changed {
            let removed: Vec<&str> = file
                .decisions
                .iter()
                .filter(|d| d.kind == DecisionKind::Removed)
                .map(|d| d.header.as_str())
                .collect();
            println!("- {}: removed {}", display_relative(root, &file.path), removed.join(", "));
        }
    }

    let skipped: Vec<_> = report.files.iter().filter(|f| f.is_skipped()).collect();
    if !skipped.is_empty() {
        println!();
        println!("Skipped files:");
        for file in skipped {
            if let FileOutcome::Skipped { reason } = &file.outcome {
                println!("- {}: {}", display_relative(root, &file.path), reason);
            }
        }
    }
}
