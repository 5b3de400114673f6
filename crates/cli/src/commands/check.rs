use anyhow::{anyhow, Context, Result};
use include_trim_core::model::BuildVerdict;
use include_trim_core::oracle::BuildOracle;

use crate::commands::{resolve_config, ConfigOverrides};

/// Run the build command once against the untouched tree.
pub fn run_check(overrides: &ConfigOverrides) -> Result<BuildVerdict> {
    let mut config = resolve_config(overrides)?;
    config.validate().context("Cannot run build check")?;
    let verdict = config.oracle().verify()?;
    Ok(verdict)
}

/// `check`: report whether the build currently passes; fails if it does not.
pub fn check_command(overrides: &ConfigOverrides) -> Result<()> {
    let verdict = run_check(overrides)?;
    let code = verdict.exit_code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string());
    if verdict.passed {
        println!("Build passed (exit code {}, {} ms)", code, verdict.elapsed_ms);
        return Ok(());
    }
    if !verdict.output_tail.is_empty() {
        eprintln!("{}", verdict.output_tail);
    }
    Err(anyhow!("Build failed (exit code {}, {} ms)", code, verdict.elapsed_ms))
}
