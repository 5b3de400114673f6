use std::path::Path;

use anyhow::{Context, Result};
use include_trim_core::config::{load_config, TrimConfig};

use crate::canonicalize_or_current;

/// Settings given on the command line; anything set here wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<String>,
    pub build_command: Option<String>,
    pub config: Option<String>,
    pub suffixes: Vec<String>,
    pub exclude: Vec<String>,
    pub check_baseline: bool,
}

/// Merge an optional config file with command-line overrides and absolutize the root.
///
/// Validation is left to the caller: `scan` has no use for a build command.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<TrimConfig> {
    let mut config = match overrides.config.as_deref() {
        Some(path) => load_config(Path::new(path))?,
        None => TrimConfig::default(),
    };

    if let Some(root) = overrides.root.as_deref() {
        config.root = root.into();
    }
    let root_str = config.root.to_string_lossy().to_string();
    config.root = canonicalize_or_current(&root_str)
        .with_context(|| format!("Failed to resolve project root {}", root_str))?;

    if let Some(cmd) = overrides.build_command.as_ref() {
        config.build_command = cmd.clone();
    }
    if !overrides.suffixes.is_empty() {
        config.suffixes = overrides.suffixes.clone();
    }
    if !overrides.exclude.is_empty() {
        config.exclude = overrides.exclude.clone();
    }
    if overrides.check_baseline {
        config.check_baseline = true;
    }
    Ok(config)
}
