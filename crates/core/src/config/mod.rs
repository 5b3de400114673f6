use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::corpus::{FsCorpus, DEFAULT_SUFFIXES};
use crate::error::{TrimError, TrimResult};
use crate::oracle::ShellOracle;

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_suffixes() -> Vec<String> {
    DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect()
}

/// Serializable configuration for a minimization run.
///
/// Usually passed entirely on the command line; may also be loaded from a YAML or JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Project root: files are discovered here and the build command runs here.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Shell command whose exit status decides whether the tree builds.
    #[serde(default)]
    pub build_command: String,
    /// File-name suffixes treated as sources/headers.
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    /// Directory names skipped during discovery (e.g. `third_party`).
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Run the build once before editing and abort if it already fails.
    #[serde(default)]
    pub check_baseline: bool,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            build_command: String::new(),
            suffixes: default_suffixes(),
            exclude: Vec::new(),
            check_baseline: false,
        }
    }
}

impl TrimConfig {
    pub fn new(root: impl Into<PathBuf>, build_command: impl Into<String>) -> Self {
        Self { root: root.into(), build_command: build_command.into(), ..Self::default() }
    }

    /// Normalize suffixes to a leading dot and reject unusable settings.
    pub fn validate(&mut self) -> TrimResult<()> {
        if self.build_command.trim().is_empty() {
            return Err(TrimError::Config("build command is required".to_string()));
        }
        self.suffixes = normalize_suffixes(&self.suffixes);
        if self.suffixes.is_empty() {
            return Err(TrimError::Config("at least one source suffix is required".to_string()));
        }
        Ok(())
    }

    pub fn corpus(&self) -> FsCorpus {
        FsCorpus::new(normalize_suffixes(&self.suffixes), self.exclude.clone())
    }

    pub fn oracle(&self) -> ShellOracle {
        ShellOracle::new(&self.root, &self.build_command)
    }
}

/// `cpp` and `.cpp` are equivalent; blanks are dropped and duplicates collapsed.
pub fn normalize_suffixes(suffixes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in suffixes {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "." {
            continue;
        }
        let suffix =
            if trimmed.starts_with('.') { trimmed.to_string() } else { format!(".{trimmed}") };
        if !out.contains(&suffix) {
            out.push(suffix);
        }
    }
    out
}

/// Load a config file (`.yaml`, `.yml` or `.json`).
///
/// A relative `root` is resolved against the directory holding the file.
pub fn load_config(path: &Path) -> Result<TrimConfig> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    let mut config: TrimConfig = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&body)
            .with_context(|| format!("Failed to parse YAML config {}", path.display()))?,
        "json" => serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse JSON config {}", path.display()))?,
        other => {
            return Err(anyhow!(
                "Unsupported config format '{}' for {} (expected yaml, yml or json)",
                other,
                path.display()
            ))
        }
    };
    if config.root.is_relative() {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.root = base.join(&config.root);
    }
    Ok(config)
}
