//! Source corpus discovery and include extraction.
//!
//! Matching is purely textual: directives inside comments or `#if 0` blocks are reported
//! like any other line, and repeated names are not deduplicated.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ignore::WalkBuilder;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{TrimError, TrimResult};
use crate::model::{IncludeDelimiter, IncludeDirective, SourceFile};

/// Suffixes scanned when none are configured.
pub const DEFAULT_SUFFIXES: &[&str] = &[".c", ".cpp", ".h", ".hpp"];

/// Provider of candidate files and their include lists.
pub trait SourceCorpus {
    /// List candidate files under `root` in a deterministic order.
    fn discover(&self, root: &Path) -> TrimResult<Vec<SourceFile>>;

    /// Include directives of `path` in first-to-last textual order.
    fn extract_includes(&self, path: &Path) -> TrimResult<Vec<IncludeDirective>>;
}

/// Filesystem-backed corpus.
#[derive(Debug, Clone)]
pub struct FsCorpus {
    suffixes: Vec<String>,
    exclude: Vec<String>,
}

impl Default for FsCorpus {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(), Vec::new())
    }
}

impl FsCorpus {
    /// `exclude` holds directory names (not paths) pruned from the walk.
    pub fn new(suffixes: Vec<String>, exclude: Vec<String>) -> Self {
        Self { suffixes, exclude }
    }

    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    fn has_source_suffix(&self, path: &Path) -> bool {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        self.suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}

impl SourceCorpus for FsCorpus {
    fn discover(&self, root: &Path) -> TrimResult<Vec<SourceFile>> {
        if !root.is_dir() {
            return Err(TrimError::Discovery {
                root: root.to_path_buf(),
                message: "not a readable directory".to_string(),
            });
        }
        // Fail early on a root we cannot list; the walker would only report it per entry.
        fs::read_dir(root).map_err(|e| TrimError::Discovery {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;

        let exclude = self.exclude.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !exclude.iter().any(|e| e.as_str() == name)
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if is_file && self.has_source_suffix(entry.path()) {
                files.push(SourceFile::new(entry.path().to_path_buf()));
            }
        }
        debug!(root = %root.display(), count = files.len(), "discovered source files");
        Ok(files)
    }

    fn extract_includes(&self, path: &Path) -> TrimResult<Vec<IncludeDirective>> {
        let content = fs::read_to_string(path)
            .map_err(|source| TrimError::FileRead { path: path.to_path_buf(), source })?;
        Ok(parse_includes(&content))
    }
}

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*(?:<([^>\r\n]+)>|"([^"\r\n]+)")"#)
            .expect("include pattern is valid")
    })
}

/// Extract include directives from file text.
pub fn parse_includes(content: &str) -> Vec<IncludeDirective> {
    include_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let line = content[..start].matches('\n').count() + 1;
            let (header, delimiter) = match (caps.get(1), caps.get(2)) {
                (Some(m), _) => (m.as_str(), IncludeDelimiter::Angle),
                (None, Some(m)) => (m.as_str(), IncludeDelimiter::Quote),
                (None, None) => return None,
            };
            Some(IncludeDirective { header: header.to_string(), delimiter, line })
        })
        .collect()
}

/// Paths of discovered files, relative to `root` where possible.
pub fn relative_display(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).map(Path::to_path_buf).unwrap_or_else(|_| path.to_path_buf())
}
