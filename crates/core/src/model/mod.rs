//! Core data model for a minimization run.
//!
//! - `SourceFile` / `SourceKind`: a discovered file and whether it looks like a header.
//! - `IncludeDirective`: one textual `#include` found in a file.
//! - `Snapshot`: an immutable capture of a file's content, keyed by its SHA-256 digest.
//! - `BuildVerdict`: the outcome of one build-oracle invocation.
//! - `Decision`: what happened to one include during the pass.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Extensions treated as headers. Everything else is reported as a source file.
const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "inc"];

/// Informational classification derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Source,
    Header,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if HEADER_EXTENSIONS.iter().any(|h| h.eq_ignore_ascii_case(ext)) {
            SourceKind::Header
        } else {
            SourceKind::Source
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Source => "source",
            SourceKind::Header => "header",
        }
    }
}

/// A candidate file discovered under the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = SourceKind::from_path(&path);
        Self { path, kind }
    }
}

/// Delimiter form used by an include directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeDelimiter {
    /// `#include <name>`
    Angle,
    /// `#include "name"`
    Quote,
}

/// A single include directive as it appeared in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeDirective {
    /// Header name between the delimiters, verbatim.
    pub header: String,
    pub delimiter: IncludeDelimiter,
    /// 1-based line number, for diagnostics only.
    pub line: usize,
}

/// Immutable capture of a file's full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    content: String,
    digest: String,
}

impl Snapshot {
    pub fn of(content: impl Into<String>) -> Self {
        let content = content.into();
        let digest = sha256_hex(content.as_bytes());
        Self { content, digest }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Lowercase hex SHA-256 of the content.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Byte-for-byte comparison against some other text.
    pub fn matches(&self, other: &str) -> bool {
        self.content == other
    }
}

/// Compute the SHA-256 of a byte slice as a hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{:x}", digest)
}

/// Result of one build-oracle invocation. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVerdict {
    pub passed: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub elapsed_ms: u64,
    /// Last lines of combined stdout/stderr, for diagnostics only.
    pub output_tail: String,
}

/// What the minimizer decided for one include of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// Removal verified by a passing build.
    Removed,
    /// Removal broke the build (or the build could not run) and was reverted.
    Kept,
    /// A repeated name whose lines were already removed by an earlier trial.
    AlreadyAbsent,
}

impl DecisionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Removed => "removed",
            DecisionKind::Kept => "kept",
            DecisionKind::AlreadyAbsent => "already_absent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub header: String,
    pub kind: DecisionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Decision {
    pub fn new(header: impl Into<String>, kind: DecisionKind) -> Self {
        Self { header: header.into(), kind, reason: None }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_kind_is_derived_from_extension() {
        assert_eq!(SourceFile::new("src/a.cpp").kind, SourceKind::Source);
        assert_eq!(SourceFile::new("src/a.c").kind, SourceKind::Source);
        assert_eq!(SourceFile::new("include/a.h").kind, SourceKind::Header);
        assert_eq!(SourceFile::new("include/a.HPP").kind, SourceKind::Header);
    }

    #[test]
    fn snapshot_matches_compares_bytes() {
        let snapshot = Snapshot::of("#include <a.h>\r\n");
        assert!(snapshot.matches("#include <a.h>\r\n"));
        assert!(!snapshot.matches("#include <a.h>\n"));
        assert!(!snapshot.matches("#include <b.h>\r\n"));
    }

    #[test]
    fn snapshot_digest_is_sha256_hex() {
        let snap = Snapshot::of("abc");
        assert_eq!(
            snap.digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(snap.matches("abc"));
        assert!(!snap.matches("abd"));
        assert!(!snap.matches("abc\n"));
    }
}
