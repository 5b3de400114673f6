//! Greedy, order-sensitive include minimization.
//!
//! For each discovered file, every include (in textual order) is removed, the build oracle is
//! consulted, and the removal is either accepted or reverted. Removals accumulate: each trial
//! runs against the file with all previously accepted removals applied, and a failed trial is
//! reverted to exactly that state, never to the pristine original.
//!
//! The working snapshot only advances after a passing build, so at every point the file on
//! disk is either the last verified state or a single pending trial on top of it.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::corpus::SourceCorpus;
use crate::editor::IncludeEditor;
use crate::error::{TrimError, TrimResult};
use crate::model::{BuildVerdict, Decision, DecisionKind, Snapshot, SourceFile, SourceKind};
use crate::oracle::BuildOracle;
use crate::services::pending::PendingTrial;

/// Knobs that change how a run starts; the per-file algorithm has none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimizeOptions {
    /// Verify the untouched tree builds before editing anything.
    pub check_baseline: bool,
}

/// How processing of a single file ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Every include was tried.
    Minimized,
    /// Processing stopped early because of a file-scoped I/O fault.
    Skipped { reason: String },
}

/// Per-file record of decisions and content digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// Digest before the pass; `None` if the file could not be read.
    pub original_digest: Option<String>,
    /// Digest of the content left on disk.
    pub final_digest: Option<String>,
    pub decisions: Vec<Decision>,
    pub outcome: FileOutcome,
}

impl FileReport {
    fn started(file: &SourceFile, original: &Snapshot) -> Self {
        Self {
            path: file.path.clone(),
            kind: file.kind,
            original_digest: Some(original.digest().to_string()),
            final_digest: Some(original.digest().to_string()),
            decisions: Vec::new(),
            outcome: FileOutcome::Minimized,
        }
    }

    fn skipped(file: &SourceFile, reason: String) -> Self {
        Self {
            path: file.path.clone(),
            kind: file.kind,
            original_digest: None,
            final_digest: None,
            decisions: Vec::new(),
            outcome: FileOutcome::Skipped { reason },
        }
    }

    pub fn count(&self, kind: DecisionKind) -> usize {
        self.decisions.iter().filter(|d| d.kind == kind).count()
    }

    pub fn is_changed(&self) -> bool {
        self.original_digest.is_some() && self.original_digest != self.final_digest
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, FileOutcome::Skipped { .. })
    }
}

/// Summary of a complete run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub build_command: String,
    pub started_at: String,
    pub finished_at: String,
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn removed_count(&self) -> usize {
        self.files.iter().map(|f| f.count(DecisionKind::Removed)).sum()
    }

    pub fn kept_count(&self) -> usize {
        self.files.iter().map(|f| f.count(DecisionKind::Kept)).sum()
    }

    /// Repeated directives that went away with an earlier trial of the same header.
    pub fn already_absent_count(&self) -> usize {
        self.files.iter().map(|f| f.count(DecisionKind::AlreadyAbsent)).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_skipped()).count()
    }

    pub fn changed_files(&self) -> Vec<&FileReport> {
        self.files.iter().filter(|f| f.is_changed()).collect()
    }
}

/// Drives corpus, editor and oracle. Holds no state between files.
pub struct Minimizer<'a> {
    pub corpus: &'a dyn SourceCorpus,
    pub editor: &'a dyn IncludeEditor,
    pub oracle: &'a dyn BuildOracle,
    pub options: MinimizeOptions,
    /// Trial currently on disk, shared with whoever handles interrupts.
    pub pending: PendingTrial,
}

impl<'a> Minimizer<'a> {
    pub fn new(
        corpus: &'a dyn SourceCorpus,
        editor: &'a dyn IncludeEditor,
        oracle: &'a dyn BuildOracle,
    ) -> Self {
        Self {
            corpus,
            editor,
            oracle,
            options: MinimizeOptions::default(),
            pending: PendingTrial::default(),
        }
    }

    pub fn with_options(mut self, options: MinimizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_pending(mut self, pending: PendingTrial) -> Self {
        self.pending = pending;
        self
    }

    /// Minimize every file discovered under `root`, in discovery order.
    ///
    /// File-scoped faults are recorded as skipped files; only fatal errors end the run early.
    pub fn run(&self, root: &Path) -> TrimResult<RunReport> {
        let started_at = Utc::now().to_rfc3339();
        if self.options.check_baseline {
            self.check_baseline()?;
        }

        let files = self.corpus.discover(root)?;
        info!(
            root = %root.display(),
            files = files.len(),
            build = %self.oracle.describe(),
            "starting include minimization"
        );

        let mut reports = Vec::with_capacity(files.len());
        for file in &files {
            match self.minimize_file(file) {
                Ok(report) => reports.push(report),
                Err(err) if err.is_fatal() => {
                    error!(file = %file.path.display(), error = %err, "aborting run");
                    return Err(err);
                }
                Err(err) => {
                    warn!(file = %file.path.display(), error = %err, "skipping file");
                    reports.push(FileReport::skipped(file, err.to_string()));
                }
            }
        }

        let report = RunReport {
            root: root.to_path_buf(),
            build_command: self.oracle.describe(),
            started_at,
            finished_at: Utc::now().to_rfc3339(),
            files: reports,
        };
        info!(
            removed = report.removed_count(),
            kept = report.kept_count(),
            skipped = report.skipped_count(),
            "include minimization complete"
        );
        Ok(report)
    }

    /// Run the oracle once against the untouched tree.
    pub fn check_baseline(&self) -> TrimResult<BuildVerdict> {
        match self.oracle.verify() {
            Ok(verdict) if verdict.passed => Ok(verdict),
            Ok(verdict) => Err(TrimError::BaselineBroken(format!(
                "`{}` exited with {}",
                self.oracle.describe(),
                verdict.exit_code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".into())
            ))),
            Err(err) => Err(TrimError::BaselineBroken(err.to_string())),
        }
    }

    /// Process one file to completion.
    ///
    /// Read faults before the first edit surface as `Err` (the file is untouched). A write
    /// fault mid-pass restores the last verified state and returns a skipped report that keeps
    /// the decisions made so far.
    pub fn minimize_file(&self, file: &SourceFile) -> TrimResult<FileReport> {
        let path = file.path.as_path();
        let includes = self.corpus.extract_includes(path)?;
        let original = self.editor.read(path)?;
        let mut report = FileReport::started(file, &original);
        let mut current = original;

        for directive in &includes {
            let header = directive.header.as_str();
            // Registered until the verdict is handled; an interrupt restores `current`.
            let (_trial_guard, edited) =
                self.pending.start(path, &current, || self.editor.remove_include(path, header));
            let trial = match edited {
                Ok(trial) => trial,
                Err(err) => {
                    self.restore(path, &current)?;
                    warn!(
                        file = %path.display(),
                        header,
                        error = %err,
                        "edit failed; file left at last verified state"
                    );
                    report.final_digest = Some(current.digest().to_string());
                    report.outcome = FileOutcome::Skipped { reason: err.to_string() };
                    return Ok(report);
                }
            };

            if trial.digest() == current.digest() {
                report.decisions.push(Decision::new(header, DecisionKind::AlreadyAbsent));
                continue;
            }

            let decision = match self.oracle.verify() {
                Ok(verdict) if verdict.passed => {
                    info!(file = %path.display(), header, "removed unnecessary include");
                    current = trial;
                    Decision::new(header, DecisionKind::Removed)
                }
                Ok(verdict) => {
                    self.restore(path, &current)?;
                    info!(
                        file = %path.display(),
                        header,
                        exit_code = ?verdict.exit_code,
                        "kept include"
                    );
                    Decision::new(header, DecisionKind::Kept)
                }
                Err(err) => {
                    self.restore(path, &current)?;
                    warn!(
                        file = %path.display(),
                        header,
                        error = %err,
                        "build could not run; kept include"
                    );
                    Decision::new(header, DecisionKind::Kept).with_reason(err.to_string())
                }
            };
            report.decisions.push(decision);
        }

        report.final_digest = Some(current.digest().to_string());
        Ok(report)
    }

    /// Any failure to put a snapshot back is fatal, whatever the editor reports it as.
    fn restore(&self, path: &Path, snapshot: &Snapshot) -> TrimResult<()> {
        self.editor.restore(path, snapshot).map_err(|err| {
            if err.is_fatal() {
                err
            } else {
                TrimError::RestoreFailed {
                    path: path.to_path_buf(),
                    source: std::io::Error::other(err.to_string()),
                }
            }
        })
    }
}
