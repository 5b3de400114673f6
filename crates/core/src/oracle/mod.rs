//! Build verification by running an external command.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::debug;

use crate::error::{TrimError, TrimResult};
use crate::model::BuildVerdict;

/// Number of trailing output lines kept on a verdict.
const OUTPUT_TAIL_LINES: usize = 20;

/// Ground truth for "does the project still build".
///
/// Calls are synchronous and must not overlap: the tree is edited in place between them.
pub trait BuildOracle {
    /// Run one build. `Err` means the build could not be launched at all.
    fn verify(&self) -> TrimResult<BuildVerdict>;

    /// Human-readable description for logs and reports.
    fn describe(&self) -> String;
}

/// Runs a shell command in the project root; exit status zero means the build passed.
#[derive(Debug, Clone)]
pub struct ShellOracle {
    root: PathBuf,
    command: String,
}

impl ShellOracle {
    pub fn new(root: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self { root: root.into(), command: command.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn shell_command(&self) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.command);
            c
        };
        cmd.current_dir(&self.root).stdin(Stdio::null());
        cmd
    }
}

impl BuildOracle for ShellOracle {
    fn verify(&self) -> TrimResult<BuildVerdict> {
        let started = Instant::now();
        let output = self.shell_command().output().map_err(|e| {
            TrimError::BuildInvocation(format!(
                "failed to spawn `{}` in {}: {e}",
                self.command,
                self.root.display()
            ))
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        let verdict = BuildVerdict {
            passed: output.status.success(),
            exit_code: output.status.code(),
            elapsed_ms,
            output_tail: tail_lines(&combined, OUTPUT_TAIL_LINES),
        };
        debug!(
            command = %self.command,
            passed = verdict.passed,
            exit_code = ?verdict.exit_code,
            elapsed_ms,
            output_tail = %verdict.output_tail,
            "build finished"
        );
        Ok(verdict)
    }

    fn describe(&self) -> String {
        self.command.clone()
    }
}

fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_lines() {
        let text = (1..=30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let tail = tail_lines(&text, 3);
        assert_eq!(tail, "28\n29\n30");
        assert_eq!(tail_lines("one", 5), "one");
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_decides_the_verdict() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ShellOracle::new(dir.path(), "true").verify().unwrap().passed);
        let failed = ShellOracle::new(dir.path(), "echo broken >&2; exit 3").verify().unwrap();
        assert!(!failed.passed);
        assert_eq!(failed.exit_code, Some(3));
        assert_eq!(failed.output_tail, "broken");
    }

    #[test]
    fn missing_working_directory_is_an_invocation_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        let err = ShellOracle::new(gone, "true").verify().unwrap_err();
        assert!(matches!(err, TrimError::BuildInvocation(_)));
    }
}
