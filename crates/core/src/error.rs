use std::path::PathBuf;

use thiserror::Error;

/// Error taxonomy for a minimization run.
///
/// Only `Discovery`, `BaselineBroken`, `RestoreFailed`, `RestoreMismatch` and `Config` abort a
/// run. File-scoped read/write faults skip the affected file, and oracle launch failures are
/// folded into a "kept" decision by the minimizer.
#[derive(Debug, Error)]
pub enum TrimError {
    /// The source root could not be enumerated.
    #[error("Cannot discover sources under {}: {message}", .root.display())]
    Discovery { root: PathBuf, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build command could not be launched at all.
    #[error("Build command could not be run: {0}")]
    BuildInvocation(String),

    /// The tree did not build before any edit was made.
    #[error("Baseline build does not pass: {0}")]
    BaselineBroken(String),

    /// A snapshot could not be written back; the tree may be left half-edited.
    #[error("Failed to restore {}: {source}", .path.display())]
    RestoreFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A restore was written but the file on disk does not match the snapshot.
    #[error("Restored content of {} does not match its snapshot", .path.display())]
    RestoreMismatch { path: PathBuf },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TrimError {
    /// Whether this error must stop the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TrimError::Discovery { .. }
                | TrimError::BaselineBroken(_)
                | TrimError::RestoreFailed { .. }
                | TrimError::RestoreMismatch { .. }
                | TrimError::Config(_)
        )
    }
}

/// Convenience result type for core operations.
pub type TrimResult<T> = Result<T, TrimError>;
