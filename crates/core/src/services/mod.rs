pub mod minimizer;
pub mod pending;

pub use minimizer::{FileOutcome, FileReport, MinimizeOptions, Minimizer, RunReport};
pub use pending::{PendingTrial, TrialGuard};
