//! Ctrl-C handling for `trim`.

use include_trim_core::editor::FsEditor;
use include_trim_core::services::PendingTrial;
use tracing::{error, warn};

/// Exit status conventionally used for SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// On Ctrl-C, put back the last verified content of the file under trial, then exit.
///
/// Failure to install the handler is logged and the run continues unprotected.
pub fn install_interrupt_handler(pending: PendingTrial) {
    let result = ctrlc::set_handler(move || {
        match pending.interrupt(&FsEditor) {
            Ok(Some(path)) => {
                eprintln!("\nInterrupted; restored {} to its last verified state.", path.display())
            }
            Ok(None) => eprintln!("\nInterrupted."),
            Err(err) => {
                error!(error = %err, "interrupted, but the pending trial could not be undone")
            }
        }
        std::process::exit(INTERRUPTED_EXIT_CODE);
    });
    if let Err(err) = result {
        warn!(error = %err, "could not install Ctrl-C handler; interrupts may leave a trial edit");
    }
}
