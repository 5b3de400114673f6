//! Shared record of the trial edit currently on disk.
//!
//! While a trial removal awaits its build verdict, the file holds content nothing has verified.
//! The minimizer records the file and its last verified snapshot here so an interrupt handler
//! running on another thread can put that snapshot back before the process exits.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::editor::IncludeEditor;
use crate::error::TrimResult;
use crate::model::Snapshot;

type Slot = Option<(PathBuf, Snapshot)>;

/// Cloneable handle; all clones share one slot.
#[derive(Debug, Clone, Default)]
pub struct PendingTrial {
    slot: Arc<Mutex<Slot>>,
}

/// Keeps a trial registered until dropped.
#[must_use = "the trial is unregistered as soon as the guard is dropped"]
pub struct TrialGuard<'a> {
    owner: &'a PendingTrial,
}

impl PendingTrial {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `verified` as the state to fall back to, then run `edit`.
    ///
    /// The slot is held locked while `edit` runs, so an interrupt cannot restore underneath a
    /// half-finished write.
    pub fn start<T>(
        &self,
        path: &Path,
        verified: &Snapshot,
        edit: impl FnOnce() -> T,
    ) -> (TrialGuard<'_>, T) {
        let mut slot = self.lock();
        *slot = Some((path.to_path_buf(), verified.clone()));
        let out = edit();
        drop(slot);
        (TrialGuard { owner: self }, out)
    }

    /// Path of the file whose trial is in flight, if any.
    pub fn in_flight(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|(path, _)| path.clone())
    }

    /// Restore the registered snapshot, if any, and return the restored path.
    ///
    /// The slot stays locked afterwards, so no further trial can start before the process
    /// exits. Call this only on the way out.
    pub fn interrupt(&self, editor: &dyn IncludeEditor) -> TrimResult<Option<PathBuf>> {
        let slot = self.lock();
        let result = match slot.as_ref() {
            Some((path, verified)) => editor.restore(path, verified).map(|()| Some(path.clone())),
            None => Ok(None),
        };
        std::mem::forget(slot);
        result
    }
}

impl Drop for TrialGuard<'_> {
    fn drop(&mut self) {
        // A slot left locked by `interrupt` must not block unwinding on this thread.
        match self.owner.slot.try_lock() {
            Ok(mut slot) => *slot = None,
            Err(TryLockError::Poisoned(poisoned)) => *poisoned.into_inner() = None,
            Err(TryLockError::WouldBlock) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::FsEditor;
    use std::fs;

    #[test]
    fn interrupt_restores_the_registered_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.cpp");
        let original = "#include \"needed.h\"\nint main() {}\n";
        fs::write(&file, original).unwrap();

        let pending = PendingTrial::new();
        let verified = Snapshot::of(original);
        let (_guard, edited) =
            pending.start(&file, &verified, || FsEditor.remove_include(&file, "needed.h"));
        assert_eq!(edited.unwrap().content(), "int main() {}\n");
        assert_eq!(pending.in_flight(), Some(file.clone()));

        let handler_side = pending.clone();
        let restored = handler_side.interrupt(&FsEditor).unwrap();
        assert_eq!(restored, Some(file.clone()));
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn dropping_the_guard_clears_the_slot() {
        let pending = PendingTrial::new();
        let verified = Snapshot::of("x");
        {
            let (_guard, ()) = pending.start(Path::new("a.c"), &verified, || ());
            assert!(pending.in_flight().is_some());
        }
        assert_eq!(pending.in_flight(), None);
    }

    #[test]
    fn interrupt_with_nothing_in_flight_touches_nothing() {
        let pending = PendingTrial::new();
        assert_eq!(pending.interrupt(&FsEditor).unwrap(), None);
    }
}
