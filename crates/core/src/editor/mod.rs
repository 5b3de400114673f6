//! In-place include removal and snapshot restore.
//!
//! Every edit is durable as soon as it returns. Writes go through a temporary file in the
//! target's directory that is persisted over the original, so an interrupted write leaves
//! either the previous or the new content on disk.

use std::fs;
use std::io::Write;
use std::path::Path;

use regex::Regex;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{TrimError, TrimResult};
use crate::model::Snapshot;

/// Mutates files on disk on behalf of the minimizer.
pub trait IncludeEditor {
    /// Capture the current on-disk content.
    fn read(&self, path: &Path) -> TrimResult<Snapshot>;

    /// Delete every line including `header` and return the resulting content.
    ///
    /// Zero matches is a no-op and returns the unchanged content.
    fn remove_include(&self, path: &Path, header: &str) -> TrimResult<Snapshot>;

    /// Overwrite `path` with the exact bytes of `snapshot`.
    fn restore(&self, path: &Path, snapshot: &Snapshot) -> TrimResult<()>;
}

/// Filesystem-backed editor.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsEditor;

impl IncludeEditor for FsEditor {
    fn read(&self, path: &Path) -> TrimResult<Snapshot> {
        fs::read_to_string(path)
            .map(Snapshot::of)
            .map_err(|source| TrimError::FileRead { path: path.to_path_buf(), source })
    }

    fn remove_include(&self, path: &Path, header: &str) -> TrimResult<Snapshot> {
        let before = self.read(path)?;
        let after = strip_include_lines(before.content(), header);
        if after == before.content() {
            debug!(path = %path.display(), header, "include not present; nothing to remove");
            return Ok(before);
        }
        write_atomic(path, &after)
            .map_err(|source| TrimError::FileWrite { path: path.to_path_buf(), source })?;
        Ok(Snapshot::of(after))
    }

    fn restore(&self, path: &Path, snapshot: &Snapshot) -> TrimResult<()> {
        write_atomic(path, snapshot.content())
            .map_err(|source| TrimError::RestoreFailed { path: path.to_path_buf(), source })?;
        let on_disk = fs::read_to_string(path)
            .map_err(|source| TrimError::RestoreFailed { path: path.to_path_buf(), source })?;
        if !snapshot.matches(&on_disk) {
            return Err(TrimError::RestoreMismatch { path: path.to_path_buf() });
        }
        Ok(())
    }
}

/// Remove every include line naming exactly `header`, in either delimiter form.
pub fn strip_include_lines(content: &str, header: &str) -> String {
    let name = regex::escape(header);
    let pattern =
        format!(r#"(?m)^[ \t]*#[ \t]*include[ \t]*(?:<{name}>|"{name}")[^\n]*(?:\n|\z)"#);
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(content, "").into_owned(),
        // An escaped literal always compiles; fall back to leaving the text alone.
        Err(_) => content.to_string(),
    }
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map(|m| m.permissions()).ok();
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp.path(), permissions)?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_exact_match_in_both_forms() {
        let text = "#include \"a.h\"\n#include <a.h>\n  #  include \"a.h\" // trailing\n#include \"b.h\"\n";
        assert_eq!(strip_include_lines(text, "a.h"), "#include \"b.h\"\n");
    }

    #[test]
    fn does_not_match_substrings() {
        let text = "#include \"a.h\"\n#include \"aa.h\"\n#include \"dir/a.h\"\n";
        assert_eq!(strip_include_lines(text, "a.h"), "#include \"aa.h\"\n#include \"dir/a.h\"\n");
    }

    #[test]
    fn escapes_regex_metacharacters_in_names() {
        let text = "#include <c++/v1.h>\n#include <cxx/v1xh>\n";
        assert_eq!(strip_include_lines(text, "c++/v1.h"), "#include <cxx/v1xh>\n");
    }

    #[test]
    fn removes_last_line_without_newline() {
        let text = "int x;\n#include \"a.h\"";
        assert_eq!(strip_include_lines(text, "a.h"), "int x;\n");
    }

    #[test]
    fn preserves_crlf_on_untouched_lines() {
        let text = "#include \"a.h\"\r\n#include \"b.h\"\r\n";
        assert_eq!(strip_include_lines(text, "a.h"), "#include \"b.h\"\r\n");
    }
}
