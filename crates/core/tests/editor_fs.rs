use std::fs;

use include_trim_core::editor::{FsEditor, IncludeEditor};
use include_trim_core::model::Snapshot;
use tempfile::tempdir;

#[test]
fn remove_include_commits_to_disk_and_returns_new_content() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("a.cpp");
    fs::write(&path, "#include \"x.h\"\n#include \"y.h\"\nint main() {}\n").unwrap();

    let after = FsEditor.remove_include(&path, "x.h").expect("remove");
    assert_eq!(after.content(), "#include \"y.h\"\nint main() {}\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), after.content());
}

#[test]
fn remove_missing_include_is_a_no_op() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("a.cpp");
    let body = "#include \"y.h\"\nint main() {}\n";
    fs::write(&path, body).unwrap();

    let after = FsEditor.remove_include(&path, "x.h").expect("remove");
    assert_eq!(after.content(), body);
    assert_eq!(fs::read_to_string(&path).unwrap(), body);
}

#[test]
fn restore_reproduces_snapshot_after_several_removals() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("a.h");
    let body = "#pragma once\r\n#include <a.h>\r\n\t#include \"b.h\"\r\n\r\nstruct S {};";
    fs::write(&path, body).unwrap();
    let snap = FsEditor.read(&path).unwrap();

    FsEditor.remove_include(&path, "a.h").unwrap();
    FsEditor.remove_include(&path, "b.h").unwrap();
    assert_ne!(fs::read_to_string(&path).unwrap(), body);

    FsEditor.restore(&path, &snap).expect("restore");
    assert_eq!(fs::read(&path).unwrap(), body.as_bytes());
}

#[test]
fn restore_can_target_an_intermediate_state() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("a.c");
    fs::write(&path, "#include <a.h>\n#include <b.h>\n").unwrap();

    let partial = FsEditor.remove_include(&path, "a.h").unwrap();
    FsEditor.remove_include(&path, "b.h").unwrap();
    FsEditor.restore(&path, &partial).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "#include <b.h>\n");
    assert_eq!(partial, Snapshot::of("#include <b.h>\n"));
}

#[cfg(unix)]
#[test]
fn edits_keep_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().unwrap();
    let path = tmp.path().join("gen.c");
    fs::write(&path, "#include <a.h>\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    FsEditor.remove_include(&path, "a.h").unwrap();
    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
}
