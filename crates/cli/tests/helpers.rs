use std::path::Path;

use include_trim::{canonicalize_or_current, display_relative};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_resolves_existing_and_missing_paths() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    std::fs::create_dir_all(&subdir).expect("create nested");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let dot = canonicalize_or_current(".").expect("dot").canonicalize().expect("canon");
    assert_eq!(dot, tmp.path().canonicalize().expect("canon tmp"));

    let nested = canonicalize_or_current("nested").expect("canonicalize nested");
    assert_eq!(nested, subdir.canonicalize().expect("canonicalize subdir"));

    let missing = canonicalize_or_current("not-there").expect("missing");
    assert!(missing.is_absolute());
    assert!(missing.ends_with("not-there"));

    std::env::set_current_dir(original).expect("restore cwd");
}

#[test]
fn display_relative_strips_the_root() {
    let root = Path::new("/work/project");
    let expected = Path::new("src").join("a.cpp").display().to_string();
    assert_eq!(display_relative(root, &root.join("src").join("a.cpp")), expected);
    assert_eq!(display_relative(root, Path::new("/elsewhere/b.h")), "/elsewhere/b.h");
}
