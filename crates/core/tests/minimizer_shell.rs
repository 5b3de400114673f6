#![cfg(unix)]

use std::fs;

use include_trim_core::config::TrimConfig;
use include_trim_core::editor::FsEditor;
use include_trim_core::model::DecisionKind;
use include_trim_core::oracle::{BuildOracle, ShellOracle};
use include_trim_core::services::Minimizer;
use tempfile::tempdir;

#[test]
fn shell_build_decides_which_include_survives() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("a.cpp"), "#include \"x.h\"\n#include \"y.h\"\nint main() { return 0; }\n")
        .unwrap();

    // The "build" passes only while a.cpp still includes y.h.
    let config = TrimConfig::new(root, "grep -q '\"y.h\"' a.cpp");
    let corpus = config.corpus();
    let oracle = config.oracle();
    let report = Minimizer::new(&corpus, &FsEditor, &oracle).run(root).expect("run");

    let decisions: Vec<(&str, DecisionKind)> =
        report.files[0].decisions.iter().map(|d| (d.header.as_str(), d.kind)).collect();
    assert_eq!(decisions, vec![("x.h", DecisionKind::Removed), ("y.h", DecisionKind::Kept)]);
    assert_eq!(
        fs::read_to_string(root.join("a.cpp")).unwrap(),
        "#include \"y.h\"\nint main() { return 0; }\n"
    );
    assert_eq!(report.build_command, "grep -q '\"y.h\"' a.cpp");
    assert!(oracle.verify().unwrap().passed);
}

#[test]
fn unexecutable_build_command_keeps_every_include() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let a = "#include <stdio.h>\n#include \"util.h\"\nint main() { return 0; }\n";
    let h = "#pragma once\n#include <stddef.h>\n";
    fs::write(root.join("main.c"), a).unwrap();
    fs::write(root.join("util.h"), h).unwrap();

    let config = TrimConfig::new(root, "/nonexistent/build.sh");
    let corpus = config.corpus();
    let oracle = config.oracle();
    let report = Minimizer::new(&corpus, &FsEditor, &oracle).run(root).expect("run");

    assert_eq!(report.kept_count(), 3);
    assert_eq!(report.removed_count(), 0);
    assert_eq!(fs::read_to_string(root.join("main.c")).unwrap(), a);
    assert_eq!(fs::read_to_string(root.join("util.h")).unwrap(), h);
}

#[test]
fn build_runs_in_the_project_root() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("marker"), "").unwrap();
    let oracle = ShellOracle::new(tmp.path(), "test -f marker");
    assert!(oracle.verify().unwrap().passed);
    assert_eq!(oracle.describe(), "test -f marker");
}
