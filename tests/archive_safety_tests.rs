//! Archive safety tests: hostile archives must not write anything

mod common;

use predicates::prelude::*;

use common::TestWorkspace;

#[test]
fn test_path_traversal_archive_is_rejected() {
    let workspace = TestWorkspace::new();
    let archive = workspace.write_zip(
        "evil.zip",
        &[("ok.css", ""), ("../../escaped.css", "#pwned { }")],
    );

    workspace
        .cmd()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe path"));

    assert!(!workspace.temp.path().join("escaped.css").exists());
    assert!(!workspace.chrome_exists("evil"));
    assert!(workspace.registry_names().is_empty());
}

#[test]
fn test_absolute_entry_is_rejected() {
    let workspace = TestWorkspace::new();
    let archive = workspace.write_zip("abs.zip", &[("/etc/evil.css", "")]);

    workspace
        .cmd()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe path"));
}

#[test]
fn test_corrupt_archive() {
    let workspace = TestWorkspace::new();
    let archive = workspace.write_input("broken.zip", "not a zip at all");

    workspace
        .cmd()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupted archive"));
}

#[test]
fn test_archive_without_stylesheets() {
    let workspace = TestWorkspace::new();
    let archive = workspace.write_zip("docs.zip", &[("docs/readme.md", "# hi")]);

    workspace
        .cmd()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No stylesheet files found"));
}
