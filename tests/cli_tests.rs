//! CLI integration tests using the real ucl binary

mod common;

use predicates::prelude::*;

use common::{TestWorkspace, ucl_cmd};

#[test]
fn test_help_output() {
    ucl_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("update"));
}

#[test]
fn test_version_output() {
    ucl_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ucl"))
        .stdout(predicate::str::contains("Container formats: zip, tar.gz, tar.bz2, tar"));
}

#[test]
fn test_completions_output() {
    ucl_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ucl"));
}

#[test]
fn test_missing_profile_is_reported() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .env("UCL_PROFILE", workspace.temp.path().join("no-such-profile"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile not found"));
}

#[test]
fn test_list_empty_profile() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .args(["list", "--bundles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No userChrome.css"))
        .stdout(predicate::str::contains("No bundles installed."));
}

#[test]
fn test_list_shows_state_and_line() {
    let workspace = TestWorkspace::new();
    workspace.write_root_stylesheet(
        "/* mine */\n@import url(\"a.css\");\n/* @import url(\"b.css\"); */\n",
    );

    workspace
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imports (2):"))
        .stdout(predicate::str::contains("a.css (line 2)"))
        .stdout(predicate::str::contains("[off] b.css (line 3)"));
}

#[test]
fn test_registry_flag_overrides_data_dir() {
    let workspace = TestWorkspace::new();
    let file = workspace.write_input("tabs.css", "#tabs { }\n");
    let registry = workspace.temp.path().join("elsewhere").join("reg.json");

    workspace
        .cmd()
        .arg("--registry")
        .arg(&registry)
        .arg("install")
        .arg(&file)
        .assert()
        .success();

    assert!(registry.is_file());
    assert!(workspace.registry_names().is_empty());
}

#[test]
fn test_backup_and_restore() {
    let workspace = TestWorkspace::new();
    workspace.write_root_stylesheet("/* original */\n");

    workspace
        .cmd()
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("userChrome.css.backup"));

    workspace.write_root_stylesheet("/* changed */\n");
    workspace.cmd().arg("restore").assert().success();
    assert_eq!(workspace.root_stylesheet(), "/* original */\n");

    workspace
        .cmd()
        .args(["restore", "--discard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup deleted"));
    assert!(!workspace.chrome().join("userChrome.css.backup").exists());
}

#[test]
fn test_restore_without_backup_fails() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .arg("restore")
        .assert()
        .failure()
        .stderr(predicate::str::contains("File operation failed"));
}

#[test]
fn test_update_check_without_bundles() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .args(["update", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bundles installed."));
}

#[test]
fn test_update_unknown_bundle() {
    let workspace = TestWorkspace::new();
    workspace
        .cmd()
        .args(["update", "ghost", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundle 'ghost' not found"));
}
