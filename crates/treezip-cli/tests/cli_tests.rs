//! Integration tests for treezip-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn treezip_cmd() -> Command {
    cargo_bin_cmd!("treezip")
}

fn make_tree(base: &Path) -> PathBuf {
    let root = base.join("site");
    fs::create_dir_all(root.join("assets")).unwrap();
    fs::write(root.join("index.html"), "<html></html>").unwrap();
    fs::write(root.join("assets/app.js"), "console.log(1);").unwrap();
    fs::write(root.join("assets/.DS_Store"), "meta").unwrap();
    root
}

fn entry_names(archive: &Path) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_version_flag() {
    treezip_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("treezip"));
}

#[test]
fn test_help_flag() {
    treezip_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line utility"));
}

#[test]
fn test_pack_directory_with_defaults() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());

    treezip_cmd()
        .arg("pack")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive created"));

    assert_eq!(
        entry_names(&temp.path().join("site.zip")),
        ["site/", "site/assets/", "site/assets/app.js", "site/index.html"]
            .into_iter()
            .map(String::from)
            .collect()
    );
}

#[test]
fn test_pack_positional_destination_and_exclusions() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());
    let out = temp.path().join("out");
    fs::create_dir(&out).unwrap();

    treezip_cmd()
        .arg("-q")
        .arg("pack")
        .arg(&source)
        .arg(&out)
        .arg("release.v1.zip")
        .arg("app.js")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let names = entry_names(&out.join("release.v1.zip"));
    assert!(names.contains("release/index.html"));
    assert!(!names.contains("release/assets/app.js"));
    // positional names replace the defaults
    assert!(names.contains("release/assets/.DS_Store"));
}

#[test]
fn test_pack_exclude_dir_with_extended_defaults() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());

    treezip_cmd()
        .arg("pack")
        .arg(&source)
        .arg("--exclude-dir")
        .arg("assets")
        .arg("--extend-defaults")
        .assert()
        .success();

    let names = entry_names(&temp.path().join("site.zip"));
    assert_eq!(names.len(), 2);
    assert!(names.contains("site/index.html"));
}

#[test]
fn test_pack_single_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());

    treezip_cmd()
        .arg("pack")
        .arg(source.join("index.html"))
        .arg("--stream")
        .assert()
        .success();

    let names = entry_names(&source.join("index.html.zip"));
    assert_eq!(names.len(), 1);
    assert!(names.contains("index.html"));
}

#[test]
fn test_pack_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());

    let output = treezip_cmd()
        .arg("--json")
        .arg("pack")
        .arg(&source)
        .output()
        .expect("failed to run treezip");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["operation"], "pack");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["root_name"], "site");
    assert_eq!(json["data"]["files_added"], 2);
    assert_eq!(json["data"]["directories_added"], 2);
    assert_eq!(json["data"]["entries_skipped"], 1);
}

#[test]
fn test_pack_missing_source_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");

    treezip_cmd()
        .arg("pack")
        .arg(temp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source not found"))
        .stderr(predicate::str::contains("HINT"));
}

#[test]
fn test_pack_missing_source_json_error() {
    let temp = TempDir::new().expect("failed to create temp dir");

    let output = treezip_cmd()
        .arg("--json")
        .arg("pack")
        .arg(temp.path().join("nope"))
        .output()
        .expect("failed to run treezip");

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["error"].as_str().unwrap().contains("Source not found"));
}

#[test]
fn test_pack_rejects_invalid_level() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());

    treezip_cmd()
        .arg("pack")
        .arg(&source)
        .arg("--level")
        .arg("12")
        .assert()
        .failure();
}

#[test]
fn test_verbose_logs_visits_to_stderr() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let source = make_tree(temp.path());

    treezip_cmd()
        .arg("-v")
        .arg("pack")
        .arg(&source)
        .assert()
        .success()
        .stderr(predicate::str::contains("visiting site/index.html"))
        .stderr(predicate::str::contains("skipping .DS_Store"));
}

#[test]
fn test_completion_bash() {
    treezip_cmd()
        .arg("completion")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("treezip"));
}
