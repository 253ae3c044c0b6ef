//! End-to-end tests of the `fob-pipeline` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("fob-pipeline").unwrap();
    cmd.env_remove("NODE_ENV")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_tasks() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("styles-assets"))
        .stdout(predicate::str::contains("dev"));
}

#[test]
fn test_build_in_production() {
    let temp = TempDir::new().unwrap();
    let styles = temp.path().join("frontend/styles");
    fs::create_dir_all(&styles).unwrap();
    fs::write(styles.join("index.styl"), "a { color: blue; }").unwrap();

    cli()
        .env("NODE_ENV", "production")
        .args(["build", "-C"])
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("manifest/css.json").exists());
}

#[test]
fn test_failed_stylesheet_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let styles = temp.path().join("frontend/styles");
    fs::create_dir_all(&styles).unwrap();
    fs::write(styles.join("index.styl"), "a { background: url(gone.png); }").unwrap();

    cli()
        .args(["styles", "-C"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("gone.png"));
}

#[test]
fn test_missing_explicit_config_is_reported() {
    let temp = TempDir::new().unwrap();

    cli()
        .current_dir(temp.path())
        .args(["build", "--config", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_clean_task() {
    let temp = TempDir::new().unwrap();
    let public = temp.path().join("public");
    fs::create_dir_all(&public).unwrap();
    fs::write(public.join("old.txt"), "x").unwrap();

    cli()
        .current_dir(temp.path())
        .arg("clean")
        .assert()
        .success();

    assert!(public.exists());
    assert!(!public.join("old.txt").exists());
}
