//! # `stencil blueprint` Integration Tests
//!
//! File: cli/tests/blueprint.rs
//!
mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_blueprint_list_shows_builtins() {
    let project = Project::new();
    project
        .cmd()
        .args(["blueprint", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Available blueprints:")
                .and(predicate::str::contains("in-repo-addon"))
                .and(predicate::str::contains("module"))
                .and(predicate::str::contains("Found 2 blueprint(s).")),
        );
}

#[test]
fn test_blueprint_list_marks_overridden() {
    let project = Project::new();
    project.write("blueprints/module/blueprint.toml", "description = \"Local module\"\n");
    project
        .cmd()
        .args(["b", "list"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("project (blueprints)")
                .and(predicate::str::contains("| Local module\n"))
                .and(predicate::str::contains("(overridden)")),
        );
}

#[test]
fn test_blueprint_list_empty() {
    let project = Project::new();
    let empty = tempdir().unwrap();
    project
        .cmd()
        .env("STENCIL_BLUEPRINTS_DIR", empty.path())
        .args(["blueprint", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No blueprints found"));
}

#[test]
fn test_blueprint_info_success() {
    let project = Project::new();
    project
        .cmd()
        .args(["blueprint", "info", "module", "--entity", "foo-bar"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Blueprint: module")
                .and(predicate::str::contains("Source:       built-in"))
                .and(predicate::str::contains("foo-bar.js"))
                .and(predicate::str::contains("foo-bar-test.js")),
        );
    assert!(!project.exists("app"));
}

#[test]
fn test_blueprint_info_not_found() {
    let project = Project::new();
    project
        .cmd()
        .args(["blueprint", "info", "non-existent-bp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown blueprint 'non-existent-bp'"));
}
