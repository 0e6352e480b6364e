//! CLI tests for the ls binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use lessonstore::{LearningStore, SessionAction};

fn ls(data_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("nt-ls").expect("nt-ls binary");
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

#[test]
fn test_progress_without_record() {
    let temp = TempDir::new().unwrap();

    ls(temp.path())
        .args(["progress", "nobody"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No progress recorded yet"));
}

#[test]
fn test_progress_json_lists_milestones() {
    let temp = TempDir::new().unwrap();
    let store = LearningStore::open(temp.path()).unwrap();
    store.progress.track_progress("u1", "FastAPI", "Module 1", true).unwrap();
    store.progress.track_progress("u1", "FastAPI", "Module 2", false).unwrap();

    let output = ls(temp.path()).args(["progress", "u1", "--json"]).output().unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["status"], "success");
    assert_eq!(summary["tools_count"], 1);
    assert_eq!(summary["tools"]["FastAPI"]["milestones"].as_array().unwrap().len(), 2);
}

#[test]
fn test_session_shows_current_module() {
    let temp = TempDir::new().unwrap();
    let store = LearningStore::open(temp.path()).unwrap();
    store.sessions.apply("u1", "Lang Chain", SessionAction::Start).unwrap();
    store.sessions.apply("u1", "Lang Chain", SessionAction::NextModule).unwrap();

    // A different spelling of the same tool resolves to the same session file
    ls(temp.path())
        .args(["session", "u1", "lang-chain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current module: 1"));
}

#[test]
fn test_session_missing_json_is_null() {
    let temp = TempDir::new().unwrap();

    let output = ls(temp.path())
        .args(["session", "u1", "Rust", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["status"], "success");
    assert!(outcome["session"].is_null());
}

#[test]
fn test_lessons_and_show() {
    let temp = TempDir::new().unwrap();
    let store = LearningStore::open(temp.path()).unwrap();
    store.lessons.save_file("FastAPI", "research.md", "# Research\nfast").unwrap();

    ls(temp.path())
        .arg("lessons")
        .assert()
        .success()
        .stdout(predicate::str::contains("fastapi"));

    ls(temp.path())
        .args(["lessons", "FastAPI"])
        .assert()
        .success()
        .stdout(predicate::str::contains("research.md"));

    ls(temp.path())
        .args(["show", "FastAPI", "research.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Research"));
}

#[test]
fn test_show_missing_file_fails() {
    let temp = TempDir::new().unwrap();

    ls(temp.path())
        .args(["show", "FastAPI", "nope.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_lessons_unknown_tool_fails() {
    let temp = TempDir::new().unwrap();

    ls(temp.path())
        .args(["lessons", "Ghost"])
        .assert()
        .failure();
}
