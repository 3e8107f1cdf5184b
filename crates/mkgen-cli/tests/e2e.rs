//! End-to-end tests for mkgen CLI commands.
//!
//! These tests run the binary against small C projects on disk.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Write a project with a stack built on a list, plus a stack test.
fn stack_project() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    for (path, contents) in [
        ("include/list.h", "#pragma once\n"),
        ("include/stack.h", "#pragma once\n#include \"list.h\"\n"),
        ("src/list.c", "#include \"../include/list.h\"\n"),
        ("src/stack.c", "#include \"../include/stack.h\"\n"),
        (
            "src/stack.test.c",
            "#include <assert.h>\n#include \"../include/stack.h\"\n#include \"../include/check.h\"\n",
        ),
    ] {
        write(root, path, contents);
    }
    temp_dir
}

fn write(root: &Path, path: &str, contents: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).expect("Failed to create dir");
    fs::write(full, contents).expect("Failed to write file");
}

fn mkgen() -> Command {
    Command::cargo_bin("mkgen").expect("mkgen binary is built")
}

// =============================================================================
// generate
// =============================================================================

#[test]
fn test_generate_writes_makefile() {
    let project = stack_project();

    mkgen()
        .args(["generate", "--root"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 units, 1 tests"))
        .stdout(predicate::str::contains("Makefile"));

    let makefile = fs::read_to_string(project.path().join("Makefile")).unwrap();
    assert!(makefile.contains("bin/stack.o: src/stack.c\n"));
    assert!(makefile.contains("test/stack: bin/stack.test.o bin/check.o bin/list.o bin/stack.o\n"));
    assert!(makefile.contains("$(TARGET): bin/list.o bin/stack.o\n"));
}

#[test]
fn test_generate_toolchain_overrides() {
    let project = stack_project();

    mkgen()
        .args(["generate", "--stdout", "--cc", "clang", "--cflags", "-O2 -g", "--target", "libstack.a", "--root"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "CC= clang\nCFLAGS= -O2 -g\nTARGET= libstack.a\n",
        ));

    assert!(!project.path().join("Makefile").exists());
}

#[test]
fn test_generate_custom_output() {
    let project = stack_project();

    mkgen()
        .args(["generate", "-o", "build.mk", "--root"])
        .arg(project.path())
        .assert()
        .success();

    assert!(project.path().join("build.mk").exists());
    assert!(!project.path().join("Makefile").exists());
}

#[test]
fn test_generate_strict_fails_on_unresolved() {
    let project = stack_project();

    mkgen()
        .args(["generate", "--strict", "--root"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("bin/check.o"))
        .stderr(predicate::str::contains("hint:"));

    assert!(!project.path().join("Makefile").exists());
}

#[test]
fn test_generate_collision_fails() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "src/a/b.c", "");
    write(temp_dir.path(), "src/a__b.c", "");

    mkgen()
        .args(["generate", "--root"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("identity collision"));
}

#[test]
fn test_generate_without_src() {
    let temp_dir = TempDir::new().unwrap();

    mkgen()
        .args(["generate", "--root"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source root not found"));
}

#[test]
fn test_generate_missing_project() {
    mkgen()
        .args(["generate", "--root", "/nonexistent/mkgen/project"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project directory not found"));
}

// =============================================================================
// graph
// =============================================================================

#[test]
fn test_graph_text_report() {
    let project = stack_project();

    mkgen()
        .args(["graph", "--root"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bin/stack.o"))
        .stdout(predicate::str::contains("test:       test/stack"))
        .stdout(predicate::str::contains("External objects:"))
        .stdout(predicate::str::contains("bin/check.o"));
}

#[test]
fn test_graph_json_report() {
    let project = stack_project();

    let output = mkgen()
        .args(["graph", "--json", "--root"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let units = report["units"].as_array().unwrap();
    assert_eq!(units.len(), 3);

    let stack = units
        .iter()
        .find(|u| u["object_path"] == "bin/stack.o")
        .expect("stack unit present");
    assert_eq!(stack["direct_deps"], serde_json::json!(["bin/list.o"]));
    assert_eq!(stack["test_target"], serde_json::Value::Null);
    assert_eq!(report["unresolved"], serde_json::json!(["bin/check.o"]));
    assert_eq!(report["cycles"], serde_json::json!([]));
}
