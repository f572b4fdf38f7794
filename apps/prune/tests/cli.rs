//! Integration tests for the prune CLI

use std::{fs, path::Path, process::Command};
use tempfile::TempDir;

fn prune(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_prune")).args(args).output().expect("Failed to execute prune")
}

fn write(dir: &Path, path: &str, content: &str) {
    let file_path = dir.join(path);
    fs::create_dir_all(file_path.parent().unwrap()).unwrap();
    fs::write(file_path, content).unwrap();
}

fn has_trash_dir(root: &Path) -> bool {
    fs::read_dir(root)
        .unwrap()
        .any(|e| e.unwrap().file_name().to_string_lossy().starts_with("._trash_"))
}

#[test]
fn test_apply_requires_yes() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "unused.txt", "unused");

    let output = prune(&["--path", root.to_str().unwrap(), "--apply"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--yes"));
    assert!(root.join("unused.txt").exists());
    assert!(!has_trash_dir(root));
    assert!(!root.join("deletion_plan.json").exists());
}

#[test]
fn test_dry_run_writes_plan_files_only() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "unused.txt", "unused");

    let output = prune(&["--path", root.to_str().unwrap(), "--confidence-threshold", "0.0"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry-run complete"));
    assert!(root.join("deletion_plan.json").exists());
    assert!(root.join("deletion_plan.md").exists());
    assert!(root.join("deletion_plan.diff").exists());
    assert!(root.join("unused.txt").exists());
    assert!(!has_trash_dir(root));
}

#[test]
fn test_apply_writes_closure() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "unused.txt", "unused");

    let output = prune(&[
        "--path",
        root.to_str().unwrap(),
        "--apply",
        "--yes",
        "--confidence-threshold",
        "0.0",
    ]);
    assert!(output.status.success());
    assert!(!root.join("unused.txt").exists());
    assert!(root.join("undo.sh").exists());

    let closure = fs::read_to_string(root.join("CLOSURE.md")).unwrap();
    assert!(closure.contains("Trash directory:"));
    assert!(closure.contains("Undo script:"));
    assert!(closure.contains("unused.txt"));
}

#[test]
fn test_one_run_sets_threshold() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "unused.txt", "unused");

    let output = prune(&["--path", root.to_str().unwrap(), "--one-run"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("One-run mode"));

    let plan: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("deletion_plan.json")).unwrap())
            .unwrap();
    assert_eq!(plan["summary"]["confidence_threshold"], 0.65);
}

#[test]
fn test_apply_saved_plan() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "unused.txt", "unused");
    let root_arg = root.to_str().unwrap();

    assert!(prune(&["--path", root_arg, "--confidence-threshold", "0.0"]).status.success());
    write(root, "late.txt", "added after the plan");

    let plan_path = root.join("deletion_plan.json");
    let output =
        prune(&["--path", root_arg, "--apply", "--yes", "--plan", plan_path.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(!root.join("unused.txt").exists());
    assert!(root.join("late.txt").exists());
}

#[test]
fn test_dry_run_and_apply_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let output =
        prune(&["--path", temp_dir.path().to_str().unwrap(), "--dry-run", "--apply", "--yes"]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");
    let output = prune(&["--path", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
