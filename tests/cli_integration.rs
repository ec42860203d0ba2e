//! Integration tests for the command-line interface.
//!
//! Each test drives the built binary through `cargo run` against a
//! temporary workspace of Python files.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A small legacy app that exercises renaming, injection, and import
/// synthesis.
const LEGACY_APP: &str = r#"import tkinter as tk

root = tk.Tk()
frame = tk.Frame(root)
submit = tk.Button(frame, text="Submit")
root.mainloop()
"#;

fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.py"), LEGACY_APP).unwrap();
    dir
}

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .unwrap()
}

fn run_on(subcommand: &str, path: &Path, extra: &[&str]) -> Output {
    let mut args = vec![subcommand, path.to_str().unwrap()];
    args.extend_from_slice(extra);
    run(&args)
}

#[test]
fn migrate_help() {
    let output = run(&["migrate", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rewrite widget construction calls"));
}

#[test]
fn migrate_rewrites_files_in_place() {
    let workspace = setup_workspace();

    let output = run_on("migrate", workspace.path(), &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated"));
    assert!(stdout.contains("Summary:"));

    let migrated = fs::read_to_string(workspace.path().join("app.py")).unwrap();
    assert!(migrated.contains("AccessibleButton(frame, accessible_name=\"Submit\", text=\"Submit\")"));
    assert!(migrated.contains("AccessibleFrame(root)"));
    assert!(migrated.contains("from tkaria11y.widgets import"));
}

#[test]
fn migrate_second_run_reports_unchanged() {
    let workspace = setup_workspace();

    let first = run_on("migrate", workspace.path(), &[]);
    assert!(first.status.success());
    let after_first = fs::read_to_string(workspace.path().join("app.py")).unwrap();

    let second = run_on("migrate", workspace.path(), &[]);
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("1 unchanged"));
    assert!(stdout.contains("0 updated"));

    let after_second = fs::read_to_string(workspace.path().join("app.py")).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn migrate_dry_run_leaves_files_alone() {
    let workspace = setup_workspace();

    let output = run_on("migrate", workspace.path(), &["--dry-run"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("DRY RUN"));
    assert!(stdout.contains("Would modify"));

    let content = fs::read_to_string(workspace.path().join("app.py")).unwrap();
    assert_eq!(content, LEGACY_APP);
}

#[test]
fn migrate_exclude_skips_files_matching_glob() {
    let workspace = setup_workspace();
    fs::write(
        workspace.path().join("test_app.py"),
        "Button(x, text=\"Keep\")\n",
    )
    .unwrap();

    let output = run_on("migrate", workspace.path(), &["--exclude", "*test*.py"]);
    assert!(output.status.success());

    let excluded = fs::read_to_string(workspace.path().join("test_app.py")).unwrap();
    assert_eq!(excluded, "Button(x, text=\"Keep\")\n");

    let migrated = fs::read_to_string(workspace.path().join("app.py")).unwrap();
    assert!(migrated.contains("AccessibleButton"));
}

#[test]
fn migrate_exclude_glob_must_match_whole_file_name() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("vendor_widgets.py"),
        "Button(x, text=\"Go\")\n",
    )
    .unwrap();

    // A bare word is a complete-name glob, not a substring; it matches
    // nothing here, so the file is migrated.
    let output = run_on("migrate", workspace.path(), &["--exclude", "vendor"]);
    assert!(output.status.success());

    let migrated = fs::read_to_string(workspace.path().join("vendor_widgets.py")).unwrap();
    assert!(migrated.contains("AccessibleButton"));
}

#[test]
fn migrate_rejects_invalid_exclude_glob() {
    let workspace = setup_workspace();

    let output = run_on("migrate", workspace.path(), &["--exclude", "[oops"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid exclude pattern"));
}

#[test]
fn migrate_todos_flag_marks_unresolved_names() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("app.py"), "b = Button(parent)\n").unwrap();

    let output = run_on("migrate", workspace.path(), &["--todos"]);
    assert!(output.status.success());

    let migrated = fs::read_to_string(workspace.path().join("app.py")).unwrap();
    assert!(migrated.contains("# TODO: Add accessible_name parameter"));
}

#[test]
fn migrate_errors_when_no_python_files_found() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("notes.txt"), "not python").unwrap();

    let output = run_on("migrate", workspace.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No Python files found"));
}

#[test]
fn audit_reports_findings_with_codes() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("app.py"),
        r#"b = AccessibleButton(root, text="Go")
canvas.bind("<Button-1>", on_click)
"#,
    )
    .unwrap();

    let output = run_on("audit", workspace.path(), &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[A001]"));
    assert!(stdout.contains("missing accessible_name parameter"));
    assert!(stdout.contains("[A002]"));
    assert!(stdout.contains("Summary:"));
}

#[test]
fn audit_json_emits_parseable_diagnostics() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("app.py"),
        "icon = tk.PhotoImage(file=\"logo.png\")\n",
    )
    .unwrap();

    let output = run_on("audit", workspace.path(), &["--json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let diags: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let diags = diags.as_array().unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0]["code"], "A005");
    assert_eq!(diags[0]["severity"], "warning");
    assert_eq!(diags[0]["category"], "text-alternatives");
}

#[test]
fn audit_clean_file_reports_zero_issues() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("app.py"),
        "b = AccessibleButton(root, accessible_name=\"Go\")\n",
    )
    .unwrap();

    let output = run_on("audit", workspace.path(), &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 issues found"));
}

#[test]
fn list_renames_prints_builtin_table() {
    let output = run(&["list-renames"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tk.Button -> AccessibleButton"));
    assert!(stdout.contains("ttk.Combobox -> AccessibleCombobox"));
    assert!(stdout.contains("Label keyword: accessible_name"));
    assert!(stdout.contains("Import module: tkaria11y.widgets"));
}

#[test]
fn custom_config_replaces_builtin_table() {
    let workspace = TempDir::new().unwrap();
    let config = workspace.path().join("renames.toml");
    fs::write(
        &config,
        r#"[meta]
name = "house-style"
label_keyword = "aria_label"
import_module = "ourkit.widgets"

[[rename]]
source = "Button"
target = "KitButton"
"#,
    )
    .unwrap();

    let output = run(&["list-renames", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Button -> KitButton"));
    assert!(stdout.contains("Label keyword: aria_label"));
    assert!(!stdout.contains("tk.Button -> AccessibleButton"));
}

#[test]
fn invalid_config_is_rejected() {
    let workspace = TempDir::new().unwrap();
    let config = workspace.path().join("renames.toml");
    // Target collides with a source key.
    fs::write(
        &config,
        r#"[[rename]]
source = "Button"
target = "Button"
"#,
    )
    .unwrap();

    let output = run(&["list-renames", "--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
}
