//! Tests driving the built binary against temporary workspaces.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_manifest-whitespace");

/// Workspace with one dirty manifest, one clean manifest and a non-manifest.
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("manifests/nested")).unwrap();
    fs::write(
        dir.path().join("manifests/init.pp"),
        "class example inherits  other::example {\n  $a = {'k' => 'v'}\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("manifests/nested/clean.pp"),
        "class clean {\n  $a = { 'k' => 'v' }\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("manifests/README.md"), "{  }\n").unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

#[test]
fn test_check_reports_problems() {
    let dir = setup_workspace();
    let output = run(dir.path(), &["check", "manifests"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init.pp:1:23"), "{stdout}");
    assert!(stdout.contains("init.pp:2:19"), "{stdout}");
    assert!(stdout.contains("manifest_whitespace_closing_brace_before"));
    assert!(!stdout.contains("clean.pp"));
    assert!(!stdout.contains("README.md"));

    // report mode leaves files alone
    let content = fs::read_to_string(dir.path().join("manifests/init.pp")).unwrap();
    assert!(content.contains("inherits  other"));
}

#[test]
fn test_check_fix_writes_files() {
    let dir = setup_workspace();
    let output = run(dir.path(), &["check", "--fix", "manifests"]);

    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("manifests/init.pp")).unwrap(),
        "class example inherits other::example {\n  $a = {'k' => 'v' }\n}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("manifests/README.md")).unwrap(),
        "{  }\n"
    );

    let again = run(dir.path(), &["check", "manifests"]);
    assert!(again.status.success());
}

#[test]
fn test_check_fix_with_diff() {
    let dir = setup_workspace();
    let output = run(dir.path(), &["check", "--fix", "--diff", "manifests/init.pp"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-class example inherits  other::example {"));
    assert!(stdout.contains("+class example inherits other::example {"));
}

#[test]
fn test_diff_requires_fix() {
    let dir = setup_workspace();
    let output = run(dir.path(), &["check", "--diff", "manifests"]);
    assert!(!output.status.success());
}

#[test]
fn test_check_json_output() {
    let dir = setup_workspace();
    let output = run(dir.path(), &["check", "--format", "json", "manifests"]);

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);

    let problems = reports
        .iter()
        .find(|r| r["path"].as_str().unwrap().ends_with("init.pp"))
        .unwrap()["problems"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(problems.len(), 2);
    assert_eq!(
        problems[0]["check"],
        "manifest_whitespace_inherits_name_single_space_before"
    );
    assert_eq!(problems[0]["line"], 1);
    assert_eq!(problems[0]["column"], 23);
    assert_eq!(problems[0]["kind"], "error");
    assert_eq!(problems[0]["fixed"], false);
}

#[test]
fn test_only_selects_checks() {
    let dir = setup_workspace();
    let output = run(
        dir.path(),
        &[
            "check",
            "--only",
            "manifest_whitespace_inherits_name_single_space_before",
            "manifests",
        ],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init.pp:1:23"));
    assert!(!stdout.contains("init.pp:2:19"));
}

#[test]
fn test_only_rejects_unknown_check() {
    let dir = setup_workspace();
    let output = run(
        dir.path(),
        &["check", "--only", "manifest_whitespace_closing_brace_afte"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did you mean 'manifest_whitespace_closing_brace_after'"));
}

#[test]
fn test_config_disables_check_and_downgrades_severity() {
    let dir = setup_workspace();
    fs::write(
        dir.path().join(".manifest-whitespace.toml"),
        r#"[lint]
disabled = ["manifest_whitespace_inherits_name_single_space_before"]

[severity]
manifest_whitespace_closing_brace_before = "warning"
"#,
    )
    .unwrap();

    let output = run(dir.path(), &["check", "manifests"]);
    // only a warning remains
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("init.pp:1:23"));
    assert!(stdout.contains("init.pp:2:19: warning"));

    let list = run(dir.path(), &["list"]);
    let stdout = String::from_utf8_lossy(&list.stdout);
    assert!(stdout.contains("manifest_whitespace_inherits_name_single_space_before disabled"));
    assert!(stdout.contains("manifest_whitespace_closing_brace_after enabled"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = setup_workspace();
    fs::write(
        dir.path().join(".manifest-whitespace.toml"),
        "[lint]\nextensions = []\n",
    )
    .unwrap();
    let output = run(dir.path(), &["check", "manifests"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lint.extensions must not be empty"));
}

#[test]
fn test_unterminated_string_is_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.pp"), "$a = \"open\n").unwrap();
    let output = run(dir.path(), &["check", "."]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.pp"));
    assert!(stderr.contains("line 1, column 6"));
}

#[test]
fn test_unreadable_file_is_listed_in_json() {
    let dir = setup_workspace();
    fs::write(dir.path().join("manifests/latin1.pp"), b"$a = '\xe9'\n").unwrap();
    let output = run(dir.path(), &["check", "--format", "json", "manifests"]);
    assert!(!output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    let failed = reports
        .iter()
        .find(|r| r["path"].as_str().unwrap().ends_with("latin1.pp"))
        .unwrap();
    assert!(failed.get("problems").is_none());
    assert!(failed["error"].as_str().unwrap().contains("not valid UTF-8"));
}
