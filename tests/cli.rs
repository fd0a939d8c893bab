//! Integration tests for top-level CLI behavior.

use std::path::Path;
use std::process::Command;

fn run_prbridge(dir: &Path, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_prbridge");
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env_remove("PRBRIDGE_CONFIG")
        .env_remove("PRBRIDGE_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run prbridge binary")
}

fn git(dir: &Path, args: &[&str]) {
    let status =
        Command::new("git").arg("-C").arg(dir).args(args).status().expect("failed to run git");
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn classify_prints_kind() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["classify", "commented"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "commented");

    let output = run_prbridge(dir.path(), &["classify", "Committed"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "other");
}

#[test]
fn split_prints_title_and_body_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["split", "--message", "fix bug\n\nDetails here\nmore"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["title"], "fix bug");
    assert_eq!(value["body"], "\nDetails here\nmore");
}

#[test]
fn status_reports_forge_repositories() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["remote", "add", "origin", "git@github.com:acme/app.git"]);

    let output = run_prbridge(dir.path(), &["status", "--json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["state"], "NeedsAuthentication");
    assert_eq!(report["folders"][0]["repositories"][0], "acme/app");
}

#[test]
fn status_with_token_is_ready() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["remote", "add", "origin", "https://github.com/acme/app.git"]);

    let output = Command::new(env!("CARGO_BIN_EXE_prbridge"))
        .args(["status"])
        .current_dir(dir.path())
        .env_remove("PRBRIDGE_CONFIG")
        .env("PRBRIDGE_TOKEN", "secret")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("State: Ready"));
}

#[test]
fn status_outside_repository_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["status", "--json"]);
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["folders"][0]["error"].is_string());
}

#[test]
fn owner_routes_url_to_folder() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["remote", "add", "origin", "https://github.com/acme/app.git"]);
    let root = dir.path().to_str().unwrap();

    let output = run_prbridge(dir.path(), &["owner", "https://github.com/acme/app", root]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), root);

    let output = run_prbridge(dir.path(), &["owner", "https://github.com/acme/other.git", root]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No folder owns"));
}

#[test]
fn check_fails_without_forge_remotes() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);

    let output = run_prbridge(dir.path(), &["check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("has no forge remotes"));
}

#[test]
fn login_without_token_has_no_session() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["login"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No session available"));
}

#[test]
fn logout_without_token_clears_cache() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["logout"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Credential cache cleared"));
}

#[test]
fn logout_with_token_says_token_is_still_set() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_prbridge"))
        .args(["logout"])
        .current_dir(dir.path())
        .env_remove("PRBRIDGE_CONFIG")
        .env("PRBRIDGE_TOKEN", "secret")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PRBRIDGE_TOKEN is still set"));
    assert!(!stdout.contains("Credential cache cleared"));
}

#[test]
fn invalid_config_file_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["--config", "missing.yaml", "classify", "x"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_prbridge(dir.path(), &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
