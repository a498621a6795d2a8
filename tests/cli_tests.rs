//! Integration tests for the filecache binary
//!
//! Runs the CLI against a temporary storage directory.

use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// Helper to run the CLI with given args against `dir` and capture output
fn run_cli(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_filecache"))
        .args(args)
        .env("CACHE_DIR", dir.path())
        .env_remove("CACHE_TTL")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute filecache")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_help_flag_exits_successfully() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["--help"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("filecache"));
    assert!(text.contains("cleanup"));
}

#[test]
fn test_set_then_get_json() {
    let dir = TempDir::new().unwrap();

    assert!(run_cli(&dir, &["set", "user:1", r#"{"name":"alice","age":30}"#]).status.success());

    let output = run_cli(&dir, &["get", "user:1"]);
    assert!(output.status.success());
    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["name"], "alice");
    assert_eq!(value["age"], 30);
}

#[test]
fn test_set_plain_string() {
    let dir = TempDir::new().unwrap();

    run_cli(&dir, &["set", "greeting", "hello world"]);

    let output = run_cli(&dir, &["get", "greeting"]);
    assert_eq!(stdout(&output), "\"hello world\"");
}

#[test]
fn test_get_miss_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["get", "missing"]);

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_delete_is_idempotent() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["set", "k", "1"]);

    assert!(run_cli(&dir, &["delete", "k"]).status.success());
    assert!(run_cli(&dir, &["delete", "k"]).status.success());
    assert!(!run_cli(&dir, &["get", "k"]).status.success());
}

#[test]
fn test_stats_json_and_clear() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["set", "a", "1"]);
    run_cli(&dir, &["set", "b", "2"]);

    let output = run_cli(&dir, &["stats", "--json"]);
    assert!(output.status.success());
    let stats: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(stats["total_count"], 2);
    assert_eq!(stats["valid_count"], 2);

    assert!(run_cli(&dir, &["clear"]).status.success());

    let stats: Value = serde_json::from_str(&stdout(&run_cli(&dir, &["stats", "--json"]))).unwrap();
    assert_eq!(stats["total_count"], 0);
}

#[test]
fn test_stats_table() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["set", "a", "1"]);

    let text = stdout(&run_cli(&dir, &["stats"]));
    assert!(text.contains("Total entries:   1"));
    assert!(text.contains("Valid entries:   1"));
}

#[test]
fn test_cleanup_prints_removed_count() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["set", "a", "1"]);
    std::fs::write(dir.path().join("0123abcd.json"), "garbage").unwrap();

    let output = run_cli(&dir, &["cleanup"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1");
}

#[test]
fn test_dir_flag_overrides_environment() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();
    let flag_path = flag_dir.path().to_str().unwrap();

    run_cli(&env_dir, &["--dir", flag_path, "set", "k", "v"]);

    assert!(!run_cli(&env_dir, &["get", "k"]).status.success());
    assert!(run_cli(&env_dir, &["--dir", flag_path, "get", "k"]).status.success());
}

#[test]
fn test_zero_ttl_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run_cli(&dir, &["--ttl", "0", "stats"]);
    assert!(!output.status.success());
}
