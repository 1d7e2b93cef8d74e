use std::path::Path;
use std::process::{Command, Output};

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use tempfile::TempDir;

const CLOUD9_ENVIRONMENT_ARN: &str =
    "arn:${Partition}:cloud9:${Region}:${Account}:environment:${ResourceId}";

const DEMO_SERVICE: &str = r#"{
    "Name": "demo",
    "Version": "v1.0",
    "Actions": [
        {"Name": "GetWidget", "AccessLevel": "Read", "Resources": [{"Name": "widget"}]},
        {"Name": "ListWidgets", "AccessLevel": "List"}
    ],
    "Resources": [
        {"Name": "widget", "ARNFormats": ["arn:${Partition}:demo:${Region}:${Account}:widget/${WidgetId}"]}
    ],
    "ConditionKeys": []
}"#;

/// Runs the binary with an empty HOME so a per-user dataset never leaks into the test.
fn iam_query(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_iam-query"))
        .args(args)
        .env("HOME", home)
        .env_remove("IAM_QUERY_DATASET_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run iam-query")
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    let out = iam_query(home.path(), &["--help"]);
    let s = String::from_utf8_lossy(&out.stdout);

    assert_eq!(out.status.code(), Some(0));
    assert!(s.contains("query"), "help was: {}", s);
    assert!(s.contains("services"), "help was: {}", s);
}

#[test]
fn test_cloud9_raw_arn_listing() {
    let home = TempDir::new().unwrap();
    let output = iam_query(home.path(), &["query", "--table", "arn", "--service", "cloud9"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(
        stdout.lines().any(|line| line == CLOUD9_ENVIRONMENT_ARN),
        "stdout was: {}",
        stdout
    );
}

#[test]
fn test_arn_type_detail_is_json() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &["query", "--table", "arn", "--service", "cloud9", "--name", "environment"],
    );

    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["short_name"], "environment");
    assert_eq!(value["raw_arn_template"], CLOUD9_ENVIRONMENT_ARN);
}

#[test]
fn test_s3_permissions_management_actions() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &[
            "query",
            "--table",
            "action",
            "--service",
            "s3",
            "--access-level",
            "permissions-management",
        ],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert!(
        stdout.contains("Access level: \"Permissions management\""),
        "stdout was: {}",
        stdout
    );
    assert!(stdout.contains("PutBucketPolicy"), "stdout was: {}", stdout);
    assert!(!stdout.contains("\"GetObject\""), "stdout was: {}", stdout);
}

#[test]
fn test_wildcard_only_json_output() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &[
            "query",
            "--table",
            "action",
            "--service",
            "s3",
            "--wildcard-only",
            "--fmt",
            "json",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(names.contains(&"ListAllMyBuckets".to_string()));
    assert!(!names.contains(&"PutObject".to_string()));
}

#[test]
fn test_arn_type_with_access_level() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &[
            "query",
            "--table",
            "action",
            "--service",
            "s3",
            "--arn-type",
            "object",
            "--access-level",
            "write",
            "--fmt",
            "json",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let names: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(names.contains(&"PutObject".to_string()));
    assert!(!names.contains(&"CreateBucket".to_string()));
}

#[test]
fn test_unknown_service_is_user_error() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &["query", "--table", "condition", "--service", "notaservice"],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("notaservice"), "stderr was: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_action_name_is_user_error() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &["query", "--table", "action", "--service", "s3", "--name", "FlyToTheMoon"],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("FlyToTheMoon"), "stderr was: {}", stderr);
}

#[test]
fn test_conflicting_filters_rejected() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &[
            "query",
            "--table",
            "action",
            "--service",
            "s3",
            "--wildcard-only",
            "--condition",
            "s3:prefix",
        ],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("Conflicting filters"), "stderr was: {}", stderr);
}

#[test]
fn test_unlisted_access_level_rejected() {
    let home = TempDir::new().unwrap();
    let output = iam_query(
        home.path(),
        &["query", "--table", "action", "--service", "s3", "--access-level", "admin"],
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("permissions-management"), "stderr was: {}", stderr);
}

#[test]
fn test_empty_dataset_dir_is_dataset_error() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();

    AssertCommand::cargo_bin("iam-query")
        .unwrap()
        .env("HOME", home.path())
        .args(["--dataset-dir", empty.path().to_str().unwrap()])
        .args(["query", "--table", "action", "--service", "s3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Dataset unavailable"));
}

#[test]
fn test_dataset_dir_from_environment() {
    let home = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    std::fs::write(data.path().join("demo.json"), DEMO_SERVICE).unwrap();

    AssertCommand::cargo_bin("iam-query")
        .unwrap()
        .env("HOME", home.path())
        .env("IAM_QUERY_DATASET_DIR", data.path())
        .args(["query", "--table", "action", "--service", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALL demo actions:"))
        .stdout(predicate::str::contains("ListWidgets"));
}

#[test]
fn test_home_dataset_replaces_embedded_corpus() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".iam-query/service-reference");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("demo.json"), DEMO_SERVICE).unwrap();

    let output = iam_query(home.path(), &["services"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout.trim(), "demo");
}

#[test]
fn test_services_lists_embedded_corpus() {
    let home = TempDir::new().unwrap();
    let output = iam_query(home.path(), &["services", "--fmt", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let services: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(services, vec!["cloud9", "s3"]);
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let home = TempDir::new().unwrap();
    let output = iam_query(home.path(), &["-v", "services"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(0));
    assert!(
        stderr.contains("Loaded 2 services from embedded service reference"),
        "stderr was: {}",
        stderr
    );
    assert!(!stdout.contains("Loaded"), "stdout was: {}", stdout);
}
