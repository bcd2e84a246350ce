//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a throwaway config file and a saved
//! provider response, then check stdout JSON and the exit code.

use std::path::{Path, PathBuf};
use std::process::Command;

struct Sandbox {
    dir: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn write_response(&self, body: &str) -> PathBuf {
        let path = self.dir.path().join("response.json");
        std::fs::write(&path, body).expect("write response");
        path
    }

    /// Run the CLI and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_taskview"))
            .args(args)
            .env("TASKVIEW_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

const RESPONSE: &str = r#"{
    "success": true,
    "tasks": [
        {"id": "1", "name": "Pay rent", "flagged": true, "dueDate": "2026-10-18T09:00:00Z"},
        {"id": "2", "name": "Read paper", "estimatedMinutes": 90},
        {"id": "3", "name": "Old chore", "completed": true},
        {"id": "4", "name": "Call plumber", "dueDate": "2026-10-20T09:00:00Z", "estimatedMinutes": 10, "tags": ["phone"]}
    ],
    "projects": [
        {"id": "p1", "name": "Home", "status": "active"},
        {"id": "p2", "name": "Move", "status": "dropped"}
    ]
}"#;

#[test]
fn test_query_prints_prioritized_json() {
    let sandbox = Sandbox::new();
    let response = sandbox.write_response(RESPONSE);
    let (stdout, stderr, code) = sandbox.run(&[
        "query",
        "Today",
        "--response-file",
        &path_arg(&response),
        "--now",
        "2026-10-19T09:00:00Z",
    ]);
    assert_eq!(code, 0, "query failed: {stderr}");

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    assert_eq!(json["success"], true);
    let ids: Vec<_> = json["result"]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["1", "4", "2"]);
    assert_eq!(json["result"]["stats"]["totalFiltered"], 3);
    assert_eq!(json["result"]["projects"].as_array().unwrap().len(), 1);
}

#[test]
fn test_query_tag_filter() {
    let sandbox = Sandbox::new();
    let response = sandbox.write_response(RESPONSE);
    let (stdout, _, code) = sandbox.run(&[
        "query",
        "Today",
        "--response-file",
        &path_arg(&response),
        "--tag",
        "phone",
    ]);
    assert_eq!(code, 0);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let tasks = json["result"]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "4");
}

#[test]
fn test_query_provider_error_exits_nonzero() {
    let sandbox = Sandbox::new();
    let response = sandbox.write_response(r#"{"success":false,"error":"Perspective not found"}"#);
    let (stdout, stderr, code) = sandbox.run(&["query", "Nope", "--response-file", &path_arg(&response)]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Perspective not found"));

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Perspective not found");
}

#[test]
fn test_query_rejects_non_positive_budget() {
    let sandbox = Sandbox::new();
    let response = sandbox.write_response(RESPONSE);
    let (_, stderr, code) = sandbox.run(&[
        "query",
        "Today",
        "--response-file",
        &path_arg(&response),
        "--budget",
        "0",
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("positive integer"));
}

#[test]
fn test_query_without_provider_fails() {
    let sandbox = Sandbox::new();
    let (_, stderr, code) = sandbox.run(&["query", "Today"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no provider configured"));
}

#[test]
fn test_config_set_and_get() {
    let sandbox = Sandbox::new();
    let (stdout, _, code) = sandbox.run(&["config", "set", "defaults.budget", "42"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ok"));

    let (stdout, _, code) = sandbox.run(&["config", "get", "defaults.budget"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "42");

    let (_, _, code) = sandbox.run(&["config", "get", "defaults.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_path_honors_override() {
    let sandbox = Sandbox::new();
    let (stdout, _, code) = sandbox.run(&["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), path_arg(&sandbox.config_path()));
}

#[test]
fn test_query_collapses_duplicates_only_on_request() {
    let sandbox = Sandbox::new();
    let response = sandbox.write_response(
        r#"{"success":true,"tasks":[
            {"id":"a","name":"Water plants","projectName":"Home"},
            {"id":"b","name":"Water plants","projectName":"Home"}
        ]}"#,
    );
    let response = path_arg(&response);

    let (stdout, _, code) = sandbox.run(&["query", "Today", "--response-file", &response]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["result"]["tasks"].as_array().unwrap().len(), 2);

    let (stdout, _, code) = sandbox.run(&[
        "query",
        "Today",
        "--response-file",
        &response,
        "--collapse-duplicates",
    ]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["result"]["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(json["result"]["stats"]["droppedAsDuplicate"], 1);
}
