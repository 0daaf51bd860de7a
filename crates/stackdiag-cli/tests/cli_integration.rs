//! CLI integration tests
//!
//! These tests run the `stackdiag` binary and check the stdout/exit-code
//! contract:
//! - wrong argument count prints the usage object and exits 1
//! - an unreadable stack status prints the error object and exits 1
//! - `--help` / `--version` exit 0

use std::process::{Command, Output};

use serde_json::Value;

fn stackdiag() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stackdiag"));
    // Keep the binary away from any real account or local AWS setup.
    cmd.env_remove("RUST_LOG")
        .env_remove("STACKDIAG_REGION")
        .env_remove("STACKDIAG_PROFILE")
        .env_remove("STACKDIAG_ENDPOINT_URL")
        .env_remove("AWS_PROFILE")
        .env("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE")
        .env("AWS_SECRET_ACCESS_KEY", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .env("AWS_REGION", "us-east-1")
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .env("AWS_CONFIG_FILE", "/nonexistent/stackdiag/config")
        .env("AWS_SHARED_CREDENTIALS_FILE", "/nonexistent/stackdiag/credentials");
    cmd
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| panic!("stdout not JSON ({e}): {stdout}"))
}

#[test]
fn test_no_arguments_is_usage_error() {
    let output = stackdiag().output().expect("run stackdiag");

    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert_eq!(value["error"], "Usage: stackdiag [OPTIONS] <stack_name>");
    assert!(value.get("reason").is_none());
}

#[test]
fn test_two_arguments_is_usage_error() {
    let output = stackdiag()
        .args(["web-app", "api-app"])
        .output()
        .expect("run stackdiag");

    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert!(value["error"].as_str().unwrap().starts_with("Usage: "));
}

#[test]
fn test_out_of_range_depth_is_usage_error() {
    let output = stackdiag()
        .args(["web-app", "--nested-depth", "9"])
        .output()
        .expect("run stackdiag");

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_json(&output)["error"]
        .as_str()
        .unwrap()
        .contains("<stack_name>"));
}

#[test]
fn test_help_exits_zero() {
    let output = stackdiag().arg("--help").output().expect("run stackdiag");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("stackdiag"));
    assert!(stdout.contains("--nested-depth"));
}

#[test]
fn test_version_exits_zero() {
    let output = stackdiag().arg("--version").output().expect("run stackdiag");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unreachable_endpoint_is_status_failure() {
    let output = stackdiag()
        .args(["web-app", "--endpoint-url", "http://127.0.0.1:1"])
        .output()
        .expect("run stackdiag");

    assert_eq!(output.status.code(), Some(1));
    let value = stdout_json(&output);
    assert_eq!(value["error"], "Failed to retrieve stack status");
    assert!(!value["reason"].as_str().unwrap().is_empty());
    assert!(value.get("StackName").is_none());
    assert!(value.get("StackStatus").is_none());
}
