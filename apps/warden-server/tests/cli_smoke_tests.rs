//! CLI smoke tests for the warden-server binary.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_warden_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_warden-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute warden-server")
}

async fn run_warden_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_warden-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

/// Config rooted in `dir` so nothing touches the real home directory.
fn write_config(dir: &Path, extra: &str) -> String {
    let path = dir.join("warden.yaml");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0

database:
  url: "sqlite://data/warden.db?mode=rwc"

logging:
  default:
    console_level: info
    file: "logs/warden.log"
    file_level: info
    max_backups: 1
    max_size_mb: 10
{extra}"#,
        home = dir.display()
    );
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_warden_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("warden-server"));
    assert!(stdout.contains("Usage:"));
    for sub in ["run", "check", "migrate", "--config", "--print-config"] {
        assert!(stdout.contains(sub), "help should mention {sub}");
    }
}

#[test]
fn test_cli_version_command() {
    let output = run_warden_server(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_warden_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_warden_server(&["-c", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "unexpected stderr: {stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").unwrap();

    let output = run_warden_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid configuration"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let output = run_warden_server(&["--config", &config, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn test_cli_check_rejects_bad_module_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        temp_dir.path(),
        "\nmodules:\n  authz_data:\n    default_page_size: 0\n",
    );

    let output = run_warden_server(&["--config", &config, "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("default_page_size"));
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let output = run_warden_server(&["--config", &config, "--port", "9911", "--print-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9911"), "unexpected stdout: {stdout}");
}

#[test]
fn test_cli_migrate_creates_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let output = run_warden_server(&["--config", &config, "migrate"]);
    assert!(
        output.status.success(),
        "migrate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(temp_dir.path().join("data/warden.db").exists());

    // Idempotent
    let output = run_warden_server(&["--config", &config, "migrate"]);
    assert!(output.status.success());
}

#[tokio::test]
async fn test_cli_run_starts_server() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(temp_dir.path(), "");

    let result =
        run_warden_server_with_timeout(&["--config", &config, "run"], Duration::from_secs(5)).await;

    match result {
        // Timeout means the server was up and serving.
        Err(err) => assert!(err.to_string().contains("elapsed"), "unexpected: {err}"),
        Ok(output) => panic!(
            "server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
    }
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_warden_server(&["migrate", "--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("migrations"));
}
