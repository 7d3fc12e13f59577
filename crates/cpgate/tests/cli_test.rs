//! Integration tests for the `cpgate` CLI binary.
//!
//! Argument parsing, help output, and error exits, without a live proxy or
//! management server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with env isolation: no `CPGATE_*` variables and a
/// throwaway home so the user's real config is never read.
fn cpgate_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("cpgate");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("CPGATE_PROXY")
        .env_remove("CPGATE_DOMAIN")
        .env_remove("CPGATE_API_KEY")
        .env_remove("CPGATE_BIND")
        .env_remove("CPGATE_MANAGEMENT_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = cpgate_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("serve")
            .and(predicate::str::contains("gateways"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cpgate"));
}

#[test]
fn test_gateways_clone_help_lists_edit_flags() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .args(["gateways", "clone", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--name")
                .and(predicate::str::contains("--ipv4"))
                .and(predicate::str::contains("--sic-name")),
        );
}

#[test]
fn test_unknown_output_format_is_usage_error() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .args(["-o", "xml", "gateways", "list"])
        .assert()
        .code(2);
}

// ── Error exits ─────────────────────────────────────────────────────

#[test]
fn test_list_without_domain_is_usage_error() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .args(["--api-key", "k", "gateways", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("domain"));
}

#[test]
fn test_list_against_dead_proxy_is_connection_error() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .args([
            "--proxy",
            "http://127.0.0.1:9",
            "--domain",
            "Global",
            "--api-key",
            "k",
            "gateways",
            "list",
        ])
        .assert()
        .code(7);
}

#[test]
fn test_config_path_prints_toml_path() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_renders_defaults_as_json() {
    let home = TempDir::new().unwrap();
    cpgate_cmd(&home)
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"management\"")
                .and(predicate::str::contains("127.0.0.1:3000")),
        );
}
