//! Integration tests for the `shelterly` CLI binary.
//!
//! Argument parsing, help output, completions, local login state, and
//! error exit codes, plus a few directory reads against a mock backend.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NOWHERE: &str = "/tmp/shelterly-cli-test-nonexistent";

/// Build a command for the `shelterly` binary with env isolation.
///
/// Clears all `SHELTERLY_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real state.
fn shelterly_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shelterly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("SHELTERLY_PROFILE")
        .env_remove("SHELTERLY_API_URL")
        .env_remove("SHELTERLY_OUTPUT")
        .env_remove("SHELTERLY_INSECURE")
        .env_remove("SHELTERLY_TIMEOUT")
        .env_remove("SHELTERLY_PASSWORD");
    cmd
}

fn shelterly_cmd() -> assert_cmd::Command {
    shelterly_cmd_in(Path::new(NOWHERE))
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn shelter_json(id: i64, name: &str, availability: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "addressLine1": "123 San Fernando Rd",
        "city": "San Jose",
        "state": "CA",
        "zipCode": "95112",
        "latitude": 37.33,
        "longitude": -121.89,
        "totalCapacity": 10,
        "currentAvailability": availability,
        "shelterType": "CONGREGATE",
        "allowsPets": true,
        "allowsPartner": false,
        "active": true
    })
}

async fn mock_directory() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/shelters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            shelter_json(1, "Casa A", 3),
            shelter_json(2, "Hope Village", 0),
        ])))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = shelterly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    shelterly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("shelters")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("tasks"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    shelterly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelterly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    shelterly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    shelterly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = shelterly_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = shelterly_cmd()
        .args(["--output", "invalid", "shelters", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_api_url() {
    shelterly_cmd()
        .args(["--api-url", "not a url", "shelters", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

#[test]
fn test_backend_unreachable() {
    shelterly_cmd()
        .args(["--api-url", "http://127.0.0.1:1", "shelters", "list"])
        .assert()
        .code(7);
}

#[test]
fn test_reserve_and_client_name_conflict() {
    shelterly_cmd()
        .args(["shelters", "reserve", "1", "--name", "Ana", "--client", "9"])
        .assert()
        .code(2);
}

#[test]
fn test_config_show_no_config() {
    shelterly_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_use_unknown_profile() {
    shelterly_cmd()
        .args(["config", "use", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// ── Login state ─────────────────────────────────────────────────────

#[test]
fn test_whoami_not_logged_in() {
    shelterly_cmd().arg("whoami").assert().code(3);
}

#[test]
fn test_login_wrong_password() {
    shelterly_cmd()
        .args([
            "login",
            "--email",
            "demo@example.com",
            "--role",
            "caseworker",
            "--password-stdin",
        ])
        .write_stdin("wrong\n")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("demo@example.com"));
}

#[test]
fn test_login_whoami_logout() {
    let home = tempfile::tempdir().unwrap();

    shelterly_cmd_in(home.path())
        .args([
            "login",
            "--email",
            "demo@example.com",
            "--role",
            "caseworker",
            "--password-stdin",
        ])
        .write_stdin("password\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in as Case Worker"));

    shelterly_cmd_in(home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo@example.com"));

    shelterly_cmd_in(home.path()).arg("logout").assert().success();
    shelterly_cmd_in(home.path()).arg("whoami").assert().code(3);
}

#[test]
fn test_analytics_requires_login() {
    shelterly_cmd()
        .args(["--api-url", "http://127.0.0.1:1", "analytics", "shelters"])
        .assert()
        .code(3);
}

#[test]
fn test_analytics_requires_admin() {
    let home = tempfile::tempdir().unwrap();
    shelterly_cmd_in(home.path())
        .args([
            "login",
            "-e",
            "demo@example.com",
            "-r",
            "caseworker",
            "--password-stdin",
        ])
        .write_stdin("password\n")
        .assert()
        .success();

    shelterly_cmd_in(home.path())
        .args(["--api-url", "http://127.0.0.1:1", "analytics", "types"])
        .assert()
        .code(5);
}

// ── Directory against a mock backend ────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_shelters_list_json() {
    let server = mock_directory().await;
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        shelterly_cmd()
            .args(["--api-url", &uri, "-o", "json", "shelters", "list"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["Casa A", "Hope Village"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shelters_list_local_filter() {
    let server = mock_directory().await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        shelterly_cmd()
            .args(["--api-url", &uri, "-o", "plain", "shelters", "list", "-f", "hope"])
            .assert()
            .success()
            .stdout("2\n");
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reserve_requires_login() {
    let server = mock_directory().await;
    let uri = server.uri();

    tokio::task::spawn_blocking(move || {
        shelterly_cmd()
            .args(["--api-url", &uri, "shelters", "reserve", "1", "--name", "Ana"])
            .assert()
            .code(3);
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reserve_rejected_session_is_forgotten() {
    let server = mock_directory().await;
    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();
    let home = tempfile::tempdir().unwrap();
    let home_path = home.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        shelterly_cmd_in(&home_path)
            .args([
                "login",
                "-e",
                "demo@example.com",
                "-r",
                "caseworker",
                "--password-stdin",
            ])
            .write_stdin("password\n")
            .assert()
            .success();

        shelterly_cmd_in(&home_path)
            .args(["--api-url", &uri, "shelters", "reserve", "1", "--name", "Ana"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Session expired"));

        shelterly_cmd_in(&home_path).arg("whoami").assert().code(3);
    })
    .await
    .unwrap();
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_shelters_subcommands_exist() {
    shelterly_cmd()
        .args(["shelters", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("search"))
                .and(predicate::str::contains("get"))
                .and(predicate::str::contains("reserve")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    shelterly_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles")),
        );
}
