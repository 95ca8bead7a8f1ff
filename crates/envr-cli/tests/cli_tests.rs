//! Integration tests for the envr binary

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the envr binary
fn envr_cmd() -> Command {
    let mut cmd = Command::cargo_bin("envr").expect("Failed to find envr binary");
    cmd.env_remove("RUST_LOG").env_remove("ENVR_CONFIG");
    cmd
}

// ============================================================================
// resolve Command Tests
// ============================================================================

#[test]
fn test_resolve_property() {
    envr_cmd()
        .args(["resolve", "/port:int", "-p", "port=8080"])
        .assert()
        .success()
        .stdout("8080\n");
}

#[test]
fn test_resolve_missing_value_fails() {
    envr_cmd()
        .args(["resolve", "/envr-e2e-missing:int"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No value for /envr-e2e-missing:int"));
}

#[test]
fn test_resolve_type_mismatch_fails() {
    envr_cmd()
        .args(["resolve", "/port:int", "-p", "port=eighty"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot convert \"eighty\" to int"));
}

#[test]
fn test_resolve_environment_variable() {
    envr_cmd()
        .args(["resolve", "/db.host:string", "--env-prefix", "envr_e2e"])
        .env("ENVR_E2E_DB_HOST", "db.internal")
        .assert()
        .success()
        .stdout("db.internal\n");
}

#[test]
fn test_property_takes_precedence_over_environment() {
    envr_cmd()
        .args(["resolve", "/timeout:int", "-p", "timeout=5", "--env-prefix", "envr_e2e"])
        .env("ENVR_E2E_TIMEOUT", "60")
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_resolve_qualifiers() {
    envr_cmd()
        .args(["resolve", "/:Qualifiers", "-q", "env=prod", "-q", "region=eu"])
        .assert()
        .success()
        .stdout("env=prod;region=eu\n");
}

#[test]
fn test_resolve_json() {
    envr_cmd()
        .args(["resolve", "/port:int", "-p", "port=8080", "-q", "env=prod", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"path\": \"/port:int\""))
        .stdout(predicate::str::contains("\"value\": 8080"))
        .stdout(predicate::str::contains("\"env\": \"prod\""))
        .stdout(predicate::str::contains("\"deterministic\": false"));
}

#[test]
fn test_resolve_with_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("envr.toml");
    fs::write(
        &config,
        r#"
[properties]
"workers" = "12"
"#,
    )
    .unwrap();

    envr_cmd()
        .args(["resolve", "/workers:int", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout("12\n");
}

#[test]
fn test_resolve_missing_config_file() {
    envr_cmd()
        .args(["resolve", "/workers:int", "--config", "/definitely/not/here.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("here.toml"));
}

#[test]
fn test_resolve_malformed_path() {
    envr_cmd()
        .args(["resolve", "/a//b:int"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// parse and types Command Tests
// ============================================================================

#[test]
fn test_parse_json() {
    envr_cmd()
        .args(["parse", "/db/port:int", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"absolute\": true"))
        .stdout(predicate::str::contains("\"name\": \"port\""))
        .stdout(predicate::str::contains("\"type\": \"int\""));
}

#[test]
fn test_parse_shows_elements() {
    envr_cmd()
        .args(["parse", "/db/port:int"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(root)"))
        .stdout(predicate::str::contains("port"));
}

#[test]
fn test_types_lists_builtins() {
    envr_cmd()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built-in Types"))
        .stdout(predicate::str::contains("Qualifiers"))
        .stdout(predicate::str::contains("double"));
}

#[test]
fn test_no_command_shows_hint() {
    envr_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("envr --help"));
}
