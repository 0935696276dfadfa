use super::identity_config;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_solve_identity() {
    let temp_dir = TempDir::new().unwrap();
    let config = identity_config(&temp_dir);

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.arg("solve")
        .arg("10")
        .arg("--start")
        .arg("0")
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Gross salary"))
        .stdout(predicate::str::contains("10.00"))
        .stdout(predicate::str::contains("406"));
}

#[test]
fn test_cli_solve_raw() {
    let temp_dir = TempDir::new().unwrap();
    let config = identity_config(&temp_dir);

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "7.5", "--start", "0", "--raw", "--config"])
        .arg(&config);

    cmd.assert().success().stdout("7.50\n");
}

#[test]
fn test_cli_solve_default_payroll() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "925", "--raw"]);

    cmd.assert().success().stdout("1000.00\n");
}

#[test]
fn test_cli_solve_target_already_met() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "-5", "--start", "0", "--raw"]);

    cmd.assert().success().stdout("0.00\n");
}

#[test]
fn test_cli_solve_json() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "925", "--json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"iterations\""))
        .stdout(predicate::str::contains("\"net_salary\": \"925.00\""));
}

#[test]
fn test_cli_solve_trace() {
    let temp_dir = TempDir::new().unwrap();
    let config = identity_config(&temp_dir);

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "8", "--start", "0", "--trace", "--config"])
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Step"))
        .stdout(predicate::str::contains("4.01"));
}

#[test]
fn test_cli_solve_iteration_limit() {
    let temp_dir = TempDir::new().unwrap();
    let config = identity_config(&temp_dir);

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "1000", "--start", "0", "--max-iterations", "5", "--config"])
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Search limit exceeded: max_iterations"));
}

#[test]
fn test_cli_solve_unbounded_conflicts_with_limits() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "1000", "--unbounded", "--max-iterations", "5"]);

    cmd.assert().failure();
}

#[test]
fn test_cli_solve_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.json");
    fs::write(&config, r#"{ "step": { "coarse": "0" } }"#).unwrap();

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "10", "--config"]).arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_cli_solve_missing_config() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["solve", "10", "--config"])
        .arg(temp_dir.path().join("nope.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
