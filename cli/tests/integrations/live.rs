use super::identity_config;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_live_prints_states_then_result() {
    let temp_dir = TempDir::new().unwrap();
    let config = identity_config(&temp_dir);

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["live", "3", "--start", "0", "--tick-ms", "0", "--config"])
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("gross"))
        .stdout(predicate::str::contains("Gross salary"))
        .stdout(predicate::str::contains("3.00"));
}

#[test]
fn test_cli_live_target_already_met() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["live", "100", "--start", "5000"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#0"))
        .stdout(predicate::str::contains("5000.00"));
}
