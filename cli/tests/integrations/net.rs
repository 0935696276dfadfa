use super::identity_config;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_cli_net_breakdown() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["net", "3000"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Contribution"))
        .stdout(predicate::str::contains("258.82"))
        .stdout(predicate::str::contains("36.15"))
        .stdout(predicate::str::contains("2705.03"));
}

#[test]
fn test_cli_net_raw() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["net", "1000", "--raw"]);

    cmd.assert().success().stdout("925.00\n");
}

#[test]
fn test_cli_net_json_with_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = identity_config(&temp_dir);

    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["net", "1234.56", "--json", "--config"]).arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"net_salary\": \"1234.56\""));
}
