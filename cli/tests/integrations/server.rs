use assert_cmd::Command;

#[test]
fn test_server_command_available() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("server"));
}

#[test]
fn test_server_rejects_bad_config() {
    let mut cmd = Command::cargo_bin("grossup").unwrap();
    cmd.args(["server", "--config", "/definitely/not/here.json"]);

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Configuration error"));
}
