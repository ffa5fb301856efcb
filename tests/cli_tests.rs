use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_theorem-lantern"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Math Explainer Video Service"));
}

#[test]
fn test_cli_sample_algebra() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_theorem-lantern"));
    let assert = cmd.arg("sample").arg("algebra").assert();

    assert
        .success()
        .stdout(predicate::str::contains("\"category\": \"algebra\""))
        .stdout(predicate::str::contains("\"steps\""));
}

#[test]
fn test_cli_sample_geometry_carries_kind() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_theorem-lantern"));
    cmd.arg("sample")
        .arg("geometry")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"circle\""));
}

#[test]
fn test_cli_render_rejects_missing_content_file() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_theorem-lantern"));
    cmd.arg("render")
        .arg("does-not-exist.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read content file"));
}
