use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_code-explainer"));
    // Default log filter regardless of the caller's environment
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Animated code walkthrough renderer"));
}

#[test]
fn test_cli_list() {
    cli()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("AsyncProcessingExplanation"));
}

#[test]
fn test_cli_timeline_json() {
    let output = cli().arg("timeline").arg("--json").output().unwrap();
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let steps = steps.as_array().unwrap();
    assert_eq!(steps.len(), 39);
}

#[test]
fn test_cli_timeline_summary() {
    cli()
        .arg("timeline")
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 57.00s"))
        .stdout(predicate::str::contains("Fingerprint:"));
}

#[test]
fn test_cli_check() {
    cli()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check passed"));
}

#[test]
fn test_cli_unknown_scene() {
    cli()
        .arg("timeline")
        .arg("NoSuchScene")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scene"));
}

#[test]
fn test_cli_render_unknown_scene() {
    let dir = tempdir().unwrap();

    cli()
        .arg("render")
        .arg("Missing")
        .arg("--output")
        .arg(dir.path())
        .arg("--no-encode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("known scenes: AsyncProcessingExplanation"));

    assert!(!dir.path().join("Missing").exists());
}

#[test]
fn test_cli_config_env_override() {
    cli()
        .arg("config")
        .env("CODE_EXPLAINER_RENDER__QUALITY", "h")
        .assert()
        .success()
        .stdout(predicate::str::contains("quality = \"h\""))
        .stdout(predicate::str::contains("codec = \"libx264\""));
}
