//! Integration tests for the cargo-uproof binary

use std::{
    path::Path,
    process::{
        Command,
        Output,
    },
};

use tempfile::TempDir;

const SUITE: &str = r#"
[suite]
name = "riot"
output_dir = "out"

[[targets]]
function = "usbus_register_event_handler"

[[targets]]
function = "usbus_register_event_handler_twice"
expect = "fail"
"#;

fn cargo_uproof(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cargo-uproof"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_suite(dir: &Path, text: &str) -> String {
    let path = dir.join("uproof.toml");
    std::fs::write(&path, text).unwrap();
    path.display().to_string()
}

#[test]
fn test_list_names_every_harness() {
    let output = cargo_uproof(&["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("event_timeout_set"));
    assert!(stdout.contains("usbus_register_event_handler_twice"));
}

#[test]
fn test_cargo_subcommand_form() {
    let output = cargo_uproof(&["uproof", "--output", "json", "list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.trim_start().starts_with('['));
}

#[test]
fn test_run_then_summarize() {
    let dir = TempDir::new().unwrap();
    let config = write_suite(dir.path(), SUITE);

    let run = cargo_uproof(&["--output", "json", "run", "--config", &config]);
    assert!(run.status.success(), "{}", String::from_utf8_lossy(&run.stderr));
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("\"suite\": \"riot\""));

    let metrics = dir.path().join("out/metrics.jsonl");
    let csv = dir.path().join("out/metrics.csv");
    let summarize = cargo_uproof(&[
        "summarize",
        &metrics.display().to_string(),
        "--csv",
        &csv.display().to_string(),
    ]);
    assert!(summarize.status.success());
    assert!(dir.path().join("out/summary.json").exists());
    assert!(csv.exists());
}

#[test]
fn test_unmet_expectation_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let config = write_suite(dir.path(), &SUITE.replace("expect = \"fail\"", "expect = \"pass\""));

    let run = cargo_uproof(&["run", "--config", &config]);
    assert!(!run.status.success());
    assert!(String::from_utf8_lossy(&run.stderr).contains("did not meet its expectations"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = write_suite(dir.path(), SUITE);

    let run = cargo_uproof(&["run", "--config", &config, "--dry-run", "--limit", "1"]);
    assert!(run.status.success());
    assert!(String::from_utf8_lossy(&run.stdout).contains("usbus_register_event_handler"));
    assert!(!dir.path().join("out/metrics.jsonl").exists());
}
