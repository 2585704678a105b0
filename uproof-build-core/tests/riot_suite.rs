//! Integration tests for the suite runner
//!
//! Runs the RIOT harness suite end to end: configuration file, parallel
//! exploration, per-target logs, accumulated metrics and summaries.

use std::path::Path;

use tempfile::TempDir;
use uproof_build_core::{
    metrics::{
        load_metrics_jsonl,
        write_metrics_csv,
    },
    summary::{
        default_summary_path,
        summarize,
        write_summary_json,
    },
    Expectation,
    RunOptions,
    SuiteConfig,
    SuiteRunner,
};

const SUITE: &str = r#"
[suite]
name = "riot"
output_dir = "out"
jobs = 0

[exploration]
unwind = 2

[[targets]]
function = "event_timeout_set"

[[targets]]
function = "event_timeout_lifecycle"

[[targets]]
function = "usbus_register_event_handler"

[[targets]]
function = "usbus_register_event_handler_twice"
expect = "fail"
"#;

fn write_suite(dir: &Path) -> SuiteConfig {
    let path = dir.join("uproof.toml");
    std::fs::write(&path, SUITE).unwrap();
    SuiteConfig::load(&path).unwrap()
}

#[test]
fn test_riot_suite_meets_expectations() {
    let dir = TempDir::new().unwrap();
    let config = write_suite(dir.path());
    assert_eq!(config.suite.output_dir, dir.path().join("out"));

    let runner = SuiteRunner::new(uproof_riot::registry());
    let result = runner.run(&config, &RunOptions::default()).unwrap();

    assert!(result.all_expectations_met(), "{:?}", result.errors);
    assert_eq!(result.records.len(), 4);
    for record in &result.records {
        assert!(dir.path().join("out/logs").join(format!("{}.log", record.function)).exists());
        assert_eq!(record.run_id, result.run_id);
    }

    let twice = &result.records[3];
    assert_eq!(twice.expect, Expectation::Fail);
    assert_eq!(twice.outcome, "failed");
    assert!(twice.verification.error_count >= 1);

    let set = &result.records[0];
    assert!(set.is_verified());
    assert_eq!(set.coverage_reductions, 0);
    assert_eq!(set.stub_count, 3);
}

#[test]
fn test_runs_accumulate_and_summarize() {
    let dir = TempDir::new().unwrap();
    let config = write_suite(dir.path());
    let runner = SuiteRunner::new(uproof_riot::registry());
    let options = RunOptions {
        limit:   2,
        jobs:    Some(2),
        dry_run: false,
    };

    runner.run(&config, &options).unwrap();
    runner.run(&config, &options).unwrap();

    let records = load_metrics_jsonl(&config.metrics_path()).unwrap();
    assert_eq!(records.len(), 4);

    let summary = summarize(&records);
    assert_eq!(summary.targets_total, 4);
    assert_eq!(summary.verified_rate, 1.0);
    assert_eq!(summary.expectation_met_rate, 1.0);

    let summary_path = default_summary_path(&config.metrics_path());
    assert_eq!(summary_path, dir.path().join("out/summary.json"));
    write_summary_json(&summary, &summary_path).unwrap();
    assert!(summary_path.exists());

    let csv = dir.path().join("out/metrics.csv");
    write_metrics_csv(&records, &csv).unwrap();
    assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 5);
}

#[test]
fn test_unknown_target_fails_before_running() {
    let dir = TempDir::new().unwrap();
    let mut config = write_suite(dir.path());
    config.targets.push(uproof_build_core::TargetConfig::new("ztimer_set"));

    let runner = SuiteRunner::new(uproof_riot::registry());
    assert!(runner.run(&config, &RunOptions::default()).is_err());
    assert!(!config.metrics_path().exists());
}
