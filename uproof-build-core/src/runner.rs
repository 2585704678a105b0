//! Parallel suite runner
//!
//! Each selected target is explored in isolation on a bounded rayon pool.
//! A target's report goes to `<output_dir>/logs/<function>.log` and its
//! metrics are appended to `<output_dir>/metrics.jsonl` once every target
//! has finished.

use std::path::{
    Path,
    PathBuf,
};

use rayon::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
    warn,
};
use uproof_foundation::{
    Explorer,
    Harness,
    HarnessRegistry,
    ProofReport,
};

use crate::{
    config::{
        SuiteConfig,
        TargetConfig,
    },
    error::{
        BuildError,
        BuildResult,
    },
    metrics::{
        append_metrics_jsonl,
        MetricsRecord,
    },
    summary::{
        summarize,
        Summary,
    },
};

/// Per-invocation overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Run only the first `limit` targets (0 for all)
    pub limit:   usize,
    /// Override the suite's job count
    pub jobs:    Option<usize>,
    /// Report what would run without exploring
    pub dry_run: bool,
}

/// Result of one suite invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    /// Suite name
    pub suite:        String,
    /// Identifier shared by every record of this run
    pub run_id:       String,
    /// No target was explored
    pub dry_run:      bool,
    /// Selected targets, in order
    pub planned:      Vec<String>,
    /// One record per explored target
    pub records:      Vec<MetricsRecord>,
    /// Targets that could not be run at all
    pub errors:       Vec<String>,
    /// Metrics file the records were appended to
    pub metrics_path: Option<PathBuf>,
}

impl SuiteResult {
    /// Every target ran and matched its expectation
    pub fn all_expectations_met(&self) -> bool {
        self.errors.is_empty() && self.records.iter().all(|record| record.success)
    }

    /// Records whose outcome did not match the expectation
    pub fn unexpected(&self) -> impl Iterator<Item = &MetricsRecord> {
        self.records.iter().filter(|record| !record.success)
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.records)
    }
}

/// Runs harness suites against a fixed set of harnesses
#[derive(Debug)]
pub struct SuiteRunner {
    registry: HarnessRegistry,
}

impl SuiteRunner {
    /// Create a runner for the harnesses in `registry`
    pub fn new(registry: HarnessRegistry) -> Self {
        Self { registry }
    }

    /// Harnesses available to suites
    pub fn registry(&self) -> &HarnessRegistry {
        &self.registry
    }

    /// Run `config`; target failures are recorded, not propagated
    pub fn run(&self, config: &SuiteConfig, options: &RunOptions) -> BuildResult<SuiteResult> {
        config.validate(&self.registry)?;

        let selected: Vec<&TargetConfig> = if options.limit == 0 {
            config.targets.iter().collect()
        } else {
            config.targets.iter().take(options.limit).collect()
        };
        let run_id = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let planned = selected.iter().map(|target| target.function.clone()).collect();

        if options.dry_run {
            for target in &selected {
                info!(
                    function = %target.function,
                    harness = %target.harness_name(),
                    expect = %target.expect,
                    "would verify"
                );
            }
            return Ok(SuiteResult {
                suite: config.suite.name.clone(),
                run_id,
                dry_run: true,
                planned,
                records: Vec::new(),
                errors: Vec::new(),
                metrics_path: None,
            });
        }

        let logs_dir = config.logs_dir();
        std::fs::create_dir_all(&logs_dir)?;

        let jobs = match options.jobs.unwrap_or(config.suite.jobs) {
            0 => num_cpus::get(),
            jobs => jobs,
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| BuildError::Pool(e.to_string()))?;
        let explorer = Explorer::new(config.exploration.to_config());

        info!(suite = %config.suite.name, targets = selected.len(), jobs, "running suite");
        let outcomes: Vec<BuildResult<MetricsRecord>> = pool.install(|| {
            selected
                .par_iter()
                .map(|target| self.run_target(target, &explorer, &logs_dir, &run_id))
                .collect()
        });

        let mut records = Vec::new();
        let mut errors = Vec::new();
        for (target, outcome) in selected.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(function = %target.function, error = %e, "target did not run");
                    errors.push(format!("{}: {}", target.function, e));
                },
            }
        }

        let metrics_path = config.metrics_path();
        append_metrics_jsonl(&metrics_path, &records)?;

        Ok(SuiteResult {
            suite: config.suite.name.clone(),
            run_id,
            dry_run: false,
            planned,
            records,
            errors,
            metrics_path: Some(metrics_path),
        })
    }

    fn run_target(
        &self,
        target: &TargetConfig,
        explorer: &Explorer,
        logs_dir: &Path,
        run_id: &str,
    ) -> BuildResult<MetricsRecord> {
        let harness = self.registry.require(target.harness_name())?;

        debug!(function = %target.function, harness = harness.name(), "exploring");
        let report = explorer.explore(harness);

        let log_path = logs_dir.join(format!("{}.log", target.function));
        let written = match std::fs::write(&log_path, render_log(target, harness, &report, run_id)) {
            Ok(()) => Some(log_path.as_path()),
            Err(e) => {
                warn!(path = %log_path.display(), error = %e, "could not write target log");
                None
            },
        };

        let record = MetricsRecord::from_report(&target.function, &report, target.expect, run_id, written);
        info!(
            function = %target.function,
            outcome = %record.outcome,
            success = record.success,
            paths = record.paths_explored,
            "target finished"
        );
        Ok(record)
    }
}

/// Text written to a target's log file
fn render_log(target: &TargetConfig, harness: &dyn Harness, report: &ProofReport, run_id: &str) -> String {
    let mut log = String::new();
    log.push_str(&format!("run: {}\n", run_id));
    log.push_str(&format!("function: {}\n", target.function));
    log.push_str(&format!("harness: {}\n", harness.name()));
    if !harness.description().is_empty() {
        log.push_str(&format!("description: {}\n", harness.description()));
    }
    log.push_str(&format!("expect: {}\n", target.expect));
    log.push_str(&format!("unwind: {}\n", report.unwind));
    for stub in report.stubs.iter() {
        log.push_str(&format!("stub {} -> {}\n", stub.signature, stub.returns));
    }
    if !report.sampled_points.is_empty() {
        log.push_str(&format!("sampled: {}\n", report.sampled_points.join(", ")));
    }
    if let Some(error) = report.error() {
        log.push_str(&format!("error: {}\n", error));
    }
    log.push('\n');
    log.push_str(&report.to_string());
    log
}
