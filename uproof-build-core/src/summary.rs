//! Aggregate statistics over metrics records

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    error::BuildResult,
    metrics::MetricsRecord,
};

/// Coverage fraction from which a target counts as well covered
pub const COVERAGE_THRESHOLD: f64 = 0.9;

/// Suite-level rates; every rate is a fraction of `targets_total`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Records summarized
    pub targets_total:         usize,
    /// Targets whose proof verified
    pub verified_rate:         f64,
    /// Targets whose outcome matched the expectation
    pub expectation_met_rate:  f64,
    /// Targets reaching at least [`COVERAGE_THRESHOLD`] coverage
    pub coverage_over_90_rate: f64,
    /// Targets without any counterexample
    pub zero_errors_rate:      f64,
    /// Mean exploration time
    pub avg_duration_sec:      f64,
    /// Coverage reductions across all targets
    pub coverage_reductions:   usize,
}

/// Summarize `records`; an empty slice gives an all-zero summary
pub fn summarize(records: &[MetricsRecord]) -> Summary {
    if records.is_empty() {
        return Summary::default();
    }
    let total = records.len() as f64;
    let rate = |predicate: &dyn Fn(&MetricsRecord) -> bool| {
        records.iter().filter(|record| predicate(record)).count() as f64 / total
    };
    Summary {
        targets_total:         records.len(),
        verified_rate:         rate(&|record| record.is_verified()),
        expectation_met_rate:  rate(&|record| record.success),
        coverage_over_90_rate: rate(&|record| record.coverage.percentage >= COVERAGE_THRESHOLD),
        zero_errors_rate:      rate(&|record| record.verification.error_count == 0),
        avg_duration_sec:      records.iter().map(|record| record.duration_sec).sum::<f64>() / total,
        coverage_reductions:   records.iter().map(|record| record.coverage_reductions).sum(),
    }
}

/// Write `summary` as pretty-printed JSON
pub fn write_summary_json(summary: &Summary, path: &Path) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(summary)?;
    text.push('\n');
    std::fs::write(path, text)?;
    Ok(())
}

/// Default summary path next to a metrics file: `metrics.jsonl` becomes
/// `summary.json`, any other stem gets a `_summary` suffix
pub fn default_summary_path(metrics: &Path) -> std::path::PathBuf {
    let stem = metrics.file_stem().and_then(|stem| stem.to_str()).unwrap_or("metrics");
    let summary_stem = if stem.contains("metrics") {
        stem.replacen("metrics", "summary", 1)
    } else {
        format!("{}_summary", stem)
    };
    metrics.with_file_name(format!("{}.json", summary_stem))
}

#[cfg(test)]
mod tests {
    use uproof_foundation::ProofOutcome;

    use super::*;
    use crate::{
        config::Expectation,
        metrics::fixtures::record,
    };

    #[test]
    fn test_empty_summary() {
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn test_rates() {
        let mut failed = record("b", ProofOutcome::Failed, Expectation::Fail);
        failed.verification.error_count = 1;
        failed.coverage.percentage = 0.5;
        failed.duration_sec = 1.5;
        let mut missed = record("c", ProofOutcome::Inconclusive, Expectation::Pass);
        missed.coverage_reductions = 1;
        let records = vec![
            record("a", ProofOutcome::Verified, Expectation::Pass),
            failed,
            missed,
            record("d", ProofOutcome::Verified, Expectation::Pass),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.targets_total, 4);
        assert_eq!(summary.verified_rate, 0.5);
        assert_eq!(summary.expectation_met_rate, 0.75);
        assert_eq!(summary.coverage_over_90_rate, 0.75);
        assert_eq!(summary.zero_errors_rate, 0.75);
        assert_eq!(summary.avg_duration_sec, 0.75);
        assert_eq!(summary.coverage_reductions, 1);
    }

    #[test]
    fn test_default_summary_path() {
        assert_eq!(
            default_summary_path(Path::new("out/metrics.jsonl")),
            Path::new("out/summary.json")
        );
        assert_eq!(
            default_summary_path(Path::new("out/run.jsonl")),
            Path::new("out/run_summary.json")
        );
    }

    #[test]
    fn test_write_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let summary = summarize(&[record("a", ProofOutcome::Verified, Expectation::Pass)]);
        write_summary_json(&summary, &path).unwrap();
        let loaded: Summary = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, summary);
    }
}
