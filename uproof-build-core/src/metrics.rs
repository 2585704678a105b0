//! Per-target metrics records
//!
//! Every verified target produces one [`MetricsRecord`]. Records are appended
//! to a JSON Lines file so that several runs accumulate in one place, and can
//! be exported as CSV.

use std::{
    fs::{
        self,
        OpenOptions,
    },
    io::{
        BufRead,
        BufReader,
        Write,
    },
    path::Path,
};

use serde::{
    Deserialize,
    Serialize,
};
use uproof_foundation::{
    ProofOutcome,
    ProofReport,
};

use crate::{
    config::Expectation,
    error::BuildResult,
};

/// Coverage of a target's coverage points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetrics {
    /// Points reached on at least one path
    pub hit:        usize,
    /// Points the harness declares
    pub total:      usize,
    /// `hit / total` as a fraction in `0.0..=1.0`
    pub percentage: f64,
    /// Points never reached
    #[serde(default)]
    pub missed:     Vec<String>,
}

/// Violations found for a target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMetrics {
    /// Distinct counterexamples
    pub error_count: usize,
    /// One line per counterexample
    #[serde(default)]
    pub violations:  Vec<String>,
}

/// Metrics for one target of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Target name from the suite
    pub function:            String,
    /// Harness that checked it
    pub harness:             String,
    /// Identifier shared by every record of one suite run
    pub run_id:              String,
    /// Proof outcome
    pub outcome:             String,
    /// Expected outcome
    pub expect:              Expectation,
    /// Outcome matches the expectation
    pub success:             bool,
    /// Code of the error behind a non-verified outcome
    #[serde(default)]
    pub error_code:          Option<u16>,
    /// Wall-clock exploration time
    pub duration_sec:        f64,
    /// Harness runs
    pub paths_explored:      usize,
    /// Runs stopped by a failed assumption
    pub paths_pruned:        usize,
    /// Most choice points on one path
    pub max_depth:           usize,
    /// Coverage of the target model
    pub coverage:            CoverageMetrics,
    /// Violations found
    pub verification:        VerificationMetrics,
    /// Assumptions recorded by the harness
    pub preconditions:       usize,
    /// Restrictions placed on values that had to stay free
    pub coverage_reductions: usize,
    /// Stubs the harness installs
    pub stub_count:          usize,
    /// Stub calls across all paths
    pub stub_calls:          usize,
    /// Choice points that were sampled rather than enumerated
    #[serde(default)]
    pub sampled_points:      Vec<String>,
    /// Loop bound used
    pub unwind:              usize,
    /// Per-target log file
    #[serde(default)]
    pub log_path:            Option<String>,
}

impl MetricsRecord {
    /// Build the record for `report`
    pub fn from_report(
        function: &str,
        report: &ProofReport,
        expect: Expectation,
        run_id: &str,
        log_path: Option<&Path>,
    ) -> Self {
        Self {
            function:            function.to_string(),
            harness:             report.harness.to_string(),
            run_id:              run_id.to_string(),
            outcome:             report.outcome.to_string(),
            expect,
            success:             expectation_met(report.outcome, expect),
            error_code:          report.error().map(|error| error.code),
            duration_sec:        report.duration.as_secs_f64(),
            paths_explored:      report.stats.paths_explored,
            paths_pruned:        report.stats.paths_pruned,
            max_depth:           report.stats.max_depth_seen,
            coverage:            CoverageMetrics {
                hit:        report.coverage.hit.len(),
                total:      report.coverage.total(),
                percentage: report.coverage.percentage() / 100.0,
                missed:     report.coverage.missed.iter().map(|point| point.to_string()).collect(),
            },
            verification:        VerificationMetrics {
                error_count: report.error_count(),
                violations:  report
                    .counterexamples
                    .iter()
                    .map(|counterexample| counterexample.violation.to_string())
                    .collect(),
            },
            preconditions:       report.precondition_count(),
            coverage_reductions: report.coverage_reductions.len(),
            stub_count:          report.stubs.len(),
            stub_calls:          report.stub_calls,
            sampled_points:      report.sampled_points.clone(),
            unwind:              report.unwind,
            log_path:            log_path.map(|path| path.display().to_string()),
        }
    }

    /// Outcome string equals `verified`
    pub fn is_verified(&self) -> bool {
        self.outcome == ProofOutcome::Verified.as_str()
    }
}

/// Whether `outcome` is what the suite expects
pub fn expectation_met(outcome: ProofOutcome, expect: Expectation) -> bool {
    match expect {
        Expectation::Pass => outcome == ProofOutcome::Verified,
        Expectation::Fail => outcome == ProofOutcome::Failed,
    }
}

/// Append `records` to a JSON Lines file, creating it if needed
pub fn append_metrics_jsonl(path: &Path, records: &[MetricsRecord]) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for record in records {
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

/// Load every well-formed record; blank and malformed lines are skipped
pub fn load_metrics_jsonl(path: &Path) -> BuildResult<Vec<MetricsRecord>> {
    let file = fs::File::open(path)?;
    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!(error = %e, "skipping malformed metrics line"),
        }
    }
    Ok(records)
}

/// CSV columns, in order
pub const CSV_COLUMNS: [&str; 16] = [
    "function",
    "harness",
    "run_id",
    "outcome",
    "expect",
    "success",
    "duration_sec",
    "paths_explored",
    "paths_pruned",
    "max_depth",
    "coverage_hit",
    "coverage_total",
    "coverage_percentage",
    "verification_error_count",
    "preconditions",
    "log_path",
];

/// Write `records` as CSV with the [`CSV_COLUMNS`] header
pub fn write_metrics_csv(records: &[MetricsRecord], path: &Path) -> BuildResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = String::new();
    out.push_str(&CSV_COLUMNS.join(","));
    out.push('\n');
    for record in records {
        let row = [
            csv_field(&record.function),
            csv_field(&record.harness),
            csv_field(&record.run_id),
            csv_field(&record.outcome),
            record.expect.to_string(),
            record.success.to_string(),
            format!("{:.6}", record.duration_sec),
            record.paths_explored.to_string(),
            record.paths_pruned.to_string(),
            record.max_depth.to_string(),
            record.coverage.hit.to_string(),
            record.coverage.total.to_string(),
            format!("{:.4}", record.coverage.percentage),
            record.verification.error_count.to_string(),
            record.preconditions.to_string(),
            record.log_path.as_deref().map(csv_field).unwrap_or_default(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Quote a field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(function: &str, outcome: ProofOutcome, expect: Expectation) -> MetricsRecord {
        MetricsRecord {
            function:            function.to_string(),
            harness:             function.to_string(),
            run_id:              "run".to_string(),
            outcome:             outcome.to_string(),
            expect,
            success:             expectation_met(outcome, expect),
            error_code:          None,
            duration_sec:        0.5,
            paths_explored:      10,
            paths_pruned:        2,
            max_depth:           5,
            coverage:            CoverageMetrics {
                hit:        1,
                total:      1,
                percentage: 1.0,
                missed:     Vec::new(),
            },
            verification:        VerificationMetrics::default(),
            preconditions:       2,
            coverage_reductions: 0,
            stub_count:          3,
            stub_calls:          10,
            sampled_points:      Vec::new(),
            unwind:              2,
            log_path:            None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::record, *};

    #[test]
    fn test_expectation_met() {
        assert!(expectation_met(ProofOutcome::Verified, Expectation::Pass));
        assert!(expectation_met(ProofOutcome::Failed, Expectation::Fail));
        assert!(!expectation_met(ProofOutcome::Inconclusive, Expectation::Pass));
        assert!(!expectation_met(ProofOutcome::Vacuous, Expectation::Fail));
        assert!(!expectation_met(ProofOutcome::Error, Expectation::Pass));
        assert!(!expectation_met(ProofOutcome::Error, Expectation::Fail));
    }

    #[test]
    fn test_jsonl_round_trip_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("metrics.jsonl");
        let records = vec![
            record("a", ProofOutcome::Verified, Expectation::Pass),
            record("b", ProofOutcome::Failed, Expectation::Fail),
        ];
        append_metrics_jsonl(&path, &records[..1]).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .and_then(|mut file| writeln!(file, "{{not json\n"))
            .unwrap();
        append_metrics_jsonl(&path, &records[1..]).unwrap();

        let loaded = load_metrics_jsonl(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_csv_header_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let mut quoted = record("a,b", ProofOutcome::Verified, Expectation::Pass);
        quoted.log_path = Some("logs/a.log".to_string());
        write_metrics_csv(&[quoted], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_COLUMNS.join(",").as_str()));
        let row = lines.next().unwrap();
        assert!(row.starts_with("\"a,b\","));
        assert!(row.ends_with("logs/a.log"));
    }
}
