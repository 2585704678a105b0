//! Human and JSON rendering of suite results

use colored::Colorize;
use serde::{
    Deserialize,
    Serialize,
};
use uproof_foundation::HarnessRegistry;

use crate::{
    error::BuildResult,
    metrics::MetricsRecord,
    runner::SuiteResult,
    summary::Summary,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable format with colors
    #[default]
    Human,
    /// Pretty-printed JSON for tooling
    Json,
}

/// Render a suite run
pub fn format_suite(result: &SuiteResult, format: OutputFormat) -> BuildResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Human => Ok(human_suite(result)),
    }
}

/// Render a summary
pub fn format_summary(summary: &Summary, format: OutputFormat) -> BuildResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
        OutputFormat::Human => Ok(human_summary(summary)),
    }
}

/// Render the available harnesses
pub fn format_harnesses(registry: &HarnessRegistry, format: OutputFormat) -> BuildResult<String> {
    match format {
        OutputFormat::Json => {
            let harnesses: Vec<serde_json::Value> = registry
                .iter()
                .map(|harness| {
                    serde_json::json!({
                        "name": harness.name(),
                        "target": harness.target(),
                        "description": harness.description(),
                        "stubs": harness.stubs().names(),
                        "coverage_points": harness.coverage_points(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&harnesses)?)
        },
        OutputFormat::Human => {
            let mut out = String::new();
            for harness in registry.iter() {
                out.push_str(&format!("{} -> {}\n", harness.name().bright_cyan(), harness.target()));
                if !harness.description().is_empty() {
                    out.push_str(&format!("  {}\n", harness.description()));
                }
                let stubs = harness.stubs();
                if !stubs.is_empty() {
                    out.push_str(&format!("  stubs: {}\n", stubs.names().join(", ")));
                }
                out.push_str(&format!("  coverage: {}\n", harness.coverage_points().join(", ")));
            }
            Ok(out)
        },
    }
}

fn human_suite(result: &SuiteResult) -> String {
    let mut out = String::new();
    if result.dry_run {
        out.push_str(&format!(
            "{} Dry run of suite {}: {} targets\n",
            "📋".bright_cyan(),
            result.suite.bright_cyan(),
            result.planned.len()
        ));
        for function in &result.planned {
            out.push_str(&format!("  {}\n", function));
        }
        return out;
    }

    out.push_str(&format!(
        "{} Suite {} (run {})\n",
        "🛡️".bright_blue(),
        result.suite.bright_cyan(),
        result.run_id
    ));
    for record in &result.records {
        out.push_str(&human_record(record));
    }
    for error in &result.errors {
        out.push_str(&format!("{} {}\n", "❌".bright_red(), error));
    }
    out.push('\n');
    out.push_str(&human_summary(&result.summary()));

    let unexpected = result.unexpected().count() + result.errors.len();
    if unexpected == 0 {
        out.push_str(&format!("{} All expectations met\n", "✅".bright_green()));
    } else {
        out.push_str(&format!(
            "{} {} target(s) did not meet expectations\n",
            "❌".bright_red(),
            unexpected
        ));
    }
    if let Some(path) = &result.metrics_path {
        out.push_str(&format!("Metrics appended to {}\n", path.display()));
    }
    out
}

fn human_record(record: &MetricsRecord) -> String {
    let marker = if record.success {
        "✅".bright_green()
    } else {
        "❌".bright_red()
    };
    let outcome = match record.outcome.as_str() {
        "verified" => record.outcome.green(),
        "failed" | "error" => record.outcome.red(),
        _ => record.outcome.yellow(),
    };
    let mut line = format!(
        "{} {} {} (expect {}) paths {} coverage {}/{} {:.3}s\n",
        marker,
        record.function,
        outcome,
        record.expect,
        record.paths_explored,
        record.coverage.hit,
        record.coverage.total,
        record.duration_sec
    );
    for violation in &record.verification.violations {
        line.push_str(&format!("    {}\n", violation));
    }
    if !record.coverage.missed.is_empty() {
        line.push_str(&format!(
            "    {} missed: {}\n",
            "⚠️".bright_yellow(),
            record.coverage.missed.join(", ")
        ));
    }
    line
}

fn human_summary(summary: &Summary) -> String {
    let percent = |rate: f64| format!("{:.1}%", rate * 100.0);
    let mut out = String::new();
    out.push_str(&format!("{} Summary of {} targets\n", "📊".bright_blue(), summary.targets_total));
    out.push_str(&format!("  verified:           {}\n", percent(summary.verified_rate)));
    out.push_str(&format!("  expectation met:    {}\n", percent(summary.expectation_met_rate)));
    out.push_str(&format!("  coverage >= 90%:    {}\n", percent(summary.coverage_over_90_rate)));
    out.push_str(&format!("  zero errors:        {}\n", percent(summary.zero_errors_rate)));
    out.push_str(&format!("  avg duration:       {:.3}s\n", summary.avg_duration_sec));
    if summary.coverage_reductions > 0 {
        out.push_str(&format!(
            "  {} coverage reductions: {}\n",
            "⚠️".bright_yellow(),
            summary.coverage_reductions
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use uproof_foundation::ProofOutcome;

    use super::*;
    use crate::{
        config::Expectation,
        metrics::fixtures::record,
        summary::summarize,
    };

    fn result() -> SuiteResult {
        SuiteResult {
            suite:        "riot".to_string(),
            run_id:       "run".to_string(),
            dry_run:      false,
            planned:      vec!["a".to_string(), "b".to_string()],
            records:      vec![
                record("a", ProofOutcome::Verified, Expectation::Pass),
                record("b", ProofOutcome::Failed, Expectation::Pass),
            ],
            errors:       Vec::new(),
            metrics_path: None,
        }
    }

    #[test]
    fn test_json_suite_is_parseable() {
        let text = format_suite(&result(), OutputFormat::Json).unwrap();
        let parsed: SuiteResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.suite, "riot");
    }

    #[test]
    fn test_human_suite_lists_targets() {
        colored::control::set_override(false);
        let text = format_suite(&result(), OutputFormat::Human).unwrap();
        assert!(text.contains("a verified (expect pass)"));
        assert!(text.contains("b failed (expect pass)"));
        assert!(text.contains("1 target(s) did not meet expectations"));
    }

    #[test]
    fn test_summary_formats() {
        colored::control::set_override(false);
        let summary = summarize(&result().records);
        let human = format_summary(&summary, OutputFormat::Human).unwrap();
        assert!(human.contains("verified:           50.0%"));
        let json = format_summary(&summary, OutputFormat::Json).unwrap();
        assert!(json.contains("\"verified_rate\": 0.5"));
    }
}
