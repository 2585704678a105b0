//! Suite configuration for the UPROOF runner
//!
//! A suite is described by a TOML file naming the targets to verify, the
//! exploration limits and where logs and metrics go.

use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use uproof_foundation::{
    ExplorationConfig,
    HarnessRegistry,
};

use crate::error::{
    BuildError,
    BuildResult,
};

/// Complete suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite-wide settings
    pub suite:       SuiteSection,
    /// Exploration limits shared by every target
    #[serde(default)]
    pub exploration: ExplorationSection,
    /// Targets to verify, in order
    #[serde(default)]
    pub targets:     Vec<TargetConfig>,
}

/// `[suite]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSection {
    /// Suite name, used in reports
    pub name:       String,
    /// Directory receiving `logs/` and `metrics.jsonl`
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Parallel jobs (0 for one per CPU)
    #[serde(default = "default_jobs")]
    pub jobs:       usize,
}

/// `[exploration]` table; absent keys take the explorer defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorationSection {
    /// Harness runs per target
    pub max_paths:           Option<usize>,
    /// Choice points per run
    pub max_depth:           Option<usize>,
    /// Loop bound for shapes and traversals
    pub unwind:              Option<usize>,
    /// Distinct counterexamples kept per target
    pub max_counterexamples: Option<usize>,
}

impl ExplorationSection {
    /// Resolve into explorer limits
    pub fn to_config(&self) -> ExplorationConfig {
        let defaults = ExplorationConfig::default();
        ExplorationConfig {
            max_paths:           self.max_paths.unwrap_or(defaults.max_paths),
            max_depth:           self.max_depth.unwrap_or(defaults.max_depth),
            unwind:              self.unwind.unwrap_or(defaults.unwind),
            max_counterexamples: self.max_counterexamples.unwrap_or(defaults.max_counterexamples),
        }
    }
}

/// Expected outcome of a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    /// The proof must verify
    #[default]
    Pass,
    /// The proof must fail with at least one counterexample
    Fail,
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expectation::Pass => write!(f, "pass"),
            Expectation::Fail => write!(f, "fail"),
        }
    }
}

/// One `[[targets]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Target name; also the log file name
    pub function: String,
    /// Harness to run, defaults to `function`
    #[serde(default)]
    pub harness:  Option<String>,
    /// Expected outcome
    #[serde(default)]
    pub expect:   Expectation,
}

impl TargetConfig {
    /// Target expected to verify, checked by the harness of the same name
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            harness:  None,
            expect:   Expectation::Pass,
        }
    }

    /// Name of the harness that checks this target
    pub fn harness_name(&self) -> &str {
        self.harness.as_deref().unwrap_or(&self.function)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("proofs")
}

fn default_jobs() -> usize {
    1
}

impl SuiteConfig {
    /// Parse a suite from TOML text
    pub fn from_toml(text: &str) -> BuildResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a suite file; a relative `output_dir` is resolved against the
    /// directory containing the file
    pub fn load(path: &Path) -> BuildResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&text)?;
        if config.suite.output_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.suite.output_dir = parent.join(&config.suite.output_dir);
            }
        }
        Ok(config)
    }

    /// Check the suite against the harnesses that are available
    pub fn validate(&self, registry: &HarnessRegistry) -> BuildResult<()> {
        if self.suite.name.trim().is_empty() {
            return Err(BuildError::Config("suite name must not be empty".to_string()));
        }
        if self.targets.is_empty() {
            return Err(BuildError::Config("suite has no targets".to_string()));
        }
        self.exploration.to_config().validate()?;

        let mut seen = std::collections::BTreeSet::new();
        for target in &self.targets {
            if !seen.insert(target.function.as_str()) {
                return Err(BuildError::Config(format!(
                    "target '{}' is listed twice",
                    target.function
                )));
            }
            if registry.get(target.harness_name()).is_none() {
                return Err(BuildError::Config(format!(
                    "no harness named '{}' (available: {})",
                    target.harness_name(),
                    registry.names().join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Directory of per-target logs
    pub fn logs_dir(&self) -> PathBuf {
        self.suite.output_dir.join("logs")
    }

    /// Metrics file appended to by every run
    pub fn metrics_path(&self) -> PathBuf {
        self.suite.output_dir.join("metrics.jsonl")
    }
}

#[cfg(test)]
mod tests {
    use uproof_foundation::{
        Halt,
        Harness,
        ProofContext,
    };

    use super::*;

    struct Named(&'static str);

    impl Harness for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn target(&self) -> &'static str {
            self.0
        }

        fn coverage_points(&self) -> &'static [&'static str] {
            &[]
        }

        fn run(&self, _cx: &mut ProofContext<'_>) -> Result<(), Halt> {
            Ok(())
        }
    }

    const SUITE: &str = r#"
[suite]
name = "riot"
jobs = 2

[exploration]
unwind = 3

[[targets]]
function = "event_timeout_set"

[[targets]]
function = "usbus_register_event_handler_twice"
expect = "fail"
"#;

    fn registry() -> HarnessRegistry {
        HarnessRegistry::new()
            .with(Named("event_timeout_set"))
            .with(Named("usbus_register_event_handler_twice"))
    }

    #[test]
    fn test_parse_suite() {
        let config = SuiteConfig::from_toml(SUITE).unwrap();
        assert_eq!(config.suite.jobs, 2);
        assert_eq!(config.suite.output_dir, PathBuf::from("proofs"));
        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[1].expect, Expectation::Fail);
        assert_eq!(config.targets[0].harness_name(), "event_timeout_set");

        let exploration = config.exploration.to_config();
        assert_eq!(exploration.unwind, 3);
        assert_eq!(exploration.max_paths, ExplorationConfig::default().max_paths);
        assert!(config.validate(&registry()).is_ok());
    }

    #[test]
    fn test_unknown_harness_rejected() {
        let mut config = SuiteConfig::from_toml(SUITE).unwrap();
        config.targets.push(TargetConfig::new("ztimer_set"));
        let error = config.validate(&registry()).unwrap_err();
        assert!(error.to_string().contains("ztimer_set"));
    }

    #[test]
    fn test_empty_and_duplicate_targets_rejected() {
        let mut config = SuiteConfig::from_toml(SUITE).unwrap();
        config.targets.push(TargetConfig::new("event_timeout_set"));
        assert!(config.validate(&registry()).is_err());

        config.targets.clear();
        assert!(config.validate(&registry()).is_err());
    }

    #[test]
    fn test_zero_unwind_rejected() {
        let mut config = SuiteConfig::from_toml(SUITE).unwrap();
        config.exploration.unwind = Some(0);
        assert!(matches!(
            config.validate(&registry()),
            Err(BuildError::Foundation(_))
        ));
    }
}
