//! UPROOF Build Core - suite runner for proof harnesses
//!
//! This library runs a suite of harnesses described by a TOML file and keeps
//! the results around: one log per target, one metrics record per target and
//! run, and summaries over any number of runs.
//!
//! # Architecture
//!
//! - **Configuration**: [`SuiteConfig`] names the targets, their expected
//!   outcome and the exploration limits
//! - **Runner**: [`SuiteRunner`] explores targets in parallel on a bounded
//!   worker pool
//! - **Metrics**: [`MetricsRecord`] rows appended to `metrics.jsonl`,
//!   exportable as CSV
//! - **Summaries**: suite-level rates over a metrics file
//!
//! # Example
//!
//! ```no_run
//! use uproof_build_core::{RunOptions, SuiteConfig, SuiteRunner};
//!
//! let config = SuiteConfig::load("uproof.toml".as_ref())?;
//! let runner = SuiteRunner::new(uproof_riot::registry());
//! let result = runner.run(&config, &RunOptions::default())?;
//! assert!(result.all_expectations_met());
//! # Ok::<(), uproof_build_core::BuildError>(())
//! ```

#![forbid(unsafe_code)]
// Lints configured in Cargo.toml

pub use std::path::{Path, PathBuf};

pub use anyhow::{Context, Result};

// Core modules
pub mod config;
pub mod error;
pub mod formatters;
pub mod metrics;
pub mod runner;
pub mod summary;

// Public API
pub use config::{Expectation, ExplorationSection, SuiteConfig, SuiteSection, TargetConfig};
pub use error::{BuildError, BuildResult};
pub use formatters::OutputFormat;
pub use metrics::MetricsRecord;
pub use runner::{RunOptions, SuiteResult, SuiteRunner};
pub use summary::Summary;

/// Build core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
