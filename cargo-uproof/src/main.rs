//! cargo-uproof - Command-line front end for UPROOF harness suites
//!
//! Runs a suite described by a TOML file, lists the available harnesses and
//! summarizes accumulated metrics. Usable directly (`cargo-uproof`) or as a
//! Cargo subcommand (`cargo uproof`).

use std::{
    path::PathBuf,
    process,
};

use anyhow::{
    anyhow,
    bail,
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use colored::Colorize;
use tracing::{
    debug,
    Level,
};
use uproof_build_core::{
    formatters::{
        format_harnesses,
        format_suite,
        format_summary,
        OutputFormat,
    },
    metrics::{
        load_metrics_jsonl,
        write_metrics_csv,
    },
    summary::{
        default_summary_path,
        summarize,
        write_summary_json,
    },
    RunOptions,
    SuiteConfig,
    SuiteRunner,
};
use uproof_foundation::HarnessRegistry;

/// UPROOF - bounded proof harnesses for embedded C targets
#[derive(Parser)]
#[command(name = "cargo-uproof")]
#[command(
    version,
    about = "Run proof harness suites and report their metrics",
    long_about = "
Run proof harness suites and report their metrics

Usage:
  cargo-uproof <COMMAND>           # Direct usage
  cargo uproof <COMMAND>           # As Cargo subcommand

Examples:
  cargo-uproof list
  cargo-uproof run --config uproof.toml
  cargo-uproof run --config uproof.toml --limit 2 --dry-run
  cargo-uproof --output json run --config uproof.toml
  cargo-uproof summarize proofs/metrics.jsonl --csv proofs/metrics.csv

Logging:
  RUST_LOG           filter directives (default: info, debug with --verbose)
  RUST_LOG_FORMAT    pretty | compact | json
"
)]
#[command(author = "UPROOF Team")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value = "human")]
    output: OutputFormatArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the targets of a suite
    Run {
        /// Suite file
        #[arg(long, short, default_value = "uproof.toml")]
        config: PathBuf,

        /// Run only the first N targets
        #[arg(long)]
        limit: Option<usize>,

        /// Parallel jobs (0 for one per CPU), overrides the suite
        #[arg(long, short)]
        jobs: Option<usize>,

        /// Show the targets that would run without exploring them
        #[arg(long)]
        dry_run: bool,
    },

    /// List the available harnesses
    List,

    /// Summarize a metrics file
    Summarize {
        /// Metrics file (JSON Lines)
        metrics: PathBuf,

        /// Summary output, defaults to a summary file next to the metrics
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also export the records as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Available output formats
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OutputFormatArg {
    /// Human-readable format with colors (default)
    Human,
    /// JSON format for tooling integration
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(format: OutputFormatArg) -> Self {
        match format {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Parse arguments, dropping the extra `uproof` argument Cargo passes
fn parse_args() -> Cli {
    let mut args: Vec<String> = std::env::args().collect();
    if args.get(1).is_some_and(|arg| arg == "uproof") {
        args.remove(1);
    }
    Cli::parse_from(args)
}

/// Install the tracing subscriber; logs go to stderr so stdout carries only
/// results
fn init_tracing(verbose: bool, output: OutputFormat) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match (output, verbose) {
        (OutputFormat::Json, false) => Level::ERROR,
        (_, true) => Level::DEBUG,
        (OutputFormat::Human, false) => Level::INFO,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let result = match std::env::var("RUST_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        Ok("pretty") => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };
    result.map_err(|e| anyhow!("Failed to set tracing subscriber: {}", e))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    let output: OutputFormat = cli.output.into();
    init_tracing(cli.verbose, output)?;

    if cli.verbose && output == OutputFormat::Human {
        println!(
            "{} cargo-uproof v{} ({})",
            "🚀".bright_blue(),
            env!("CARGO_PKG_VERSION"),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        println!();
    }

    let result = match cli.command {
        Commands::Run {
            config,
            limit,
            jobs,
            dry_run,
        } => {
            let options = RunOptions {
                limit: limit.unwrap_or(0),
                jobs,
                dry_run,
            };
            cmd_run(config, options, output).await
        },
        Commands::List => cmd_list(&uproof_riot::registry(), output),
        Commands::Summarize { metrics, out, csv } => cmd_summarize(metrics, out, csv, output),
    };

    match result {
        Ok(()) => {
            if cli.verbose && output == OutputFormat::Human {
                println!("{} Command completed successfully", "✅".bright_green());
            }
            Ok(())
        },
        Err(e) => {
            eprintln!("{} {:#}", "❌".bright_red(), e);
            process::exit(1);
        },
    }
}

/// Run command implementation
async fn cmd_run(config_path: PathBuf, options: RunOptions, output: OutputFormat) -> Result<()> {
    let config = SuiteConfig::load(&config_path)
        .with_context(|| format!("Failed to load suite {}", config_path.display()))?;
    debug!(suite = %config.suite.name, targets = config.targets.len(), "loaded suite");

    // exploration is CPU bound and runs on its own pool
    let result = tokio::task::spawn_blocking(move || {
        SuiteRunner::new(uproof_riot::registry()).run(&config, &options)
    })
    .await
    .context("Suite runner task failed")??;

    println!("{}", format_suite(&result, output)?);

    if !result.all_expectations_met() {
        bail!("Suite {} did not meet its expectations", result.suite);
    }
    Ok(())
}

/// List command implementation
fn cmd_list(registry: &HarnessRegistry, output: OutputFormat) -> Result<()> {
    print!("{}", format_harnesses(registry, output)?);
    Ok(())
}

/// Summarize command implementation
fn cmd_summarize(
    metrics: PathBuf,
    out: Option<PathBuf>,
    csv: Option<PathBuf>,
    output: OutputFormat,
) -> Result<()> {
    let records = load_metrics_jsonl(&metrics)
        .with_context(|| format!("Failed to read metrics {}", metrics.display()))?;
    if records.is_empty() {
        bail!("No metrics records in {}", metrics.display());
    }

    let summary = summarize(&records);
    let summary_path = out.unwrap_or_else(|| default_summary_path(&metrics));
    write_summary_json(&summary, &summary_path)?;
    debug!(path = %summary_path.display(), "wrote summary");

    if let Some(csv) = csv {
        write_metrics_csv(&records, &csv)?;
        debug!(path = %csv.display(), "wrote csv");
    }

    println!("{}", format_summary(&summary, output)?);
    Ok(())
}
