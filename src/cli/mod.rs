//! CLI command definitions and handlers

mod history;
mod init;
mod insights;
mod profile;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dataprobe::ai::LlmBackend;
use dataprobe::config::UserConfig;
use dataprobe::models::{Issue, Severity};
use dataprobe::reporters::OutputFormat;
use std::path::{Path, PathBuf};

/// Dataprobe - data quality profiling for ML datasets
///
/// Runs locally. Data only leaves your machine when you ask for AI insights.
#[derive(Parser, Debug)]
#[command(name = "dataprobe")]
#[command(
    version,
    about = "Data quality profiling for ML datasets: missing data, duplicates, column types and a 0-100 quality score",
    long_about = "Dataprobe profiles delimited datasets (CSV, TSV) before they go into \
model training. It measures missing cells, duplicate rows and column composition, \
folds them into a bounded 0-100 quality score, and flags severity-ranked issues.\n\n\
Optional AI insights send the profile (never the data itself) to an LLM backend \
of your choice for a short assessment and recommendations.",
    after_help = "\
Examples:
  dataprobe profile train.csv                      Profile a dataset
  dataprobe profile train.csv --format json        JSON output for scripting
  dataprobe profile train.csv --insights           Add an AI assessment
  dataprobe profile train.csv --save               Keep upload, report and record
  dataprobe history                                List saved profiles
  dataprobe init                                   Write an example user config"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create ~/.config/dataprobe/config.toml with example settings
    Init,

    /// Profile a dataset and report its quality
    #[command(after_help = "\
Examples:
  dataprobe profile data.csv                              Terminal report
  dataprobe profile data.tsv --format markdown -o q.md    Markdown report to a file
  dataprobe profile data.csv --explain-score              Show the score breakdown
  dataprobe profile data.csv --insights --backend ollama  AI assessment via local Ollama
  dataprobe profile data.csv --fail-on critical           Exit code 1 on critical issues (CI mode)")]
    Profile {
        /// Dataset file (CSV; .tsv/.tab files are tab-separated)
        file: PathBuf,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Explain the scoring formula with full breakdown
        #[arg(long)]
        explain_score: bool,

        /// Generate an AI assessment and recommendations (requires API key or Ollama)
        #[arg(long)]
        insights: bool,

        /// AI backend for --insights (default: from config, else anthropic)
        #[arg(long, value_parser = ["anthropic", "openai", "openrouter", "ollama"])]
        backend: Option<String>,

        /// Save the upload, the JSON report and a metadata record
        #[arg(long)]
        save: bool,

        /// Owner recorded with --save (default: from config, else "local")
        #[arg(long)]
        owner: Option<String>,

        /// Exit with code 1 if issues at this severity or higher exist
        #[arg(long, value_parser = ["critical", "warning", "info"])]
        fail_on: Option<String>,
    },

    /// Re-run the AI insight pass on a saved JSON profile
    #[command(after_help = "\
Examples:
  dataprobe profile data.csv -f json -o data.profile.json
  dataprobe insights data.profile.json
  dataprobe insights data.profile.json --backend openai -f markdown")]
    Insights {
        /// JSON profile written by `dataprobe profile --format json`
        profile: PathBuf,

        /// Output format: text, json, markdown (or md)
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json", "markdown", "md"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// AI backend (default: from config, else anthropic)
        #[arg(long, value_parser = ["anthropic", "openai", "openrouter", "ollama"])]
        backend: Option<String>,
    },

    /// List saved profiles
    History {
        /// Owner to list (default: from config, else "local")
        #[arg(long)]
        owner: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a saved profile and its stored files
    Forget {
        /// Record id, as shown by `dataprobe history`
        id: String,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(),

        Commands::Profile {
            file,
            format,
            output,
            explain_score,
            insights,
            backend,
            save,
            owner,
            fail_on,
        } => {
            let config = UserConfig::load()?;
            let options = profile::ProfileOptions {
                format: format.parse()?,
                output,
                explain_score,
                insights,
                backend: parse_backend(backend.as_deref())?,
                save,
                owner,
                fail_on: fail_on
                    .as_deref()
                    .map(str::parse)
                    .transpose()
                    .map_err(anyhow::Error::msg)?,
            };
            profile::run(&file, options, &config)
        }

        Commands::Insights {
            profile,
            format,
            output,
            backend,
        } => {
            let config = UserConfig::load()?;
            insights::run(
                &profile,
                format.parse()?,
                output.as_deref(),
                parse_backend(backend.as_deref())?,
                &config,
            )
        }

        Commands::History { owner, json } => {
            let config = UserConfig::load()?;
            let owner = owner.as_deref().unwrap_or_else(|| config.owner());
            history::list(owner, json, &config)
        }

        Commands::Forget { id } => {
            let config = UserConfig::load()?;
            history::forget(&id, &config)
        }
    }
}

fn parse_backend(backend: Option<&str>) -> Result<Option<LlmBackend>> {
    backend
        .map(str::parse)
        .transpose()
        .map_err(anyhow::Error::msg)
}

/// Print a rendered report, or write it when an output path was given
fn emit(rendered: &str, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            // stderr keeps stdout clean for machine-readable formats
            eprintln!("Report written to: {}", style(path.display()).cyan());
        }
        None => {
            if format != OutputFormat::Json {
                println!();
            }
            println!("{}", rendered);
        }
    }
    Ok(())
}

/// Check if fail threshold is met
fn check_fail_threshold(fail_on: Option<Severity>, issues: &[Issue]) {
    if let Some(threshold) = fail_on {
        if issues.iter().any(|issue| issue.severity >= threshold) {
            eprintln!("Failing due to --fail-on={} threshold", threshold);
            std::process::exit(1);
        }
    }
}
