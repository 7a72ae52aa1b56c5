//! eda-cli - command-line front end for term-eda
//!
//! Argument parsing and command execution live here so that the binary stays
//! a thin wrapper and the commands can be exercised from tests.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use term_eda::analyzers::{
    compute_quality_flags_with_config, missing_table, summarize_dataset, QualityConfig,
};
use term_eda::dataset::Dataset;
use term_eda::formatters::{FormatterConfig, HumanFormatter, ReportFormatter};
use term_eda::logging::setup::{init_logging, LoggingConfig};
use term_eda::report::{EdaReport, ReportConfig, ReportWriter};
use term_eda::sources::{load_path, CsvOptions};
use tracing::{info, Level};

/// Exploratory data analysis for CSV, Parquet and JSON files.
#[derive(Parser, Debug)]
#[command(name = "eda-cli", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level written to stderr
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: Level,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the shape and per-column summary of a file
    Overview {
        /// Input file or glob pattern
        path: String,

        /// CSV field separator
        #[arg(long, default_value_t = ',')]
        sep: char,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
        format: OutputFormat,
    },

    /// Write a full report into a directory
    Report {
        /// Input file or glob pattern
        path: String,

        /// Directory receiving report.md and the CSV/JSON artifacts
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,

        /// CSV field separator
        #[arg(long, default_value_t = ',')]
        sep: char,

        /// Report heading
        #[arg(long, default_value = "EDA report")]
        title: String,

        /// Values kept per categorical column
        #[arg(long, default_value_t = 5)]
        top_k_categories: usize,

        /// Categorical columns examined for top values
        #[arg(long, default_value_t = 5)]
        max_category_columns: usize,

        /// Columns at or above this missing share are listed as problems
        #[arg(long, default_value_t = 0.0)]
        min_missing_share: f64,

        /// JSON file overriding the quality heuristic thresholds
        #[arg(long)]
        quality_config: Option<PathBuf>,
    },

    /// Print the quality flags of a file as JSON
    Quality {
        /// Input file or glob pattern
        path: String,

        /// CSV field separator
        #[arg(long, default_value_t = ',')]
        sep: char,

        /// JSON file overriding the quality heuristic thresholds
        #[arg(long)]
        quality_config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Installs the stderr subscriber configured by the global flags.
pub fn init_tracing(cli: &Cli) -> Result<()> {
    let config = LoggingConfig::default()
        .with_level(cli.log_level)
        .with_eda_level(cli.log_level)
        .with_json_format(cli.log_json);
    init_logging(config).context("Failed to initialize logging")
}

/// Runs the selected command and returns what should be printed to stdout.
pub async fn execute(cli: &Cli) -> Result<String> {
    match &cli.command {
        Commands::Overview { path, sep, format } => overview(path, *sep, *format).await,
        Commands::Report {
            path,
            out_dir,
            sep,
            title,
            top_k_categories,
            max_category_columns,
            min_missing_share,
            quality_config,
        } => {
            let config = ReportConfig::default()
                .with_title(title.clone())
                .with_top_k(*top_k_categories)
                .with_max_category_columns(*max_category_columns)
                .with_min_missing_share(*min_missing_share)
                .with_quality(load_quality_config(quality_config.as_deref())?);
            report(path, *sep, out_dir, &config).await
        }
        Commands::Quality {
            path,
            sep,
            quality_config,
        } => {
            let config = load_quality_config(quality_config.as_deref())?;
            quality(path, *sep, &config).await
        }
    }
}

async fn overview(path: &str, sep: char, format: OutputFormat) -> Result<String> {
    let dataset = load_dataset(path, sep).await?;
    match format {
        OutputFormat::Human => {
            let report = EdaReport::build(&dataset, &ReportConfig::default().with_title(path))
                .context("Failed to summarize dataset")?;
            HumanFormatter::with_config(FormatterConfig::minimal())
                .format(&report)
                .context("Failed to format overview")
        }
        OutputFormat::Json => {
            let summary = summarize_dataset(&dataset).context("Failed to summarize dataset")?;
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")
        }
    }
}

async fn report(path: &str, sep: char, out_dir: &Path, config: &ReportConfig) -> Result<String> {
    let dataset = load_dataset(path, sep).await?;
    let report = EdaReport::build(&dataset, config).context("Failed to build report")?;
    let written = ReportWriter::new(out_dir)
        .write(&report)
        .with_context(|| format!("Failed to write report to {}", out_dir.display()))?;

    info!(files = written.len(), "Report written");
    let mut out = format!(
        "Report written to {} (quality score {:.2})\n",
        out_dir.display(),
        report.quality.quality_score
    );
    for file in &written {
        let _ = writeln!(out, "  {}", file.display());
    }
    Ok(out)
}

async fn quality(path: &str, sep: char, config: &QualityConfig) -> Result<String> {
    let dataset = load_dataset(path, sep).await?;
    let summary = summarize_dataset(&dataset).context("Failed to summarize dataset")?;
    let missing = missing_table(&dataset).context("Failed to compute missing values")?;
    let flags = compute_quality_flags_with_config(&summary, &missing, config);
    serde_json::to_string_pretty(&flags).context("Failed to serialize quality flags")
}

/// Loads `path` with `sep` as the CSV delimiter.
pub async fn load_dataset(path: &str, sep: char) -> Result<Dataset> {
    let delimiter = u8::try_from(sep)
        .with_context(|| format!("Separator '{sep}' is not a single-byte character"))?;
    let options = CsvOptions::default().with_delimiter(delimiter);
    load_path(path, &options)
        .await
        .with_context(|| format!("Failed to load {path}"))
}

/// Reads quality thresholds from a JSON file, or the defaults when absent.
pub fn load_quality_config(path: Option<&Path>) -> Result<QualityConfig> {
    let Some(path) = path else {
        return Ok(QualityConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read quality config {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid quality config {}", path.display()))
}
