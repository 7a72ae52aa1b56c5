//! # term-eda - Exploratory Data Analysis for Rust
//!
//! term-eda produces a first-look report for a tabular dataset: per-column
//! summaries, missing-value tables, pairwise correlations between numeric
//! columns, the most frequent values of categorical columns and a set of
//! quality heuristics rolled up into a single score. Files are read through
//! DataFusion; the statistics themselves run synchronously over an in-memory
//! [`Dataset`](dataset::Dataset).
//!
//! ## Quick Start
//!
//! ```rust
//! use term_eda::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let dataset = Dataset::builder()
//!     .integers("age", vec![Some(10), Some(20), Some(30), None])
//!     .integers("height", vec![Some(140), Some(150), Some(160), Some(170)])
//!     .categorical("city", vec![Some("A"), Some("B"), Some("A"), None])
//!     .build()?;
//!
//! let summary = summarize_dataset(&dataset)?;
//! let missing = missing_table(&dataset)?;
//! let flags = compute_quality_flags(&summary, &missing);
//!
//! println!("{}", flatten_summary_for_print(&summary).to_text());
//! println!("quality score: {:.2}", flags.quality_score);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Loading files
//!
//! ```rust,no_run
//! use term_eda::prelude::*;
//! use term_eda::sources::{load_path, CsvOptions};
//!
//! # async fn example() -> Result<()> {
//! let dataset = load_path("data/customers.csv", &CsvOptions::default()).await?;
//! let report = EdaReport::build(&dataset, &ReportConfig::default())?;
//! term_eda::report::ReportWriter::new("reports").write(&report)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`dataset`**: the in-memory table and its Arrow ingestion
//! - **`analyzers`**: classifier, summary, missingness, correlation, categories
//!   and quality heuristics
//! - **`sources`**: CSV, Parquet and JSON loaders built on DataFusion
//! - **`report`**: runs every analyzer and writes the report artifacts
//! - **`formatters`**: printable tables and human, Markdown and JSON output
//! - **`logging`**: `tracing-subscriber` setup used by the CLI

pub mod analyzers;
pub mod dataset;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod sources;
