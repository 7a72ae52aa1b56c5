//! Full EDA reports: every analyzer under one configuration, and writing the
//! results to disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use term_eda::dataset::Dataset;
//! use term_eda::report::{EdaReport, ReportConfig, ReportWriter};
//!
//! # fn example() -> term_eda::prelude::Result<()> {
//! let dataset = Dataset::builder()
//!     .integers("age", vec![Some(10), Some(20), None])
//!     .categorical("city", vec![Some("A"), Some("B"), Some("A")])
//!     .build()?;
//!
//! let config = ReportConfig::default().with_title("Customers").with_top_k(3);
//! let report = EdaReport::build(&dataset, &config)?;
//! let written = ReportWriter::new("reports").write(&report)?;
//! println!("wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

use crate::analyzers::{
    compute_quality_flags_with_config, correlation_matrix, missing_table, summarize_dataset,
    top_categories, CategoryTable, CorrelationMatrix, DatasetSummary, MissingEntry, MissingTable,
    NumericStats, QualityConfig, QualityFlags, TopCategoriesResult,
};
use crate::dataset::Dataset;
use crate::formatters::{
    flatten_summary_for_print, FormatterConfig, MarkdownFormatter, PrintTable, ReportFormatter,
    SUMMARY_HEADERS,
};
use crate::prelude::*;
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Settings of a report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Heading of the report
    pub title: String,
    /// Values kept per categorical column
    pub top_k_categories: usize,
    /// Categorical columns examined for top values
    pub max_category_columns: usize,
    /// Columns at or above this missing share are listed as problems
    pub min_missing_share: f64,
    /// Quality heuristic thresholds
    pub quality: QualityConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "EDA report".to_string(),
            top_k_categories: 5,
            max_category_columns: 5,
            min_missing_share: 0.0,
            quality: QualityConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Sets the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the number of values kept per categorical column.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k_categories = top_k;
        self
    }

    /// Sets the number of categorical columns examined.
    pub fn with_max_category_columns(mut self, max_columns: usize) -> Self {
        self.max_category_columns = max_columns;
        self
    }

    /// Sets the missing share from which columns are listed as problems.
    pub fn with_min_missing_share(mut self, share: f64) -> Self {
        self.min_missing_share = share;
        self
    }

    /// Sets the quality heuristic configuration.
    pub fn with_quality(mut self, quality: QualityConfig) -> Self {
        self.quality = quality;
        self
    }

    /// Reads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report config {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Results of every analyzer for one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub config: ReportConfig,
    pub summary: DatasetSummary,
    pub missing: MissingTable,
    pub correlation: CorrelationMatrix,
    pub top_categories: TopCategoriesResult,
    pub quality: QualityFlags,
}

impl EdaReport {
    /// Runs every analyzer on `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`EdaError::EmptyDataset`] when the dataset has no columns.
    #[instrument(skip_all, fields(rows = dataset.n_rows(), columns = dataset.n_cols()))]
    pub fn build(dataset: &Dataset, config: &ReportConfig) -> Result<Self> {
        let summary = summarize_dataset(dataset)?;
        let missing = missing_table(dataset)?;
        let correlation = correlation_matrix(dataset)?;
        let top_categories = top_categories(
            dataset,
            config.max_category_columns,
            config.top_k_categories,
        )?;
        let quality = compute_quality_flags_with_config(&summary, &missing, &config.quality);

        info!(quality_score = quality.quality_score, "Built EDA report");

        Ok(Self {
            title: config.title.clone(),
            generated_at: Utc::now(),
            config: config.clone(),
            summary,
            missing,
            correlation,
            top_categories,
            quality,
        })
    }

    /// The flattened per-column summary.
    pub fn print_table(&self) -> PrintTable {
        flatten_summary_for_print(&self.summary)
    }

    /// Columns whose missing share reaches `min_missing_share` and that have
    /// at least one missing value, largest share first.
    pub fn problem_columns(&self) -> Vec<&MissingEntry> {
        self.missing
            .sorted_by_share()
            .into_iter()
            .filter(|e| e.missing_count > 0 && e.missing_share >= self.config.min_missing_share)
            .collect()
    }
}

/// Writes a report's artifacts into a directory.
///
/// Produces `report.md`, `summary.csv`, `missing.csv`, `correlation.csv`,
/// `quality.json` and one `top_categories/<column>.csv` per examined column.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    out_dir: PathBuf,
    formatter: FormatterConfig,
}

impl ReportWriter {
    /// Creates a writer targeting `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            formatter: FormatterConfig::default(),
        }
    }

    /// Sets the formatter configuration used for `report.md`.
    pub fn with_formatter_config(mut self, config: FormatterConfig) -> Self {
        self.formatter = config;
        self
    }

    /// Target directory.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Writes all artifacts and returns their paths.
    ///
    /// CSV artifacts keep full float precision; the formatter precision only
    /// applies to `report.md`.
    #[instrument(skip_all, fields(out_dir = %self.out_dir.display()))]
    pub fn write(&self, report: &EdaReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.out_dir)?;
        let mut written = Vec::new();

        let markdown = MarkdownFormatter::with_config(self.formatter.clone()).format(report)?;
        let report_path = self.out_dir.join("report.md");
        fs::write(&report_path, markdown)?;
        written.push(report_path);

        written.push(self.write_csv("summary.csv", &summary_batch(&report.summary)?)?);
        written.push(self.write_csv("missing.csv", &missing_batch(&report.missing)?)?);
        let correlation = correlation_batch(&report.correlation)?;
        written.push(self.write_csv("correlation.csv", &correlation)?);

        let quality_path = self.out_dir.join("quality.json");
        fs::write(&quality_path, serde_json::to_string_pretty(&report.quality)?)?;
        written.push(quality_path);

        let categories_dir = self.out_dir.join("top_categories");
        fs::create_dir_all(&categories_dir)?;
        let columns: Vec<&str> = report
            .top_categories
            .tables
            .iter()
            .map(|table| table.column.as_str())
            .collect();
        for (table, stem) in report.top_categories.tables.iter().zip(unique_stems(&columns)) {
            let path = categories_dir.join(format!("{stem}.csv"));
            write_batch(&path, &category_batch(table)?)?;
            written.push(path);
        }

        info!(files = written.len(), "Wrote EDA report");
        Ok(written)
    }

    fn write_csv(&self, name: &str, batch: &RecordBatch) -> Result<PathBuf> {
        let path = self.out_dir.join(name);
        write_batch(&path, batch)?;
        Ok(path)
    }
}

fn write_batch(path: &Path, batch: &RecordBatch) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}

fn utf8_field(name: &str) -> Field {
    Field::new(name, DataType::Utf8, false)
}

fn count_array(values: impl IntoIterator<Item = usize>) -> ArrayRef {
    Arc::new(UInt64Array::from_iter_values(
        values.into_iter().map(|v| v as u64),
    ))
}

fn summary_batch(summary: &DatasetSummary) -> Result<RecordBatch> {
    let columns = &summary.columns;
    let stat = |get: fn(&NumericStats) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from_iter(
            columns.iter().map(|c| c.stats.as_ref().and_then(get)),
        ))
    };

    let mut fields = Vec::with_capacity(SUMMARY_HEADERS.len());
    for name in SUMMARY_HEADERS {
        let field = match name {
            "name" | "dtype" | "kind" | "example_values" => utf8_field(name),
            "count" | "missing_count" | "n_unique" => Field::new(name, DataType::UInt64, false),
            "missing_share" => Field::new(name, DataType::Float64, false),
            _ => Field::new(name, DataType::Float64, true),
        };
        fields.push(field);
    }

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(columns.iter().map(|c| c.name.as_str()))),
        Arc::new(StringArray::from_iter_values(columns.iter().map(|c| c.dtype.as_str()))),
        Arc::new(StringArray::from_iter_values(columns.iter().map(|c| c.kind.to_string()))),
        count_array(columns.iter().map(|c| c.count)),
        count_array(columns.iter().map(|c| c.missing_count)),
        Arc::new(Float64Array::from_iter_values(columns.iter().map(|c| c.missing_share))),
        count_array(columns.iter().map(|c| c.n_unique)),
        Arc::new(StringArray::from_iter_values(
            columns.iter().map(|c| c.example_values.join(", ")),
        )),
        stat(|s| Some(s.mean)),
        stat(|s| s.std),
        stat(|s| Some(s.min)),
        stat(|s| Some(s.q25)),
        stat(|s| Some(s.q50)),
        stat(|s| Some(s.q75)),
        stat(|s| Some(s.max)),
    ];
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn missing_batch(missing: &MissingTable) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        utf8_field("column"),
        Field::new("missing_count", DataType::UInt64, false),
        Field::new("missing_share", DataType::Float64, false),
    ]);
    let entries = &missing.entries;
    Ok(RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from_iter_values(entries.iter().map(|e| e.column.as_str()))),
            count_array(entries.iter().map(|e| e.missing_count)),
            Arc::new(Float64Array::from_iter_values(entries.iter().map(|e| e.missing_share))),
        ],
    )?)
}

/// The first column names the row; undefined coefficients are empty cells.
fn correlation_batch(matrix: &CorrelationMatrix) -> Result<RecordBatch> {
    let mut fields = vec![utf8_field("column")];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(
        matrix.columns.iter().map(String::as_str),
    ))];
    for (j, name) in matrix.columns.iter().enumerate() {
        fields.push(Field::new(name.as_str(), DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from_iter(
            matrix.values.iter().map(|row| row[j]),
        )));
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

fn category_batch(table: &CategoryTable) -> Result<RecordBatch> {
    let schema = Schema::new(vec![
        utf8_field("value"),
        Field::new("count", DataType::UInt64, false),
        Field::new("share", DataType::Float64, false),
    ]);
    let rows = &table.rows;
    Ok(RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.value.as_str()))),
            count_array(rows.iter().map(|r| r.count)),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.share))),
        ],
    )?)
}

/// File-system safe stem for a column name. Letters and digits of any
/// script are kept.
fn file_stem(column: &str) -> String {
    let stem: String = column
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "column".to_string()
    } else {
        stem
    }
}

/// One stem per column, in order. A stem already taken gets the column's
/// position appended, so distinct columns never share a file.
fn unique_stems(columns: &[&str]) -> Vec<String> {
    let mut taken = HashSet::new();
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let base = file_stem(column);
            let mut stem = base.clone();
            let mut suffix = index;
            while !taken.insert(stem.to_lowercase()) {
                stem = format!("{base}_{suffix}");
                suffix += 1;
            }
            stem
        })
        .collect()
}
