//! Printable tables and report formatting.
//!
//! [`flatten_summary_for_print`] turns a [`DatasetSummary`] into a
//! [`PrintTable`] with one row per column. The [`ReportFormatter`]
//! implementations render a whole [`EdaReport`] as console text, Markdown or
//! JSON.
//!
//! # Examples
//!
//! ```rust
//! use term_eda::analyzers::summarize_dataset;
//! use term_eda::dataset::Dataset;
//! use term_eda::formatters::flatten_summary_for_print;
//!
//! let dataset = Dataset::builder()
//!     .categorical("city", vec![Some("A"), None])
//!     .build()
//!     .unwrap();
//! let table = flatten_summary_for_print(&summarize_dataset(&dataset).unwrap());
//!
//! assert!(table.has_column("name"));
//! assert_eq!(table.cell(0, "missing_share"), Some("0.500"));
//! ```

use crate::analyzers::{CorrelationMatrix, DatasetSummary, QualityFlags, TopCategoriesResult};
use crate::prelude::*;
use crate::report::EdaReport;
use std::fmt::Write;

/// Headers of the flattened summary, in output order.
pub const SUMMARY_HEADERS: [&str; 15] = [
    "name",
    "dtype",
    "kind",
    "count",
    "missing_count",
    "missing_share",
    "n_unique",
    "example_values",
    "mean",
    "std",
    "min",
    "q25",
    "q50",
    "q75",
    "max",
];

/// A rectangular table of string cells with named columns, rendered for
/// the console and Markdown. CSV artifacts are written from typed Arrow
/// batches by [`ReportWriter`](crate::report::ReportWriter).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PrintTable {
    /// Creates a table with the given headers and no rows.
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty cells.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true when a column with this header exists.
    pub fn has_column(&self, header: &str) -> bool {
        self.column_index(header).is_some()
    }

    /// Position of a header.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at `row` under `header`.
    pub fn cell(&self, row: usize, header: &str) -> Option<&str> {
        let column = self.column_index(header)?;
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Renders the table with space-aligned columns.
    pub fn to_text(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();
        let render = |out: &mut String, line: &[String]| {
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        };
        render(&mut out, &self.headers);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        render(&mut out, &rule);
        for row in &self.rows {
            render(&mut out, row);
        }
        out
    }

    /// Renders the table as a Markdown pipe table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let escape = |cell: &String| cell.replace('|', "\\|");
        let header: Vec<String> = self.headers.iter().map(escape).collect();
        let _ = writeln!(out, "| {} |", header.join(" | "));
        let _ = writeln!(out, "|{}", "---|".repeat(self.headers.len()));
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(escape).collect();
            let _ = writeln!(out, "| {} |", cells.join(" | "));
        }
        out
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

fn fmt_float(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_default()
}

/// Flattens column summaries into a row-per-column table.
///
/// Numeric statistics are left empty for categorical columns. An empty
/// summary yields a table with headers and no rows.
pub fn flatten_summary_for_print(summary: &DatasetSummary) -> PrintTable {
    flatten_summary_with_precision(summary, 3)
}

fn flatten_summary_with_precision(summary: &DatasetSummary, precision: usize) -> PrintTable {
    let mut table = PrintTable::new(SUMMARY_HEADERS);
    for column in &summary.columns {
        let stats = column.stats.as_ref();
        table.push_row(vec![
            column.name.clone(),
            column.dtype.clone(),
            column.kind.to_string(),
            column.count.to_string(),
            column.missing_count.to_string(),
            format!("{:.precision$}", column.missing_share),
            column.n_unique.to_string(),
            column.example_values.join(", "),
            fmt_float(stats.map(|s| s.mean), precision),
            fmt_float(stats.and_then(|s| s.std), precision),
            fmt_float(stats.map(|s| s.min), precision),
            fmt_float(stats.map(|s| s.q25), precision),
            fmt_float(stats.map(|s| s.q50), precision),
            fmt_float(stats.map(|s| s.q75), precision),
            fmt_float(stats.map(|s| s.max), precision),
        ]);
    }
    table
}

/// Correlation matrix as a table whose first column names the row.
pub fn correlation_table(matrix: &CorrelationMatrix, precision: usize) -> PrintTable {
    let mut table = PrintTable::new(std::iter::once(String::new()).chain(matrix.columns.clone()));
    for (name, values) in matrix.columns.iter().zip(&matrix.values) {
        let mut row = vec![name.clone()];
        row.extend(values.iter().map(|v| fmt_float(*v, precision)));
        table.push_row(row);
    }
    table
}

/// Quality flags as a two-column `flag, value` table.
pub fn quality_table(flags: &QualityFlags) -> PrintTable {
    let names = |set: &std::collections::BTreeSet<String>| {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    let mut table = PrintTable::new(["flag", "value"]);
    for (flag, value) in [
        ("quality_score", format!("{:.3}", flags.quality_score)),
        ("too_few_rows", flags.too_few_rows.to_string()),
        ("too_many_columns", flags.too_many_columns.to_string()),
        ("max_missing_share", format!("{:.3}", flags.max_missing_share)),
        ("avg_missing_share", format!("{:.3}", flags.avg_missing_share)),
        ("too_many_missing", flags.too_many_missing.to_string()),
        ("has_constant_columns", flags.has_constant_columns.to_string()),
        ("constant_columns", names(&flags.constant_columns_names)),
        (
            "has_high_cardinality_categoricals",
            flags.has_high_cardinality_categoricals.to_string(),
        ),
        (
            "high_cardinality_columns",
            names(&flags.high_cardinality_columns_names),
        ),
    ] {
        table.push_row(vec![flag.to_string(), value]);
    }
    table
}

/// Top value tables, one `value, count, share` table per column.
pub fn category_tables(result: &TopCategoriesResult, precision: usize) -> Vec<(&str, PrintTable)> {
    result
        .tables
        .iter()
        .map(|category| {
            let mut table = PrintTable::new(["value", "count", "share"]);
            for row in &category.rows {
                table.push_row(vec![
                    row.value.clone(),
                    row.count.to_string(),
                    format!("{:.precision$}", row.share),
                ]);
            }
            (category.column.as_str(), table)
        })
        .collect()
}

/// Configuration options for formatting reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include the per-column summary table
    pub include_summary: bool,
    /// Include the missing value table
    pub include_missing: bool,
    /// Include the correlation matrix
    pub include_correlation: bool,
    /// Include top category tables
    pub include_categories: bool,
    /// Whether to include the generation timestamp
    pub include_timestamps: bool,
    /// Digits after the decimal point for floats
    pub precision: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_summary: true,
            include_missing: true,
            include_correlation: true,
            include_categories: true,
            include_timestamps: true,
            precision: 3,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing shape, summary and quality only.
    pub fn minimal() -> Self {
        Self {
            include_summary: true,
            include_missing: false,
            include_correlation: false,
            include_categories: false,
            include_timestamps: false,
            precision: 3,
        }
    }

    /// Creates a detailed configuration showing everything.
    pub fn detailed() -> Self {
        Self {
            precision: 4,
            ..Self::default()
        }
    }

    /// Sets whether to include the correlation matrix.
    pub fn with_correlation(mut self, include: bool) -> Self {
        self.include_correlation = include;
        self
    }

    /// Sets whether to include top category tables.
    pub fn with_categories(mut self, include: bool) -> Self {
        self.include_categories = include;
        self
    }

    /// Sets the float precision.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// Trait for rendering an [`EdaReport`] into an output format.
///
/// # Examples
///
/// ```rust
/// use term_eda::formatters::ReportFormatter;
/// use term_eda::report::EdaReport;
///
/// struct ScoreOnly;
///
/// impl ReportFormatter for ScoreOnly {
///     fn format(&self, report: &EdaReport) -> term_eda::prelude::Result<String> {
///         Ok(format!("{:.2}", report.quality.quality_score))
///     }
/// }
/// ```
pub trait ReportFormatter {
    /// Formats a report into a string.
    fn format(&self, report: &EdaReport) -> Result<String>;

    /// Formats a report with custom configuration.
    fn format_with_config(&self, report: &EdaReport, _config: &FormatterConfig) -> Result<String> {
        self.format(report)
    }
}

/// Formats reports as structured JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a pretty-printing JSON formatter.
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &EdaReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        json.map_err(|e| EdaError::Serialization(format!("Failed to serialize report: {e}")))
    }
}

/// Formats reports as aligned console tables.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a console formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a console formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ReportFormatter for HumanFormatter {
    fn format(&self, report: &EdaReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &EdaReport, config: &FormatterConfig) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", report.title);
        let _ = writeln!(
            out,
            "Rows: {}  Columns: {}",
            report.summary.n_rows, report.summary.n_cols
        );
        if config.include_timestamps {
            let _ = writeln!(out, "Generated: {}", report.generated_at.to_rfc3339());
        }

        if config.include_summary {
            let _ = writeln!(out, "\nColumns:");
            out.push_str(&flatten_summary_with_precision(&report.summary, config.precision).to_text());
        }

        let _ = writeln!(out, "\nQuality:");
        out.push_str(&quality_table(&report.quality).to_text());

        if config.include_correlation && !report.correlation.is_empty() {
            let _ = writeln!(out, "\nCorrelation:");
            out.push_str(&correlation_table(&report.correlation, config.precision).to_text());
        }

        if config.include_categories {
            for (column, table) in category_tables(&report.top_categories, config.precision) {
                let _ = writeln!(out, "\nTop values of {column}:");
                out.push_str(&table.to_text());
            }
        }

        Ok(out)
    }
}

/// Formats reports as Markdown documents.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
}

impl MarkdownFormatter {
    /// Creates a Markdown formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Markdown formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, report: &EdaReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(&self, report: &EdaReport, config: &FormatterConfig) -> Result<String> {
        let precision = config.precision;
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", report.title);
        if config.include_timestamps {
            let _ = writeln!(out, "_Generated {}_\n", report.generated_at.to_rfc3339());
        }
        let _ = writeln!(out, "- Rows: **{}**", report.summary.n_rows);
        let _ = writeln!(out, "- Columns: **{}**", report.summary.n_cols);
        let _ = writeln!(
            out,
            "- Quality score: **{:.precision$}**\n",
            report.quality.quality_score
        );

        let _ = writeln!(out, "## Quality flags\n");
        out.push_str(&quality_table(&report.quality).to_markdown());

        if config.include_missing {
            let threshold = report.config.min_missing_share;
            let _ = writeln!(out, "\n## Missing values\n");
            let problems = report.problem_columns();
            if problems.is_empty() {
                let _ = writeln!(
                    out,
                    "No column has a missing share of at least {threshold:.precision$}."
                );
            } else {
                let _ = writeln!(
                    out,
                    "Columns with a missing share of at least {threshold:.precision$}:\n"
                );
                let mut table = PrintTable::new(["column", "missing_count", "missing_share"]);
                for entry in problems {
                    table.push_row(vec![
                        entry.column.clone(),
                        entry.missing_count.to_string(),
                        format!("{:.precision$}", entry.missing_share),
                    ]);
                }
                out.push_str(&table.to_markdown());
            }
        }

        if config.include_summary {
            let _ = writeln!(out, "\n## Columns\n");
            out.push_str(&flatten_summary_with_precision(&report.summary, precision).to_markdown());
        }

        if config.include_categories && !report.top_categories.is_empty() {
            let _ = writeln!(out, "\n## Top categories\n");
            for (column, table) in category_tables(&report.top_categories, precision) {
                let _ = writeln!(out, "### {column}\n");
                out.push_str(&table.to_markdown());
                out.push('\n');
            }
        }

        if config.include_correlation {
            let _ = writeln!(out, "\n## Correlation\n");
            if report.correlation.is_empty() {
                let _ = writeln!(out, "Fewer than two numeric columns.");
            } else {
                out.push_str(&correlation_table(&report.correlation, precision).to_markdown());
            }
        }

        Ok(out)
    }
}
