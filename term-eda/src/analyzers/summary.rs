//! Per-column descriptive statistics.
//!
//! [`summarize_dataset`] produces one [`ColumnSummary`] per column, in dataset
//! order. Every column gets counts, missing share and cardinality; numeric
//! columns additionally get [`NumericStats`].
//!
//! Shares use the zero-row convention of the whole crate: a dataset without
//! rows reports a missing share of `0.0` instead of dividing by zero.
//!
//! # Example
//!
//! ```rust
//! use term_eda::analyzers::summarize_dataset;
//! use term_eda::dataset::Dataset;
//!
//! let dataset = Dataset::builder()
//!     .integers("age", vec![Some(10), Some(20), Some(30), None])
//!     .build()
//!     .unwrap();
//!
//! let summary = summarize_dataset(&dataset).unwrap();
//! let age = summary.column("age").unwrap();
//! assert_eq!(age.count, 3);
//! assert_eq!(age.missing_count, 1);
//! assert_eq!(age.stats.as_ref().unwrap().mean, 20.0);
//! ```

use crate::analyzers::ColumnKind;
use crate::dataset::{Column, ColumnValues, Dataset};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Number of distinct example values kept per column.
const EXAMPLE_VALUES: usize = 3;

/// Descriptive statistics of a numeric column, over non-missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
}

impl NumericStats {
    /// Computes statistics for `values`, or `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.len() >= 2).then(|| {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1.0)).sqrt()
        });

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            mean,
            std,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q25: quantile(&sorted, 0.25),
            q50: quantile(&sorted, 0.50),
            q75: quantile(&sorted, 0.75),
        })
    }
}

/// Quantile of sorted, non-empty data by linear interpolation between the
/// closest ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Summary of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Storage type name, e.g. `Int64`
    pub dtype: String,
    pub kind: ColumnKind,
    /// Non-missing entries
    pub count: usize,
    pub missing_count: usize,
    /// `missing_count / n_rows`, `0.0` for a dataset without rows
    pub missing_share: f64,
    /// Distinct non-missing values
    pub n_unique: usize,
    /// Up to three distinct values in order of first appearance
    pub example_values: Vec<String>,
    /// Present for numeric columns with at least one value
    pub stats: Option<NumericStats>,
}

impl ColumnSummary {
    /// Returns true for numeric columns.
    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }
}

/// Summary of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub n_rows: usize,
    pub n_cols: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Looks up a column summary by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column summaries of the given kind, in dataset order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }
}

/// Share of `part` in `total`, `0.0` when `total` is zero.
pub(crate) fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

/// Maps a float to a hashable key, treating `-0.0` and `0.0` as equal.
pub(crate) fn float_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Builds the summary of every column.
///
/// # Errors
///
/// Returns [`EdaError::EmptyDataset`](crate::error::EdaError::EmptyDataset)
/// when the dataset has no columns.
#[instrument(skip(dataset), fields(rows = dataset.n_rows(), columns = dataset.n_cols()))]
pub fn summarize_dataset(dataset: &Dataset) -> Result<DatasetSummary> {
    dataset.ensure_not_empty()?;

    let n_rows = dataset.n_rows();
    let columns: Vec<ColumnSummary> = dataset
        .columns()
        .iter()
        .map(|column| summarize_column(column, n_rows))
        .collect();

    Ok(DatasetSummary {
        n_rows,
        n_cols: columns.len(),
        columns,
    })
}

fn summarize_column(column: &Column, n_rows: usize) -> ColumnSummary {
    let missing_count = column.values().missing_count();
    let count = n_rows - missing_count;

    let (n_unique, example_values, stats) = match column.values() {
        ColumnValues::Numeric(values) => {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let mut seen = HashSet::new();
            let mut examples = Vec::new();
            for value in &present {
                if seen.insert(float_key(*value)) && examples.len() < EXAMPLE_VALUES {
                    examples.push(value.to_string());
                }
            }
            (seen.len(), examples, NumericStats::from_values(&present))
        }
        ColumnValues::Categorical(values) => {
            let mut seen = HashSet::new();
            let mut examples = Vec::new();
            for value in values.iter().flatten() {
                if seen.insert(value.as_str()) && examples.len() < EXAMPLE_VALUES {
                    examples.push(value.clone());
                }
            }
            (seen.len(), examples, None)
        }
    };

    debug!(
        column = column.name(),
        kind = %column.kind(),
        count,
        missing_count,
        n_unique,
        "Summarized column"
    );

    ColumnSummary {
        name: column.name().to_string(),
        dtype: column.dtype().to_string(),
        kind: column.kind(),
        count,
        missing_count,
        missing_share: share(missing_count, n_rows),
        n_unique,
        example_values,
        stats,
    }
}
