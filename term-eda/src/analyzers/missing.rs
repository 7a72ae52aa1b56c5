//! Per-column missing value report.

use crate::analyzers::summary::share;
use crate::dataset::Dataset;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Missing values of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub column: String,
    pub missing_count: usize,
    /// `missing_count / n_rows`, `0.0` for a dataset without rows
    pub missing_share: f64,
}

/// Missing counts and shares keyed by column name, in dataset order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingTable {
    pub n_rows: usize,
    pub entries: Vec<MissingEntry>,
}

impl MissingTable {
    /// Looks up a column's entry.
    pub fn get(&self, column: &str) -> Option<&MissingEntry> {
        self.entries.iter().find(|e| e.column == column)
    }

    /// Number of entries, equal to the dataset's column count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest missing share, `0.0` for an empty table.
    pub fn max_share(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.missing_share)
            .fold(0.0, f64::max)
    }

    /// Mean missing share, `0.0` for an empty table.
    pub fn mean_share(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        self.entries.iter().map(|e| e.missing_share).sum::<f64>() / self.entries.len() as f64
    }

    /// Entries sorted by missing share, largest first. Ties keep dataset order.
    pub fn sorted_by_share(&self) -> Vec<&MissingEntry> {
        let mut sorted: Vec<&MissingEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.missing_share.total_cmp(&a.missing_share));
        sorted
    }
}

/// Counts missing values per column.
///
/// # Errors
///
/// Returns [`EdaError::EmptyDataset`](crate::error::EdaError::EmptyDataset)
/// when the dataset has no columns.
#[instrument(skip(dataset), fields(rows = dataset.n_rows(), columns = dataset.n_cols()))]
pub fn missing_table(dataset: &Dataset) -> Result<MissingTable> {
    dataset.ensure_not_empty()?;

    let n_rows = dataset.n_rows();
    let entries = dataset
        .columns()
        .iter()
        .map(|column| {
            let missing_count = column.values().missing_count();
            MissingEntry {
                column: column.name().to_string(),
                missing_count,
                missing_share: share(missing_count, n_rows),
            }
        })
        .collect();

    Ok(MissingTable { n_rows, entries })
}
