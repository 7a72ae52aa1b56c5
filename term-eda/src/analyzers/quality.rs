//! Data quality heuristics and the aggregate quality score.
//!
//! [`compute_quality_flags`] combines a [`DatasetSummary`] and a
//! [`MissingTable`] into [`QualityFlags`]: constant columns, high-cardinality
//! categorical columns, missingness and dataset shape signals, plus a single
//! score in `[0, 1]`.
//!
//! The score starts at `1.0` and loses:
//!
//! - the largest missing share, scaled by `missing_weight`
//! - `too_few_rows_penalty` below `min_rows` rows and
//!   `too_many_columns_penalty` above `max_columns` columns, together at most
//!   `max_shape_penalty`
//! - `constant_columns_penalty` if any column is constant
//! - `high_cardinality_penalty` if any categorical column is high-cardinality
//!
//! and is clamped to `[0, 1]`. All thresholds and weights live in
//! [`QualityConfig`]. With the defaults, a dataset without constant or
//! high-cardinality columns and a largest missing share below 0.2 scores
//! above 0.7 whatever its shape.
//!
//! # Example
//!
//! ```rust
//! use term_eda::analyzers::{compute_quality_flags, missing_table, summarize_dataset};
//! use term_eda::dataset::Dataset;
//!
//! let dataset = Dataset::builder()
//!     .integers("id", vec![Some(1), Some(2), Some(3), Some(4), Some(5)])
//!     .integers("constant_col", vec![Some(1); 5])
//!     .build()
//!     .unwrap();
//!
//! let summary = summarize_dataset(&dataset).unwrap();
//! let missing = missing_table(&dataset).unwrap();
//! let flags = compute_quality_flags(&summary, &missing);
//!
//! assert!(flags.has_constant_columns);
//! assert!(flags.constant_columns_names.contains("constant_col"));
//! assert!((0.0..=1.0).contains(&flags.quality_score));
//! ```

use crate::analyzers::{ColumnKind, ColumnSummary, DatasetSummary, MissingTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Thresholds and weights of the quality heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Distinct-to-count ratio at which a categorical column is high-cardinality
    pub high_cardinality_ratio: f64,
    /// Minimum non-missing count for the ratio rule to apply
    pub high_cardinality_min_count: usize,
    /// Minimum non-missing count for an all-distinct column to be flagged
    pub all_unique_min_count: usize,
    /// Datasets with fewer rows are flagged `too_few_rows`
    pub min_rows: usize,
    /// Datasets with more columns are flagged `too_many_columns`
    pub max_columns: usize,
    /// Largest missing share above which `too_many_missing` is set
    pub too_many_missing_share: f64,
    /// Multiplier of the largest missing share subtracted from the score
    pub missing_weight: f64,
    pub too_few_rows_penalty: f64,
    pub too_many_columns_penalty: f64,
    /// Upper bound of the two shape penalties combined
    pub max_shape_penalty: f64,
    pub constant_columns_penalty: f64,
    pub high_cardinality_penalty: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            high_cardinality_ratio: 0.8,
            high_cardinality_min_count: 10,
            all_unique_min_count: 5,
            min_rows: 100,
            max_columns: 100,
            too_many_missing_share: 0.5,
            missing_weight: 0.5,
            too_few_rows_penalty: 0.15,
            too_many_columns_penalty: 0.1,
            max_shape_penalty: 0.2,
            constant_columns_penalty: 0.1,
            high_cardinality_penalty: 0.1,
        }
    }
}

impl QualityConfig {
    /// Creates a configuration that flags problems but leaves the score to
    /// missingness alone.
    pub fn flags_only() -> Self {
        Self {
            too_few_rows_penalty: 0.0,
            too_many_columns_penalty: 0.0,
            constant_columns_penalty: 0.0,
            high_cardinality_penalty: 0.0,
            ..Self::default()
        }
    }

    /// Creates a configuration with stricter shape and cardinality limits.
    pub fn strict() -> Self {
        Self {
            high_cardinality_ratio: 0.5,
            min_rows: 1000,
            too_many_missing_share: 0.2,
            constant_columns_penalty: 0.2,
            high_cardinality_penalty: 0.2,
            ..Self::default()
        }
    }

    /// Sets the high-cardinality ratio threshold.
    pub fn with_high_cardinality_ratio(mut self, ratio: f64) -> Self {
        self.high_cardinality_ratio = ratio;
        self
    }

    /// Sets the minimum row count below which `too_few_rows` is set.
    pub fn with_min_rows(mut self, min_rows: usize) -> Self {
        self.min_rows = min_rows;
        self
    }

    /// Sets the column count above which `too_many_columns` is set.
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns;
        self
    }

    /// Returns true when `column` counts as a high-cardinality categorical.
    pub fn is_high_cardinality(&self, column: &ColumnSummary) -> bool {
        if column.kind != ColumnKind::Categorical || column.count == 0 {
            return false;
        }
        let ratio = column.n_unique as f64 / column.count as f64;
        (ratio >= self.high_cardinality_ratio && column.count >= self.high_cardinality_min_count)
            || (column.n_unique == column.count && column.count >= self.all_unique_min_count)
    }
}

/// Quality signals of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    /// Aggregate score in `[0, 1]`, higher is better
    pub quality_score: f64,
    pub has_constant_columns: bool,
    pub constant_columns_count: usize,
    pub constant_columns_names: BTreeSet<String>,
    pub has_high_cardinality_categoricals: bool,
    pub high_cardinality_columns_count: usize,
    pub high_cardinality_columns_names: BTreeSet<String>,
    pub too_few_rows: bool,
    pub too_many_columns: bool,
    pub max_missing_share: f64,
    pub avg_missing_share: f64,
    pub too_many_missing: bool,
}

/// Evaluates the quality heuristics with [`QualityConfig::default`].
pub fn compute_quality_flags(summary: &DatasetSummary, missing: &MissingTable) -> QualityFlags {
    compute_quality_flags_with_config(summary, missing, &QualityConfig::default())
}

/// Evaluates the quality heuristics with a custom configuration.
#[instrument(skip_all, fields(rows = summary.n_rows, columns = summary.n_cols))]
pub fn compute_quality_flags_with_config(
    summary: &DatasetSummary,
    missing: &MissingTable,
    config: &QualityConfig,
) -> QualityFlags {
    let constant_columns_names: BTreeSet<String> = summary
        .columns
        .iter()
        .filter(|c| c.n_unique <= 1)
        .map(|c| c.name.clone())
        .collect();

    let high_cardinality_columns_names: BTreeSet<String> = summary
        .columns
        .iter()
        .filter(|c| config.is_high_cardinality(c))
        .map(|c| c.name.clone())
        .collect();

    let max_missing_share = missing.max_share();
    let avg_missing_share = missing.mean_share();
    let too_few_rows = summary.n_rows < config.min_rows;
    let too_many_columns = summary.n_cols > config.max_columns;

    let mut shape_penalty = 0.0;
    if too_few_rows {
        shape_penalty += config.too_few_rows_penalty;
    }
    if too_many_columns {
        shape_penalty += config.too_many_columns_penalty;
    }

    let mut score = 1.0
        - max_missing_share * config.missing_weight
        - shape_penalty.min(config.max_shape_penalty);
    if !constant_columns_names.is_empty() {
        score -= config.constant_columns_penalty;
    }
    if !high_cardinality_columns_names.is_empty() {
        score -= config.high_cardinality_penalty;
    }
    let quality_score = if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    };

    debug!(
        quality_score,
        constant = constant_columns_names.len(),
        high_cardinality = high_cardinality_columns_names.len(),
        max_missing_share,
        "Computed quality flags"
    );

    QualityFlags {
        quality_score,
        has_constant_columns: !constant_columns_names.is_empty(),
        constant_columns_count: constant_columns_names.len(),
        constant_columns_names,
        has_high_cardinality_categoricals: !high_cardinality_columns_names.is_empty(),
        high_cardinality_columns_count: high_cardinality_columns_names.len(),
        high_cardinality_columns_names,
        too_few_rows,
        too_many_columns,
        max_missing_share,
        avg_missing_share,
        too_many_missing: max_missing_share > config.too_many_missing_share,
    }
}
