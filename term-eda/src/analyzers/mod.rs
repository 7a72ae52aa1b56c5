//! Statistics and heuristics engine.
//!
//! Every analyzer is a pure, synchronous function over an in-memory
//! [`Dataset`](crate::dataset::Dataset). Nothing here performs I/O or keeps
//! state between calls, so analyzers can run on distinct datasets from
//! independent threads.
//!
//! ## Available Analyzers
//!
//! - **Column Classifier** (`classifier`): numeric vs categorical, decided once per column
//! - **Summary Builder** (`summary`): counts, missing share, cardinality, numeric statistics
//! - **Missingness Reporter** (`missing`): missing counts and shares per column
//! - **Correlation Engine** (`correlation`): pairwise-complete Pearson correlation
//! - **Category Profiler** (`categories`): most frequent values of categorical columns
//! - **Quality Heuristics** (`quality`): constant and high-cardinality columns, aggregate score
//!
//! ## Example Usage
//!
//! ```rust
//! use term_eda::analyzers::{
//!     compute_quality_flags, correlation_matrix, missing_table, summarize_dataset,
//!     top_categories,
//! };
//! use term_eda::dataset::Dataset;
//!
//! let dataset = Dataset::builder()
//!     .integers("age", vec![Some(10), Some(20), Some(30), None])
//!     .integers("height", vec![Some(140), Some(150), Some(160), Some(170)])
//!     .categorical("city", vec![Some("A"), Some("B"), Some("A"), None])
//!     .build()
//!     .unwrap();
//!
//! let summary = summarize_dataset(&dataset).unwrap();
//! let missing = missing_table(&dataset).unwrap();
//! let correlation = correlation_matrix(&dataset).unwrap();
//! let categories = top_categories(&dataset, 5, 2).unwrap();
//! let flags = compute_quality_flags(&summary, &missing);
//!
//! assert_eq!(missing.get("age").unwrap().missing_count, 1);
//! assert!(correlation.get("age", "height").is_some());
//! assert_eq!(categories.get("city").unwrap().rows[0].value, "A");
//! assert!(flags.quality_score <= 1.0);
//! ```

pub mod categories;
pub mod classifier;
pub mod correlation;
pub mod missing;
pub mod quality;
pub mod summary;

pub use categories::{top_categories, CategoryCount, CategoryTable, TopCategoriesResult};
pub use classifier::ColumnKind;
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use missing::{missing_table, MissingEntry, MissingTable};
pub use quality::{
    compute_quality_flags, compute_quality_flags_with_config, QualityConfig, QualityFlags,
};
pub use summary::{summarize_dataset, ColumnSummary, DatasetSummary, NumericStats};

#[cfg(test)]
mod tests;
