//! Prelude for commonly used types and traits in term-eda.

pub use crate::analyzers::{
    compute_quality_flags, correlation_matrix, missing_table, summarize_dataset, top_categories,
    ColumnKind, QualityConfig,
};
pub use crate::dataset::{Column, ColumnValues, Dataset};
pub use crate::error::{EdaError, ErrorContext, Result};
pub use crate::formatters::{flatten_summary_for_print, FormatterConfig, ReportFormatter};
pub use crate::logging::setup::LoggingConfig;
pub use crate::report::{EdaReport, ReportConfig};
