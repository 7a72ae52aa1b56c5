//! Column classification into numeric and categorical kinds.
//!
//! The kind of a column is decided exactly once, when the column enters a
//! [`Dataset`](crate::dataset::Dataset), and travels with the column's value
//! container from then on. Downstream analyzers match on the container instead
//! of inspecting storage types again.

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of column the analyzers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Values support arithmetic (integers, floating point, decimals)
    Numeric,
    /// Values are discrete labels (strings, booleans, dates, ...)
    Categorical,
}

impl ColumnKind {
    /// Classifies a column from its storage type and non-missing value count.
    ///
    /// A column with no non-missing values carries no evidence of numeric
    /// intent and is classified as categorical.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arrow::datatypes::DataType;
    /// use term_eda::analyzers::ColumnKind;
    ///
    /// assert_eq!(ColumnKind::classify(&DataType::Int64, 3), ColumnKind::Numeric);
    /// assert_eq!(ColumnKind::classify(&DataType::Utf8, 3), ColumnKind::Categorical);
    /// assert_eq!(ColumnKind::classify(&DataType::Float64, 0), ColumnKind::Categorical);
    /// ```
    pub fn classify(data_type: &DataType, non_missing: usize) -> Self {
        if non_missing > 0 && Self::supports_arithmetic(data_type) {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }

    /// Returns true when the Arrow storage type holds arithmetic values.
    pub fn supports_arithmetic(data_type: &DataType) -> bool {
        match data_type {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float16
            | DataType::Float32
            | DataType::Float64
            | DataType::Decimal128(_, _)
            | DataType::Decimal256(_, _) => true,
            DataType::Dictionary(_, value_type) => Self::supports_arithmetic(value_type),
            _ => false,
        }
    }

    /// Returns true for [`ColumnKind::Numeric`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Returns the lowercase name used in printed tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
