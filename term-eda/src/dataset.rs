//! In-memory tabular dataset analyzed by term-eda.
//!
//! A [`Dataset`] is an ordered list of named, equally long columns. Every
//! column holds optional values of one kind, numeric or categorical, and the
//! kind is fixed when the column is built (see [`ColumnKind::classify`]).
//! Missing entries are `None`; floating point NaN read from a source is
//! treated as missing at ingestion.
//!
//! # Examples
//!
//! ```rust
//! use term_eda::dataset::Dataset;
//!
//! let dataset = Dataset::builder()
//!     .integers("age", vec![Some(10), Some(20), Some(30), None])
//!     .categorical("city", vec![Some("A"), Some("B"), Some("A"), None])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(dataset.n_rows(), 4);
//! assert_eq!(dataset.n_cols(), 2);
//! ```

use crate::analyzers::ColumnKind;
use crate::error::{EdaError, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use std::collections::HashSet;
use tracing::debug;

/// Values of a single column, tagged with the column's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Arithmetic values
    Numeric(Vec<Option<f64>>),
    /// Discrete labels
    Categorical(Vec<Option<String>>),
}

impl ColumnValues {
    /// Returns the kind carried by this container.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Categorical(_) => ColumnKind::Categorical,
        }
    }

    /// Number of entries, missing ones included.
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Categorical(values) => values.len(),
        }
    }

    /// Returns true if the column has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing entries.
    pub fn missing_count(&self) -> usize {
        match self {
            Self::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::Categorical(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Number of non-missing entries.
    pub fn non_missing_count(&self) -> usize {
        self.len() - self.missing_count()
    }
}

/// A named column of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: String,
    values: ColumnValues,
}

impl Column {
    /// Creates a floating point column. NaN is stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|v| !v.is_nan()))
            .collect();
        Self::classified(name.into(), &DataType::Float64, values)
    }

    /// Creates an integer column.
    pub fn integers(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        let values = values.into_iter().map(|v| v.map(|v| v as f64)).collect();
        Self::classified(name.into(), &DataType::Int64, values)
    }

    /// Creates a categorical column of string labels.
    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self {
            name: name.into(),
            dtype: DataType::Utf8.to_string(),
            values: ColumnValues::Categorical(
                values.into_iter().map(|v| v.map(Into::into)).collect(),
            ),
        }
    }

    /// Builds a column from an Arrow array, classifying it by storage type.
    pub fn from_array(name: impl Into<String>, array: &ArrayRef) -> Result<Self> {
        let name = name.into();
        let data_type = array.data_type();

        if ColumnKind::supports_arithmetic(data_type) {
            let as_f64 = arrow::compute::cast(array, &DataType::Float64)?;
            let values = as_f64
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.filter(|v| !v.is_nan()))
                .collect();
            return Ok(Self::classified(name, data_type, values));
        }

        let values = if matches!(data_type, DataType::Null) {
            vec![None; array.len()]
        } else {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)?;
            (0..array.len())
                .map(|i| (!array.is_null(i)).then(|| formatter.value(i).to_string()))
                .collect()
        };

        Ok(Self {
            name,
            dtype: data_type.to_string(),
            values: ColumnValues::Categorical(values),
        })
    }

    fn classified(name: String, data_type: &DataType, values: Vec<Option<f64>>) -> Self {
        let non_missing = values.iter().filter(|v| v.is_some()).count();
        let values = match ColumnKind::classify(data_type, non_missing) {
            ColumnKind::Numeric => ColumnValues::Numeric(values),
            ColumnKind::Categorical => ColumnValues::Categorical(vec![None; values.len()]),
        };
        Self {
            name,
            dtype: data_type.to_string(),
            values,
        }
    }

    /// Overrides the storage type name shown in summaries.
    pub fn with_dtype(mut self, dtype: impl Into<String>) -> Self {
        self.dtype = dtype.into();
        self
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage type name, e.g. `Int64` or `Utf8`.
    pub fn dtype(&self) -> &str {
        &self.dtype
    }

    /// Kind decided at construction.
    pub fn kind(&self) -> ColumnKind {
        self.values.kind()
    }

    /// The column's values.
    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    /// Number of entries, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Creates a dataset, checking column lengths and name uniqueness.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if column.len() != n_rows {
                return Err(EdaError::LengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    actual: column.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(EdaError::DuplicateColumn {
                    column: column.name.clone(),
                });
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Starts building a dataset column by column.
    pub fn builder() -> DatasetBuilder {
        DatasetBuilder::default()
    }

    /// Converts a single record batch.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let columns = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, array)| Column::from_array(field.name().clone(), array))
            .collect::<Result<Vec<_>>>()?;

        let dataset = Self::new(columns)?;
        debug!(
            rows = dataset.n_rows,
            columns = dataset.n_cols(),
            "Converted record batch into dataset"
        );
        Ok(dataset)
    }

    /// Concatenates record batches sharing `schema` into one dataset.
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = arrow::compute::concat_batches(&schema, batches)?;
        Self::from_record_batch(&batch)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns true when the dataset has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in dataset order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in dataset order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.columns.is_empty() {
            Err(EdaError::EmptyDataset)
        } else {
            Ok(())
        }
    }
}

/// Fluent builder for [`Dataset`].
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    columns: Vec<Column>,
}

impl DatasetBuilder {
    /// Appends a prepared column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a floating point column.
    pub fn numeric(self, name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        self.column(Column::numeric(name, values))
    }

    /// Appends an integer column.
    pub fn integers(self, name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        self.column(Column::integers(name, values))
    }

    /// Appends a categorical column.
    pub fn categorical<S: Into<String>>(
        self,
        name: impl Into<String>,
        values: Vec<Option<S>>,
    ) -> Self {
        self.column(Column::categorical(name, values))
    }

    /// Validates and builds the dataset.
    pub fn build(self) -> Result<Dataset> {
        Dataset::new(self.columns)
    }
}
