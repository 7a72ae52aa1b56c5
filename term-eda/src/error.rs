//! Error types for the term-eda library.
//!
//! All fallible operations return [`Result<T>`], an alias over [`EdaError`].
//! The analysis core only ever fails with [`EdaError::EmptyDataset`]; the
//! remaining variants come from dataset construction and the source layer.

use thiserror::Error;

/// The main error type for term-eda.
#[derive(Error, Debug)]
pub enum EdaError {
    /// The dataset has no columns, so there is nothing to analyze.
    #[error("Dataset has no columns")]
    EmptyDataset,

    /// A column's length differs from the dataset's row count.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column
        column: String,
        /// Row count established by the first column
        expected: usize,
        /// Length of the offending column
        actual: usize,
    },

    /// Two columns share the same name.
    #[error("Duplicate column name '{column}'")]
    DuplicateColumn {
        /// The repeated name
        column: String,
    },

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from data source operations.
    #[error("Data source error ({source_type}): {message}")]
    DataSource {
        /// Type of data source (e.g., "CSV", "Parquet", "JSON")
        source_type: String,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The file extension does not map to a known source.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The extension or format name that was rejected
        format: String,
    },

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// A type alias for `Result<T, EdaError>`.
pub type Result<T> = std::result::Result<T, EdaError>;

impl EdaError {
    /// Creates a new data source error.
    pub fn data_source(source_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new data source error with a source error.
    pub fn data_source_with_source(
        source_type: impl Into<String>,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::DataSource {
            source_type: source_type.into(),
            message: message.into(),
            source: Some(source),
        }
    }
}

impl From<serde_json::Error> for EdaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<EdaError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            EdaError::DataSource {
                source_type,
                message,
                source,
            } => EdaError::DataSource {
                source_type,
                message: format!("{}: {message}", f()),
                source,
            },
            EdaError::Configuration(inner) => {
                EdaError::Configuration(format!("{}: {inner}", f()))
            }
            other => EdaError::Configuration(format!("{}: {other}", f())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EdaError::LengthMismatch {
            column: "age".to_string(),
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Column 'age' has 3 values, expected 4");
        assert_eq!(EdaError::EmptyDataset.to_string(), "Dataset has no columns");
    }

    #[test]
    fn test_context_keeps_data_source_kind() {
        let result: std::result::Result<(), EdaError> =
            Err(EdaError::data_source("CSV", "file missing"));
        let err = result.context("loading users.csv").unwrap_err();
        match err {
            EdaError::DataSource {
                source_type,
                message,
                ..
            } => {
                assert_eq!(source_type, "CSV");
                assert_eq!(message, "loading users.csv: file missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_context_wraps_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let result: std::result::Result<(), std::io::Error> = Err(io);
        let err = result.with_context(|| "reading config".to_string()).unwrap_err();
        assert!(matches!(err, EdaError::Configuration(_)));
        assert!(err.to_string().contains("reading config"));
    }
}
