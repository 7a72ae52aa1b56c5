//! CSV file source implementation.

use super::{collect_dataset, full_extension, read_error, require_paths, CompressionType, DataSource};
use crate::dataset::Dataset;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::{CsvReadOptions, SessionContext};
use tracing::{info, instrument};

/// Options for configuring CSV file reading.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Whether the CSV file has a header row
    pub has_header: bool,
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
    /// Extension every file must end with; derived from the first path if None
    pub file_extension: Option<String>,
    /// Compression type (default: Auto)
    pub compression: CompressionType,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            schema_infer_max_records: 1000,
            file_extension: None,
            compression: CompressionType::Auto,
        }
    }
}

impl CsvOptions {
    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the first row holds column names.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }
}

/// A CSV file data source with schema inference and compression support.
///
/// # Examples
///
/// ```rust,no_run
/// use term_eda::sources::{CsvOptions, CsvSource, DataSource};
///
/// # async fn example() -> term_eda::prelude::Result<()> {
/// // Simple CSV file
/// let dataset = CsvSource::new("data/users.csv")?.load().await?;
///
/// // Semicolon separated, no header
/// let options = CsvOptions {
///     delimiter: b';',
///     has_header: false,
///     ..Default::default()
/// };
/// let dataset = CsvSource::with_options("data/users.txt", options)?.load().await?;
///
/// // Multiple files with glob pattern
/// let dataset = CsvSource::from_glob("data/*.csv").await?.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: Vec<String>,
    options: CsvOptions,
}

impl CsvSource {
    /// Creates a new CSV source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    /// Creates a new CSV source with custom options.
    pub fn with_options(path: impl Into<String>, options: CsvOptions) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options,
        })
    }

    /// Creates a CSV source from multiple file paths.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        Ok(Self {
            paths: require_paths(paths)?,
            options: CsvOptions::default(),
        })
    }

    /// Creates a CSV source from a glob pattern.
    pub async fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        let patterns = vec![pattern.into()];
        let paths = super::expand_globs(&patterns).await?;
        Self::from_paths(paths)
    }

    /// Creates a CSV source from multiple glob patterns.
    pub async fn from_globs(patterns: Vec<String>) -> Result<Self> {
        let paths = super::expand_globs(&patterns).await?;
        Self::from_paths(paths)
    }

    /// Sets custom options for this CSV source.
    pub fn with_custom_options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Options used for reading.
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }
}

#[async_trait]
impl DataSource for CsvSource {
    #[instrument(skip(self), fields(
        source.type = "csv",
        source.files = self.paths.len(),
        csv.delimiter = %self.options.delimiter as char,
        csv.has_header = self.options.has_header
    ))]
    async fn load(&self) -> Result<Dataset> {
        let first = &self.paths[0];
        let extension = self
            .options
            .file_extension
            .clone()
            .unwrap_or_else(|| full_extension(first));
        let compression = self.options.compression.resolve(first);

        info!(
            source.paths = ?self.paths,
            csv.compression = ?compression,
            "Loading CSV data source"
        );

        let read_options = CsvReadOptions::new()
            .has_header(self.options.has_header)
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .schema_infer_max_records(self.options.schema_infer_max_records)
            .file_extension(&extension)
            .file_compression_type(compression.to_datafusion());

        let ctx = SessionContext::new();
        let df = ctx
            .read_csv(self.paths.clone(), read_options)
            .await
            .map_err(|e| read_error("CSV", &self.paths, e))?;
        collect_dataset(df, "CSV").await
    }

    fn paths(&self) -> &[String] {
        &self.paths
    }

    fn description(&self) -> String {
        if self.paths.len() == 1 {
            format!("CSV file: {}", self.paths[0])
        } else {
            format!("CSV files: {} files", self.paths.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::ColumnKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_csv() {
        let file = write_file(".csv", "age,height,city\n10,140,A\n20,150,B\n30,160,A\n,170,\n");
        let source = CsvSource::new(file.path().to_str().unwrap()).unwrap();
        let dataset = source.load().await.unwrap();

        assert_eq!(dataset.n_rows(), 4);
        assert_eq!(dataset.column_names(), vec!["age", "height", "city"]);
        assert_eq!(dataset.column("age").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(
            dataset.column("city").unwrap().kind(),
            ColumnKind::Categorical
        );
        assert_eq!(dataset.column("age").unwrap().values().missing_count(), 1);
    }

    #[tokio::test]
    async fn test_load_custom_delimiter() {
        let file = write_file(".txt", "a;b\n1;x\n2;y\n");
        let options = CsvOptions::default().with_delimiter(b';');
        let source = CsvSource::with_options(file.path().to_str().unwrap(), options).unwrap();
        let dataset = source.load().await.unwrap();

        assert_eq!(dataset.n_cols(), 2);
        assert_eq!(dataset.n_rows(), 2);
    }

    #[tokio::test]
    async fn test_from_glob_reads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        for (name, rows) in [("a.csv", "x\n1\n2\n"), ("b.csv", "x\n3\n")] {
            std::fs::write(dir.path().join(name), rows).unwrap();
        }

        let pattern = format!("{}/*.csv", dir.path().display());
        let source = CsvSource::from_glob(pattern).await.unwrap();
        assert_eq!(source.paths().len(), 2);
        assert_eq!(source.description(), "CSV files: 2 files");

        let dataset = source.load().await.unwrap();
        assert_eq!(dataset.n_rows(), 3);
    }

    #[test]
    fn test_from_paths_requires_a_path() {
        assert!(CsvSource::from_paths(vec![]).is_err());
    }
}
