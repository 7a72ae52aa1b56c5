//! Parquet file source implementation.

use super::{collect_dataset, read_error, require_paths, DataSource};
use crate::dataset::Dataset;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::{ParquetReadOptions, SessionContext};
use tracing::{info, instrument};

/// A Parquet file data source. The schema comes from the file metadata.
///
/// # Examples
///
/// ```rust,no_run
/// use term_eda::sources::{DataSource, ParquetSource};
///
/// # async fn example() -> term_eda::prelude::Result<()> {
/// let dataset = ParquetSource::new("data/events.parquet")?.load().await?;
/// let partitioned = ParquetSource::from_glob("data/year=2023/*.parquet")
///     .await?
///     .load()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ParquetSource {
    paths: Vec<String>,
}

impl ParquetSource {
    /// Creates a new Parquet source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
        })
    }

    /// Creates a Parquet source from multiple file paths.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        Ok(Self {
            paths: require_paths(paths)?,
        })
    }

    /// Creates a Parquet source from a glob pattern.
    pub async fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        let patterns = vec![pattern.into()];
        let paths = super::expand_globs(&patterns).await?;
        Self::from_paths(paths)
    }
}

#[async_trait]
impl DataSource for ParquetSource {
    #[instrument(skip(self), fields(source.type = "parquet", source.files = self.paths.len()))]
    async fn load(&self) -> Result<Dataset> {
        info!(source.paths = ?self.paths, "Loading Parquet data source");

        let ctx = SessionContext::new();
        let df = ctx
            .read_parquet(self.paths.clone(), ParquetReadOptions::default())
            .await
            .map_err(|e| read_error("Parquet", &self.paths, e))?;
        collect_dataset(df, "Parquet").await
    }

    fn paths(&self) -> &[String] {
        &self.paths
    }

    fn description(&self) -> String {
        if self.paths.len() == 1 {
            format!("Parquet file: {}", self.paths[0])
        } else {
            format!("Parquet files: {} files", self.paths.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use ::parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("score", DataType::Float64, true),
            Field::new("label", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![Some(1.5), None, Some(f64::NAN)])),
                Arc::new(StringArray::from(vec![Some("a"), Some("b"), None])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let source = ParquetSource::new(path.to_str().unwrap()).unwrap();
        assert!(source.description().starts_with("Parquet file:"));
        let dataset = source.load().await.unwrap();

        assert_eq!(dataset.n_rows(), 3);
        assert_eq!(dataset.column("score").unwrap().values().missing_count(), 2);
        assert_eq!(dataset.column("label").unwrap().values().missing_count(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.parquet");
        std::fs::write(&path, "not parquet").unwrap();

        let err = ParquetSource::new(path.to_str().unwrap())
            .unwrap()
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, EdaError::DataSource { .. }));
    }
}
