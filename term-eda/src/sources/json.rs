//! Newline-delimited JSON file source implementation.

use super::{
    collect_dataset, full_extension, read_error, require_paths, CompressionType, DataSource,
};
use crate::dataset::Dataset;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::prelude::{NdJsonReadOptions, SessionContext};
use tracing::{info, instrument};

/// Options for configuring JSON file reading.
#[derive(Debug, Clone)]
pub struct JsonOptions {
    /// Maximum records to read for schema inference
    pub schema_infer_max_records: usize,
    /// Compression type (default: Auto)
    pub compression: CompressionType,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            schema_infer_max_records: 1000,
            compression: CompressionType::Auto,
        }
    }
}

/// A newline-delimited JSON source: one object per line, keys become columns.
#[derive(Debug, Clone)]
pub struct JsonSource {
    paths: Vec<String>,
    options: JsonOptions,
}

impl JsonSource {
    /// Creates a new JSON source from a single file path.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        Self::with_options(path, JsonOptions::default())
    }

    /// Creates a new JSON source with custom options.
    pub fn with_options(path: impl Into<String>, options: JsonOptions) -> Result<Self> {
        Ok(Self {
            paths: vec![path.into()],
            options,
        })
    }

    /// Creates a JSON source from multiple file paths.
    pub fn from_paths(paths: Vec<String>) -> Result<Self> {
        Ok(Self {
            paths: require_paths(paths)?,
            options: JsonOptions::default(),
        })
    }

    /// Creates a JSON source from a glob pattern.
    pub async fn from_glob(pattern: impl Into<String>) -> Result<Self> {
        let patterns = vec![pattern.into()];
        let paths = super::expand_globs(&patterns).await?;
        Self::from_paths(paths)
    }
}

#[async_trait]
impl DataSource for JsonSource {
    #[instrument(skip(self), fields(source.type = "json", source.files = self.paths.len()))]
    async fn load(&self) -> Result<Dataset> {
        let first = &self.paths[0];
        let extension = full_extension(first);
        let compression = self.options.compression.resolve(first);
        info!(source.paths = ?self.paths, "Loading JSON data source");

        let mut read_options = NdJsonReadOptions::default()
            .file_extension(&extension)
            .file_compression_type(compression.to_datafusion());
        read_options.schema_infer_max_records = self.options.schema_infer_max_records;

        let ctx = SessionContext::new();
        let df = ctx
            .read_json(self.paths.clone(), read_options)
            .await
            .map_err(|e| read_error("JSON", &self.paths, e))?;
        collect_dataset(df, "JSON").await
    }

    fn paths(&self) -> &[String] {
        &self.paths
    }

    fn description(&self) -> String {
        if self.paths.len() == 1 {
            format!("JSON file: {}", self.paths[0])
        } else {
            format!("JSON files: {} files", self.paths.len())
        }
    }
}
