//! File sources that load a [`Dataset`] through DataFusion.
//!
//! CSV, Parquet and newline-delimited JSON are supported, each from a single
//! path, a list of paths or glob patterns. Compressed CSV and JSON files are
//! detected from their extension.

use crate::dataset::Dataset;
use crate::prelude::*;
use async_trait::async_trait;
use datafusion::datasource::file_format::file_compression_type::FileCompressionType;
use datafusion::prelude::DataFrame;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, instrument};

mod csv;
mod json;
mod parquet;

pub use csv::{CsvOptions, CsvSource};
pub use json::{JsonOptions, JsonSource};
pub use parquet::ParquetSource;

/// A source that can materialize its rows as a [`Dataset`].
///
/// # Examples
///
/// ```rust,no_run
/// use term_eda::sources::{CsvSource, DataSource};
///
/// # async fn example() -> term_eda::prelude::Result<()> {
/// let source = CsvSource::new("data/users.csv")?;
/// let dataset = source.load().await?;
/// println!("{}: {} rows", source.description(), dataset.n_rows());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DataSource: Debug + Send + Sync {
    /// Reads every file of the source and builds the dataset.
    async fn load(&self) -> Result<Dataset>;

    /// Files read by this source.
    fn paths(&self) -> &[String];

    /// Returns a human-readable description of this data source.
    fn description(&self) -> String;
}

/// Common compression formats supported by file sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    /// No compression
    None,
    /// Gzip compression
    Gzip,
    /// Zstandard compression
    Zstd,
    /// Bzip2 compression
    Bzip2,
    /// XZ compression
    Xz,
    /// Automatic detection based on file extension
    Auto,
}

impl CompressionType {
    /// Detects compression type from file path extension.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_lowercase();
        if lower.ends_with(".gz") || lower.ends_with(".gzip") {
            Self::Gzip
        } else if lower.ends_with(".zst") || lower.ends_with(".zstd") {
            Self::Zstd
        } else if lower.ends_with(".bz2") || lower.ends_with(".bzip2") {
            Self::Bzip2
        } else if lower.ends_with(".xz") {
            Self::Xz
        } else {
            Self::None
        }
    }

    /// Returns the file extension for this compression type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::None | Self::Auto => "",
            Self::Gzip => ".gz",
            Self::Zstd => ".zst",
            Self::Bzip2 => ".bz2",
            Self::Xz => ".xz",
        }
    }

    /// Resolves `Auto` against `path`.
    pub fn resolve(self, path: &str) -> Self {
        match self {
            Self::Auto => Self::from_path(path),
            other => other,
        }
    }

    pub(crate) fn to_datafusion(self) -> FileCompressionType {
        match self {
            Self::Gzip => FileCompressionType::GZIP,
            Self::Zstd => FileCompressionType::ZSTD,
            Self::Bzip2 => FileCompressionType::BZIP2,
            Self::Xz => FileCompressionType::XZ,
            Self::None | Self::Auto => FileCompressionType::UNCOMPRESSED,
        }
    }
}

/// The file format a path is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
    Json,
}

impl FileFormat {
    /// Picks the format from the extension, ignoring a compression suffix.
    ///
    /// `.csv`, `.tsv` and `.txt` are CSV, `.parquet` is Parquet and `.json`,
    /// `.jsonl` and `.ndjson` are newline-delimited JSON.
    pub fn from_path(path: &str) -> Result<Self> {
        let lower = path.to_lowercase();
        let compression = CompressionType::from_path(&lower);
        let stem = &lower[..lower.len() - compression_suffix_len(&lower, compression)];

        match Path::new(stem).extension().and_then(|ext| ext.to_str()) {
            Some("csv" | "tsv" | "txt") => Ok(Self::Csv),
            Some("parquet") => Ok(Self::Parquet),
            Some("json" | "jsonl" | "ndjson") => Ok(Self::Json),
            Some(other) => Err(EdaError::UnsupportedFormat {
                format: other.to_string(),
            }),
            None => Err(EdaError::UnsupportedFormat {
                format: path.to_string(),
            }),
        }
    }
}

fn compression_suffix_len(lower: &str, compression: CompressionType) -> usize {
    if compression == CompressionType::None {
        return 0;
    }
    lower.rfind('.').map(|idx| lower.len() - idx).unwrap_or(0)
}

/// Loads a single file, picking the source from its extension.
///
/// A path containing glob characters is expanded first; every match must
/// share the first match's extension, compression suffix included. Files
/// whose own extension is `.tsv` are read tab-delimited.
///
/// # Errors
///
/// Returns [`EdaError::UnsupportedFormat`] for unknown extensions,
/// [`EdaError::Configuration`] when glob matches mix extensions and
/// [`EdaError::DataSource`] when the file is missing or cannot be read.
#[instrument(skip(csv_options))]
pub async fn load_path(path: &str, csv_options: &CsvOptions) -> Result<Dataset> {
    let paths = if is_glob(path) {
        expand_globs(&[path.to_string()]).await?
    } else if Path::new(path).is_file() {
        vec![path.to_string()]
    } else {
        return Err(EdaError::data_source(
            "file",
            format!("File not found: {path}"),
        ));
    };

    let format = FileFormat::from_path(&paths[0])?;
    let extension = full_extension(&paths[0]).to_lowercase();
    if let Some(other) = paths
        .iter()
        .find(|p| full_extension(p).to_lowercase() != extension)
    {
        return Err(EdaError::Configuration(format!(
            "Matched files mix extensions: {} and {other}",
            paths[0]
        )));
    }
    debug!(?format, files = paths.len(), "Dispatching file source");

    match format {
        FileFormat::Csv => {
            let mut options = csv_options.clone();
            if is_tsv(&paths[0]) {
                options.delimiter = b'\t';
            }
            CsvSource::from_paths(paths)?
                .with_custom_options(options)
                .load()
                .await
        }
        FileFormat::Parquet => ParquetSource::from_paths(paths)?.load().await,
        FileFormat::Json => JsonSource::from_paths(paths)?.load().await,
    }
}

/// True when the file name's own extension is `.tsv`, compressed or not.
fn is_tsv(path: &str) -> bool {
    full_extension(path).to_lowercase().starts_with(".tsv")
}

fn is_glob(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Utility function to expand glob patterns into file paths.
pub(crate) async fn expand_globs(patterns: &[String]) -> Result<Vec<String>> {
    use glob::glob;

    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob(pattern).map_err(|e| {
            EdaError::Configuration(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        for entry in matches {
            let path = entry.map_err(|e| EdaError::Io(std::io::Error::other(e)))?;

            if path.is_file() {
                if let Some(path_str) = path.to_str() {
                    paths.push(path_str.to_string());
                }
            }
        }
    }

    if paths.is_empty() {
        return Err(EdaError::data_source(
            "file",
            "No files found matching glob patterns",
        ));
    }

    Ok(paths)
}

/// Full extension of `path` including any compression suffix, e.g. `.csv.gz`.
pub(crate) fn full_extension(path: &str) -> String {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);
    let compression = CompressionType::from_path(file_name);
    let cut = compression_suffix_len(&file_name.to_lowercase(), compression);
    let (stem, suffix) = file_name.split_at(file_name.len() - cut);

    let base = Path::new(stem)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("{base}{suffix}")
}

/// Executes the plan and converts the collected batches.
pub(crate) async fn collect_dataset(df: DataFrame, source_type: &str) -> Result<Dataset> {
    let schema = df.schema().inner().clone();
    let batches = df.collect().await.map_err(|e| {
        EdaError::data_source_with_source(source_type, "Failed to read rows", Box::new(e))
    })?;
    debug!(batches = batches.len(), "Collected record batches");
    Dataset::from_batches(schema, &batches)
}

/// Wraps a DataFusion planning error for `paths`.
pub(crate) fn read_error(
    source_type: &str,
    paths: &[String],
    err: datafusion::error::DataFusionError,
) -> EdaError {
    EdaError::data_source_with_source(
        source_type,
        format!("Failed to open {}", paths.join(", ")),
        Box::new(err),
    )
}

pub(crate) fn require_paths(paths: Vec<String>) -> Result<Vec<String>> {
    if paths.is_empty() {
        return Err(EdaError::Configuration(
            "At least one path must be provided".to_string(),
        ));
    }
    Ok(paths)
}
