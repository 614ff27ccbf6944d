use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults surfaced to the caller. Missing measurements are never errors;
/// they travel as `None` values.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required columns are absent from a loaded dataset.
    #[error("{dataset} dataset is missing columns: {}", .missing.join(", "))]
    Schema {
        dataset: &'static str,
        missing: Vec<String>,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("parquet error in {path}: {source}")]
    Parquet {
        path: PathBuf,
        source: parquet::errors::ParquetError,
    },
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Columns named by a schema fault, empty for every other kind.
    pub fn missing_columns(&self) -> &[String] {
        match self {
            Error::Schema { missing, .. } => missing,
            _ => &[],
        }
    }
}
