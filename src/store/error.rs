use std::path::PathBuf;
use thiserror::Error;

/// Errors that make the dataset store unavailable.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The dataset file does not exist.
    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),

    /// The designated timestamp column is absent from the header row.
    #[error("dataset column '{0}' is missing")]
    MissingColumn(String),

    /// The file could not be parsed as CSV.
    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    /// Reading or writing the file failed.
    #[error("dataset I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
