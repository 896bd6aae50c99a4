use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to determine user data directory")]
    DataDirResolution,

    #[error("Path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid collection name '{0}': use letters, digits and underscores")]
    InvalidCollectionName(String),

    #[error("Database error on '{0}'")]
    Database(PathBuf, #[source] rusqlite::Error),

    #[error("Failed to encode record as JSON")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to build table from records")]
    TableBuild(#[source] PolarsError),

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),
}
