//! Data pipeline error types
//!
//! Defines all errors that can occur while loading or reshaping source tables.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the data pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A database file, CSV directory or CSV file does not exist
    #[error("Storage not found: {0:?}")]
    StorageNotFound(PathBuf),

    /// The source exists but holds no usable tables
    #[error("Storage format error: {0}")]
    StorageFormat(String),

    /// A required column is absent or holds the wrong kind of value
    #[error("Schema error: {0}")]
    Schema(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<rusqlite::Error> for PipelineError {
    fn from(err: rusqlite::Error) -> Self {
        PipelineError::StorageFormat(err.to_string())
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
