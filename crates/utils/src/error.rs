//! Error types for utility functions.

use std::path::PathBuf;

/// Errors that can occur during utility operations.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// File does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),
}
