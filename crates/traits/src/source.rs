//! Data source and feature store trait definitions.

use std::path::{Path, PathBuf};

use mlstock_primitives::TradeDate;
use polars::prelude::*;

/// Errors raised by data sources and feature stores.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Input file does not exist.
    #[error("data file not found: {0}")]
    NotFound(PathBuf),

    /// Underlying I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Input lacks a required column.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Input is present but malformed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Supplier of raw weekly series.
///
/// Implementations decide where the data lives; the pipeline only sees
/// materialized frames.
pub trait DataSource {
    /// Load the per-stock weekly table for `[start, end]`.
    ///
    /// The frame carries `ts_code`, `trade_date`, `pct_chg`, `list_date` and
    /// one column per name in `factor_names`.
    ///
    /// # Errors
    /// Returns `SourceError` if the data cannot be read or lacks a column.
    fn load_weekly(
        &self,
        start: TradeDate,
        end: TradeDate,
        factor_names: &[String],
    ) -> Result<DataFrame, SourceError>;

    /// Load the benchmark series (`trade_date`, `pct_chg`) for `[start, end]`.
    ///
    /// # Errors
    /// Returns `SourceError` if the data cannot be read or lacks a column.
    fn load_benchmark(&self, start: TradeDate, end: TradeDate) -> Result<DataFrame, SourceError>;

    /// Returns the name of this source.
    fn name(&self) -> &str;
}

/// Durable storage for processed feature tables.
pub trait FeatureStore {
    /// Persist `df` under a name that encodes `name`, the date range and the
    /// generation time; returns the written path.
    ///
    /// # Errors
    /// Returns `SourceError` if the table cannot be written.
    fn persist(
        &self,
        name: &str,
        start: TradeDate,
        end: TradeDate,
        df: &mut DataFrame,
    ) -> Result<PathBuf, SourceError>;

    /// Load a persisted table and the ordered feature names it carries.
    ///
    /// # Errors
    /// Returns `SourceError` if the file is missing or malformed.
    fn load(&self, path: &Path) -> Result<(DataFrame, Vec<String>), SourceError>;
}
