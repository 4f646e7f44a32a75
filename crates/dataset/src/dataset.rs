//! Dense, trainer-ready feature tables.

use std::path::{Path, PathBuf};

use mlstock_primitives::columns::{TARGET, TRADE_DATE, TS_CODE};
use mlstock_utils::{ensure_columns, float_values, normalize_missing, string_values};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use tracing::info;

use crate::{DatasetError, StageReport, filter::filter_dense};

/// Final output of the pipeline.
///
/// The table holds `[ts_code, trade_date, target, factors...]` with no
/// missing value in `target` or any factor, and unique keys.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: DataFrame,
    feature_names: Vec<String>,
    path: Option<PathBuf>,
    reports: Vec<StageReport>,
}

impl Dataset {
    /// Wrap a dense table, reordering its columns.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if a column is absent, or
    /// `DatasetError::NotDense` if `target` or a factor has a missing value.
    pub fn new(table: DataFrame, feature_names: Vec<String>) -> Result<Self, DatasetError> {
        let table = select_layout(table, &feature_names)?;

        for name in std::iter::once(TARGET).chain(feature_names.iter().map(String::as_str)) {
            let missing = table.column(name)?.null_count();
            if missing > 0 {
                return Err(DatasetError::NotDense { column: name.to_string(), missing });
            }
        }

        Ok(Self { table, feature_names, path: None, reports: Vec::new() })
    }

    /// Rebuild from a persisted table, dropping rows that are not complete.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if a column is absent.
    pub fn from_persisted(
        table: DataFrame,
        feature_names: Vec<String>,
        path: &Path,
    ) -> Result<Self, DatasetError> {
        ensure_columns(&table, &[TS_CODE, TRADE_DATE, TARGET])?;
        let table = normalize_missing(table, &[TARGET])?;
        let table = normalize_missing(table, &feature_names)?;
        let (table, report) = filter_dense(table, &feature_names)?;
        if report.rows_removed() > 0 {
            info!(path = %path.display(), rows_removed = report.rows_removed(), "dropped incomplete persisted rows");
        }

        Ok(Self::new(table, feature_names)?.with_path(path.to_path_buf()))
    }

    pub(crate) fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    pub(crate) fn with_reports(mut self, reports: Vec<StageReport>) -> Self {
        self.reports = reports;
        self
    }

    /// Ordered factor names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Underlying table.
    #[must_use]
    pub const fn table(&self) -> &DataFrame {
        &self.table
    }

    /// Where the table was persisted, if it was.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Per-stage removal reports of the run that built this dataset.
    #[must_use]
    pub fn reports(&self) -> &[StageReport] {
        &self.reports
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.height()
    }

    /// Whether the dataset has no observation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.height() == 0
    }

    /// Feature matrix, one row per observation and one column per factor.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if a factor column is gone.
    pub fn features(&self) -> Result<Array2<f64>, DatasetError> {
        let mut matrix = Array2::zeros((self.len(), self.feature_names.len()));
        for (j, name) in self.feature_names.iter().enumerate() {
            for (i, v) in float_values(&self.table, name)?.into_iter().enumerate() {
                matrix[[i, j]] = v.unwrap_or(f64::NAN);
            }
        }
        Ok(matrix)
    }

    /// Label vector.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if `target` is gone.
    pub fn target(&self) -> Result<Array1<f64>, DatasetError> {
        Ok(float_values(&self.table, TARGET)?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Trade date of every observation.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if `trade_date` is gone.
    pub fn trade_dates(&self) -> Result<Vec<String>, DatasetError> {
        Ok(string_values(&self.table, TRADE_DATE)?)
    }

    /// Consume the dataset and return the table.
    #[must_use]
    pub fn into_table(self) -> DataFrame {
        self.table
    }
}

/// Project `df` onto `[ts_code, trade_date, target, factors...]`.
fn select_layout(df: DataFrame, feature_names: &[String]) -> Result<DataFrame, DatasetError> {
    ensure_columns(&df, &[TS_CODE, TRADE_DATE, TARGET])?;
    ensure_columns(&df, feature_names)?;

    let mut layout = vec![col(TS_CODE), col(TRADE_DATE), col(TARGET)];
    layout.extend(feature_names.iter().map(|f| col(f.as_str())));
    Ok(df.lazy().select(layout).collect()?)
}
