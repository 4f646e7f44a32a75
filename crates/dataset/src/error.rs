//! Error types for dataset assembly.

use mlstock_math::MathError;
use mlstock_primitives::PrimitiveError;
use mlstock_traits::SourceError;
use mlstock_utils::UtilsError;

/// Errors that can abort a pipeline run.
///
/// Data-quality conditions (missing labels, sparse stocks, constant
/// factors) are not errors; they are handled by the filter and scaling
/// stages.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A declared factor or required column is absent from the input.
    #[error("missing required column: {0}")]
    MissingColumn(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A column that must be dense still holds missing values.
    #[error("column {column} has {missing} missing values")]
    NotDense {
        /// Offending column.
        column: String,
        /// Number of missing entries.
        missing: usize,
    },

    /// Data source or feature store error.
    #[error("storage error: {0}")]
    Source(#[from] SourceError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Primitive parsing error.
    #[error("{0}")]
    Primitive(#[from] PrimitiveError),

    /// Utility error.
    #[error("data utility error: {0}")]
    Utils(UtilsError),

    /// Polars error.
    #[error("data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl From<UtilsError> for DatasetError {
    fn from(err: UtilsError) -> Self {
        match err {
            UtilsError::MissingColumn(name) => Self::MissingColumn(name),
            UtilsError::Polars(e) => Self::Polars(e),
            other => Self::Utils(other),
        }
    }
}

impl DatasetError {
    /// Returns whether the input schema, rather than the data or the
    /// environment, caused the failure.
    #[must_use]
    pub const fn is_schema_error(&self) -> bool {
        matches!(self, Self::MissingColumn(_) | Self::Source(SourceError::MissingColumn(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::MissingColumn("mom_12w".to_string());
        assert!(err.to_string().contains("mom_12w"));

        let err = DatasetError::NotDense { column: "target".to_string(), missing: 3 };
        assert_eq!(err.to_string(), "column target has 3 missing values");
    }

    #[test]
    fn utils_missing_column_is_schema_error() {
        let err = DatasetError::from(UtilsError::MissingColumn("f".to_string()));
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "f"));
        assert!(err.is_schema_error());

        let err = DatasetError::InvalidConfig("x".to_string());
        assert!(!err.is_schema_error());
    }
}
