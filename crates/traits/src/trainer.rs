//! Model trainer trait definitions.

use ndarray::{Array1, Array2};

/// Errors that can occur while fitting or applying a model.
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    /// Dimension mismatch in input data.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
        /// Context description.
        context: String,
    },

    /// Insufficient data for fitting.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),
}

impl TrainerError {
    /// Returns whether this error is recoverable.
    ///
    /// A grid search skips candidates that fail recoverably.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientData { .. } | Self::LinearAlgebra(_))
    }
}

/// A fitted model.
pub trait Predictor {
    /// Predict one value per row of `x`.
    ///
    /// # Errors
    /// Returns `TrainerError::DimensionMismatch` if `x` has the wrong width.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainerError>;
}

/// Fits a model on a dense feature matrix and label vector.
pub trait ModelTrainer {
    /// Configuration type for this trainer.
    type Config: Default + Clone;

    /// Fitted model produced by this trainer.
    type Model: Predictor;

    /// Create a trainer with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Fit on `x` (n_samples x n_features) and `y` (n_samples,).
    ///
    /// # Errors
    /// Returns `TrainerError` if dimensions mismatch or fitting fails.
    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self::Model, TrainerError>;

    /// Returns the name of this trainer.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trainer_error_is_recoverable() {
        let err = TrainerError::InsufficientData { required: 10, actual: 5 };
        assert!(err.is_recoverable());

        let err = TrainerError::InvalidConfig("alpha".to_string());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn trainer_error_display() {
        let err = TrainerError::DimensionMismatch {
            expected: 100,
            actual: 50,
            context: "labels".to_string(),
        };
        assert_eq!(err.to_string(), "dimension mismatch for labels: expected 100, got 50");
    }
}
