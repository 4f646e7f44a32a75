//! Error types for model training.

use mlstock_dataset::DatasetError;
use mlstock_math::MathError;
use mlstock_primitives::PrimitiveError;
use mlstock_traits::TrainerError;
use mlstock_utils::UtilsError;

/// Errors that can occur while training or persisting a model.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    /// Model fitting error.
    #[error("trainer error: {0}")]
    Trainer(#[from] TrainerError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Dataset error.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// One side of the train/test split has no observation.
    #[error("{0} set is empty")]
    EmptySplit(&'static str),

    /// No grid candidate could be fitted.
    #[error("grid search found no usable penalty")]
    NoCandidate,

    /// Unknown target mode or action.
    #[error("{0}")]
    Parse(String),

    /// Date parsing error.
    #[error("{0}")]
    Primitive(#[from] PrimitiveError),

    /// I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Utility error.
    #[error("utility error: {0}")]
    Utils(#[from] UtilsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(TrainError::EmptySplit("test").to_string(), "test set is empty");

        let err = TrainError::from(TrainerError::InsufficientData { required: 2, actual: 1 });
        assert!(err.to_string().contains("need at least 2"));
    }
}
