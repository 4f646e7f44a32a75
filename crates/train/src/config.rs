//! Training configuration.

use std::path::PathBuf;

use mlstock_primitives::{TradeDate, columns::TRAIN_TEST_SPLIT_DATE};

use crate::TrainError;

/// Default number of cross-validation folds.
pub const DEFAULT_FOLDS: usize = 5;

/// Default ridge penalty grid.
pub const DEFAULT_ALPHAS: [f64; 6] = [0.01, 0.1, 1.0, 10.0, 100.0, 1000.0];

/// Configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Observations dated before this train, the rest test.
    pub split_date: TradeDate,
    /// Cross-validation folds of the grid search.
    pub folds: usize,
    /// Ridge penalties searched.
    pub alphas: Vec<f64>,
    /// Whether models fit an intercept.
    pub fit_intercept: bool,
    /// Directory receiving the model files.
    pub output_dir: PathBuf,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            split_date: TradeDate::parse(TRAIN_TEST_SPLIT_DATE).unwrap_or_default(),
            folds: DEFAULT_FOLDS,
            alphas: DEFAULT_ALPHAS.to_vec(),
            fit_intercept: true,
            output_dir: PathBuf::from("model"),
        }
    }
}

impl TrainConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `TrainError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.folds < 2 {
            return Err(TrainError::InvalidConfig(format!(
                "need at least 2 folds, got {}",
                self.folds
            )));
        }
        if self.alphas.is_empty() {
            return Err(TrainError::InvalidConfig("empty penalty grid".to_string()));
        }
        if let Some(bad) = self.alphas.iter().find(|a| !a.is_finite() || **a < 0.0) {
            return Err(TrainError::InvalidConfig(format!("invalid penalty {bad}")));
        }
        Ok(())
    }
}
