//! Ridge regression and ridge classification.

use mlstock_math::{MathError, ridge_regression};
use mlstock_traits::{ModelTrainer, Predictor, TrainerError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Ridge penalty configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RidgeConfig {
    /// L2 penalty on the coefficients.
    pub alpha: f64,
    /// Whether to fit an unpenalized intercept.
    pub fit_intercept: bool,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self { alpha: 1.0, fit_intercept: true }
    }
}

impl RidgeConfig {
    /// Configuration with penalty `alpha`.
    #[must_use]
    pub fn with_alpha(alpha: f64) -> Self {
        Self { alpha, ..Self::default() }
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `TrainerError::InvalidConfig` unless `alpha` is finite and
    /// non-negative.
    pub fn validate(&self) -> Result<(), TrainerError> {
        if !self.alpha.is_finite() || self.alpha < 0.0 {
            return Err(TrainerError::InvalidConfig(format!(
                "ridge alpha {} must be finite and non-negative",
                self.alpha
            )));
        }
        Ok(())
    }
}

fn trainer_error(err: MathError) -> TrainerError {
    match err {
        MathError::DimensionMismatch { expected, actual } => {
            TrainerError::DimensionMismatch { expected, actual, context: "labels".to_string() }
        }
        MathError::EmptyData => TrainerError::InsufficientData { required: 1, actual: 0 },
        MathError::InvalidPenalty(alpha) => {
            TrainerError::InvalidConfig(format!("invalid ridge penalty {alpha}"))
        }
        other => TrainerError::LinearAlgebra(other.to_string()),
    }
}

/// Linear model `y = x . coefficients + intercept`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// One coefficient per feature.
    pub coefficients: Vec<f64>,
    /// Intercept.
    pub intercept: f64,
    /// In-sample R-squared of the fit.
    pub r_squared: f64,
}

impl LinearModel {
    /// Raw linear score of every row.
    ///
    /// # Errors
    /// Returns `TrainerError::DimensionMismatch` if `x` has the wrong width.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainerError> {
        if x.ncols() != self.coefficients.len() {
            return Err(TrainerError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: x.ncols(),
                context: "features".to_string(),
            });
        }
        let beta = Array1::from_vec(self.coefficients.clone());
        Ok(x.dot(&beta) + self.intercept)
    }
}

impl Predictor for LinearModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainerError> {
        self.decision_function(x)
    }
}

/// Ridge regression trainer.
#[derive(Debug, Clone, Default)]
pub struct RidgeRegressor {
    config: RidgeConfig,
}

impl RidgeRegressor {
    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &RidgeConfig {
        &self.config
    }
}

impl ModelTrainer for RidgeRegressor {
    type Config = RidgeConfig;
    type Model = LinearModel;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self::Model, TrainerError> {
        self.config.validate()?;
        let solution = ridge_regression(x, y, self.config.alpha, self.config.fit_intercept)
            .map_err(trainer_error)?;

        Ok(LinearModel {
            coefficients: solution.coefficients.to_vec(),
            intercept: solution.intercept,
            r_squared: solution.r_squared,
        })
    }

    fn name(&self) -> &str {
        "ridge"
    }
}

/// Binary classifier predicting `1` where the linear score is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    /// Score model fitted on `-1/+1` labels.
    pub linear: LinearModel,
}

impl Predictor for LinearClassifier {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainerError> {
        Ok(self.linear.decision_function(x)?.mapv(|s| if s > 0.0 { 1.0 } else { 0.0 }))
    }
}

/// Ridge classifier for `0/1` labels.
///
/// Labels are recoded to `-1/+1`, regressed with ridge, and predictions
/// threshold the score at zero.
#[derive(Debug, Clone, Default)]
pub struct RidgeClassifier {
    config: RidgeConfig,
}

impl ModelTrainer for RidgeClassifier {
    type Config = RidgeConfig;
    type Model = LinearClassifier;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn fit(&self, x: &Array2<f64>, y: &Array1<f64>) -> Result<Self::Model, TrainerError> {
        let signed = y.mapv(|v| if v > 0.0 { 1.0 } else { -1.0 });
        let linear = RidgeRegressor::with_config(self.config).fit(x, &signed)?;
        Ok(LinearClassifier { linear })
    }

    fn name(&self) -> &str {
        "ridge_classifier"
    }
}
