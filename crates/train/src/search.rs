//! Cross-validated grid search over the ridge penalty.

use mlstock_traits::{ModelTrainer, Predictor};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, warn};

use crate::{RidgeConfig, TrainError};

/// Contiguous, unshuffled k-fold index pairs `(train, validation)`.
///
/// The first `n % k` folds get one extra observation.
#[must_use]
pub fn kfold_indices(n: usize, k: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    if k < 2 || n < k {
        return Vec::new();
    }

    let base = n / k;
    let extra = n % k;
    let mut start = 0;
    (0..k)
        .map(|fold| {
            let size = base + usize::from(fold < extra);
            let end = start + size;
            let validation: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n).collect();
            start = end;
            (train, validation)
        })
        .collect()
}

/// Penalty chosen by the search and the score of every candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Best penalty.
    pub best_alpha: f64,
    /// Mean validation score of the best penalty.
    pub best_score: f64,
    /// `(alpha, mean validation score)` for every candidate that fitted.
    pub scores: Vec<(f64, f64)>,
}

/// Grid search configuration.
#[derive(Debug, Clone)]
pub struct GridSearch {
    alphas: Vec<f64>,
    folds: usize,
    fit_intercept: bool,
}

impl GridSearch {
    /// Create a search over `alphas` with `folds`-fold validation.
    ///
    /// # Errors
    /// Returns `TrainError::InvalidConfig` if the grid is empty, a penalty
    /// is negative or not finite, or `folds < 2`.
    pub fn new(alphas: Vec<f64>, folds: usize) -> Result<Self, TrainError> {
        if alphas.is_empty() {
            return Err(TrainError::InvalidConfig("empty penalty grid".to_string()));
        }
        if let Some(bad) = alphas.iter().find(|a| !a.is_finite() || **a < 0.0) {
            return Err(TrainError::InvalidConfig(format!("invalid penalty {bad}")));
        }
        if folds < 2 {
            return Err(TrainError::InvalidConfig(format!("need at least 2 folds, got {folds}")));
        }
        Ok(Self { alphas, folds, fit_intercept: true })
    }

    /// Set whether candidates fit an intercept.
    #[must_use]
    pub const fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Score every penalty with trainer `T` and return the best.
    ///
    /// `score` maps `(truth, prediction)` to a value where higher is
    /// better. Candidates failing with a recoverable error are skipped.
    ///
    /// # Errors
    /// Returns `TrainError::InvalidConfig` if there are fewer observations
    /// than folds, `TrainError::Trainer` on an unrecoverable fit error, or
    /// `TrainError::NoCandidate` if every candidate failed.
    pub fn run<T, F>(&self, x: &Array2<f64>, y: &Array1<f64>, score: F) -> Result<SearchResult, TrainError>
    where
        T: ModelTrainer<Config = RidgeConfig>,
        F: Fn(&Array1<f64>, &Array1<f64>) -> f64,
    {
        let folds = kfold_indices(y.len(), self.folds);
        if folds.is_empty() {
            return Err(TrainError::InvalidConfig(format!(
                "{} observations cannot fill {} folds",
                y.len(),
                self.folds
            )));
        }

        let mut scores = Vec::with_capacity(self.alphas.len());
        'alphas: for &alpha in &self.alphas {
            let trainer = T::with_config(RidgeConfig { alpha, fit_intercept: self.fit_intercept });

            let mut total = 0.0;
            for (train, validation) in &folds {
                let x_fit = x.select(Axis(0), train);
                let y_fit = y.select(Axis(0), train);
                let x_val = x.select(Axis(0), validation);
                let y_val = y.select(Axis(0), validation);

                let prediction = match trainer.fit(&x_fit, &y_fit).and_then(|m| m.predict(&x_val)) {
                    Ok(p) => p,
                    Err(e) if e.is_recoverable() => {
                        warn!(trainer = trainer.name(), alpha, error = %e, "skipping penalty");
                        continue 'alphas;
                    }
                    Err(e) => return Err(e.into()),
                };
                total += score(&y_val, &prediction);
            }

            let mean = total / folds.len() as f64;
            debug!(trainer = trainer.name(), alpha, score = mean, "cross-validated");
            scores.push((alpha, mean));
        }

        let (best_alpha, best_score) = scores
            .iter()
            .copied()
            .fold(None, |best: Option<(f64, f64)>, cand| match best {
                Some(b) if b.1 >= cand.1 => Some(b),
                _ => Some(cand),
            })
            .ok_or(TrainError::NoCandidate)?;

        Ok(SearchResult { best_alpha, best_score, scores })
    }
}
