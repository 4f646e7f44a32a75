//! Out-of-sample evaluation metrics.

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Coefficient of determination; `0` when `truth` has no variance.
#[must_use]
pub fn r2_score(truth: &Array1<f64>, pred: &Array1<f64>) -> f64 {
    let mean = truth.mean().unwrap_or(0.0);
    let ss_tot: f64 = truth.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = truth.iter().zip(pred).map(|(t, p)| (t - p).powi(2)).sum();
    if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 }
}

/// Fraction of equal entries; `0` for empty input.
#[must_use]
pub fn accuracy_score(truth: &Array1<f64>, pred: &Array1<f64>) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let hits = truth.iter().zip(pred).filter(|(t, p)| t == p).count();
    hits as f64 / truth.len() as f64
}

/// Regression quality on a test set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Observations scored.
    pub n: usize,
    /// R-squared.
    pub r2: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Fraction of observations where prediction and truth share a sign.
    pub sign_agreement: f64,
}

impl RegressionMetrics {
    /// Score `pred` against `truth`.
    #[must_use]
    pub fn compute(truth: &Array1<f64>, pred: &Array1<f64>) -> Self {
        let n = truth.len();
        if n == 0 {
            return Self { n, r2: 0.0, rmse: 0.0, sign_agreement: 0.0 };
        }

        let mse = truth.iter().zip(pred).map(|(t, p)| (t - p).powi(2)).sum::<f64>() / n as f64;
        let same_sign =
            truth.iter().zip(pred).filter(|(t, p)| (**t > 0.0) == (**p > 0.0)).count();

        Self {
            n,
            r2: r2_score(truth, pred),
            rmse: mse.sqrt(),
            sign_agreement: same_sign as f64 / n as f64,
        }
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} r2={:.4} rmse={:.4} sign_agreement={:.2}%",
            self.n,
            self.r2,
            self.rmse,
            self.sign_agreement * 100.0
        )
    }
}

/// Binary classification quality on a test set, positive class `1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    /// Observations scored.
    pub n: usize,
    /// Fraction predicted correctly.
    pub accuracy: f64,
    /// True positives over predicted positives.
    pub precision: f64,
    /// True positives over actual positives.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
}

impl ClassificationMetrics {
    /// Score `pred` against `truth`; both hold `0/1` labels.
    ///
    /// Undefined ratios are reported as `0`.
    #[must_use]
    pub fn compute(truth: &Array1<f64>, pred: &Array1<f64>) -> Self {
        let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
        for (&t, &p) in truth.iter().zip(pred) {
            match (t > 0.5, p > 0.5) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (true, false) => fn_ += 1,
                (false, false) => {}
            }
        }

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self { n: truth.len(), accuracy: accuracy_score(truth, pred), precision, recall, f1 }
    }
}

impl fmt::Display for ClassificationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} accuracy={:.4} precision={:.4} recall={:.4} f1={:.4}",
            self.n, self.accuracy, self.precision, self.recall, self.f1
        )
    }
}

/// Evaluation of either kind of model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Evaluation {
    /// Regression metrics.
    Regression(RegressionMetrics),
    /// Classification metrics.
    Classification(ClassificationMetrics),
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regression(m) => fmt::Display::fmt(m, f),
            Self::Classification(m) => fmt::Display::fmt(m, f),
        }
    }
}
