//! Mean / standard-deviation scaling.

use ndarray::Array1;
use polars::prelude::*;

/// Per-feature scaling fitted on non-missing values.
///
/// The standard deviation is the population one (`ddof = 0`). A feature
/// with zero (or non-finite) spread gets a unit scale, which maps every
/// non-missing value to exactly `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardizer {
    mean: f64,
    scale: f64,
    degenerate: bool,
}

impl Standardizer {
    /// Fit on the finite values of `data`.
    ///
    /// Returns `None` when `data` has no finite value.
    #[must_use]
    pub fn fit(data: &Array1<f64>) -> Option<Self> {
        let valid: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        if valid.is_empty() {
            return None;
        }

        let n = valid.len() as f64;
        let mean = valid.iter().sum::<f64>() / n;
        let variance = valid.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let degenerate = !(std.is_finite() && std > 0.0);
        Some(Self { mean, scale: if degenerate { 1.0 } else { std }, degenerate })
    }

    /// Fitted mean.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Divisor applied after centering.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether the fitted feature had zero spread.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Apply `(x - mean) / scale`; `NaN` stays `NaN`.
    #[must_use]
    pub fn transform(&self, data: &Array1<f64>) -> Array1<f64> {
        data.mapv(|x| (x - self.mean) / self.scale)
    }

    /// Polars expression applying the scaling to `col_name`; nulls stay null.
    pub fn expr(&self, col_name: &str) -> Expr {
        ((col(col_name) - lit(self.mean)) / lit(self.scale)).alias(col_name)
    }
}

/// Fit and transform in one step; all-missing input is returned unchanged.
#[must_use]
pub fn standardize(data: &Array1<f64>) -> Array1<f64> {
    Standardizer::fit(data).map_or_else(|| data.clone(), |s| s.transform(data))
}
