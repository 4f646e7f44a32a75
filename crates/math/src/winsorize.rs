//! Median-absolute-deviation winsorization.

use ndarray::Array1;
use polars::prelude::*;

use crate::{MathError, RobustStats};

/// Multiplier of the median absolute deviation used by default.
pub const DEFAULT_MAD_MULTIPLIER: f64 = 5.0;

/// Clip `data` to `stats.bounds(multiplier)`.
///
/// Missing (`NaN`) values pass through unchanged.
#[must_use]
pub fn mad_clip(data: &Array1<f64>, stats: &RobustStats, multiplier: f64) -> Array1<f64> {
    let (lo, hi) = stats.bounds(multiplier);
    data.mapv(|x| if x.is_nan() { x } else { x.clamp(lo, hi) })
}

/// Polars expression clipping `col_name` to `stats.bounds(multiplier)`.
///
/// Null values pass through unchanged. The output keeps the column name.
pub fn mad_clip_expr(col_name: &str, stats: &RobustStats, multiplier: f64) -> Expr {
    let (lo, hi) = stats.bounds(multiplier);

    when(col(col_name).lt(lit(lo)))
        .then(lit(lo))
        .when(col(col_name).gt(lit(hi)))
        .then(lit(hi))
        .otherwise(col(col_name))
        .alias(col_name)
}

/// MAD winsorization configuration and transform.
#[derive(Debug, Clone, Copy)]
pub struct MadClipper {
    multiplier: f64,
}

impl MadClipper {
    /// Create a new clipper.
    ///
    /// # Errors
    /// Returns `MathError::InvalidMultiplier` unless `multiplier` is finite and positive.
    pub fn new(multiplier: f64) -> Result<Self, MathError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(MathError::InvalidMultiplier(multiplier));
        }
        Ok(Self { multiplier })
    }

    /// Get the multiplier.
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Fit statistics on `data` and clip it.
    ///
    /// Data without any finite value is returned unchanged.
    #[must_use]
    pub fn apply(&self, data: &Array1<f64>) -> Array1<f64> {
        RobustStats::fit(data)
            .map_or_else(|| data.clone(), |stats| mad_clip(data, &stats, self.multiplier))
    }

    /// Clip `col_name` with pre-fitted statistics.
    pub fn expr(&self, col_name: &str, stats: &RobustStats) -> Expr {
        mad_clip_expr(col_name, stats, self.multiplier)
    }
}

impl Default for MadClipper {
    fn default() -> Self {
        Self { multiplier: DEFAULT_MAD_MULTIPLIER }
    }
}
