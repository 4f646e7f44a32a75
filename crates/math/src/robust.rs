//! Robust location and scale statistics.

use ndarray::Array1;

/// Median of the finite values in `data`, `None` if there are none.
///
/// An even count averages the two middle values.
#[must_use]
pub fn median(data: &Array1<f64>) -> Option<f64> {
    let mut valid: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    median_in_place(&mut valid)
}

fn median_in_place(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mid = n / 2;
    if n % 2 == 0 { Some((values[mid - 1] + values[mid]) / 2.0) } else { Some(values[mid]) }
}

/// Cross-sectional location and scale of one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustStats {
    /// Median of the non-missing values.
    pub median: f64,
    /// Median absolute deviation from `median`.
    pub scope: f64,
}

impl RobustStats {
    /// Create statistics from known values.
    #[must_use]
    pub const fn new(median: f64, scope: f64) -> Self {
        Self { median, scope }
    }

    /// Fit on the finite values of `data`.
    ///
    /// Returns `None` when `data` has no finite value.
    #[must_use]
    pub fn fit(data: &Array1<f64>) -> Option<Self> {
        let mut valid: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let median = median_in_place(&mut valid)?;

        let mut deviations: Vec<f64> = valid.iter().map(|x| (x - median).abs()).collect();
        let scope = median_in_place(&mut deviations)?;

        Some(Self { median, scope })
    }

    /// Clipping bounds `(median - k * scope, median + k * scope)`.
    #[must_use]
    pub fn bounds(&self, multiplier: f64) -> (f64, f64) {
        let width = multiplier * self.scope;
        (self.median - width, self.median + width)
    }
}
