//! Linear algebra for the linear model trainers.

use ndarray::{Array1, Array2, Axis};

use crate::MathError;

/// Result of a ridge regression fit.
#[derive(Debug, Clone)]
pub struct RidgeSolution {
    /// Estimated coefficients, one per column of the design matrix.
    pub coefficients: Array1<f64>,
    /// Intercept (zero when the intercept is not fitted).
    pub intercept: f64,
    /// In-sample R-squared.
    pub r_squared: f64,
}

/// Ridge regression by the normal equations.
///
/// Solves: argmin_beta ||y - b0 - X beta||^2 + alpha * ||beta||^2
///
/// With `fit_intercept`, `X` and `y` are centered first so the intercept is
/// not penalized.
///
/// # Arguments
/// * `x` - Design matrix (n x p)
/// * `y` - Response vector (n,)
/// * `alpha` - Non-negative L2 penalty
/// * `fit_intercept` - Whether to estimate an unpenalized intercept
///
/// # Errors
/// Returns error if dimensions mismatch, data is empty, `alpha` is invalid
/// or the system is singular.
pub fn ridge_regression(
    x: &Array2<f64>,
    y: &Array1<f64>,
    alpha: f64,
    fit_intercept: bool,
) -> Result<RidgeSolution, MathError> {
    let n = y.len();
    let p = x.ncols();

    if x.nrows() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: x.nrows() });
    }
    if n == 0 || p == 0 {
        return Err(MathError::EmptyData);
    }
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(MathError::InvalidPenalty(alpha));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::NumericalInstability("non-finite input".to_string()));
    }

    let (x_offset, y_offset) = if fit_intercept {
        let x_mean = x.mean_axis(Axis(0)).ok_or(MathError::EmptyData)?;
        (x_mean, y.mean().unwrap_or(0.0))
    } else {
        (Array1::zeros(p), 0.0)
    };

    let xc = x - &x_offset;
    let yc = y - y_offset;

    let mut xtx = xc.t().dot(&xc);
    for j in 0..p {
        xtx[[j, j]] += alpha;
    }
    let xty = xc.t().dot(&yc);

    let coefficients = solve_linear_system(&xtx, &xty)?;
    let intercept = if fit_intercept { y_offset - x_offset.dot(&coefficients) } else { 0.0 };

    let fitted = x.dot(&coefficients) + intercept;
    let residuals = y - &fitted;

    let y_mean = y.mean().unwrap_or(0.0);
    let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

    Ok(RidgeSolution { coefficients, intercept, r_squared })
}

/// Solve a linear system Ax = b using Gaussian elimination with partial pivoting.
///
/// # Errors
/// Returns error if `a` is not square, sizes disagree or `a` is singular.
pub fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>, MathError> {
    let n = a.nrows();
    if n == 0 {
        return Err(MathError::EmptyData);
    }
    if a.ncols() != n {
        return Err(MathError::LinearAlgebra("matrix must be square".to_string()));
    }
    if b.len() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: b.len() });
    }

    // Augmented matrix [A | b]
    let mut aug = Array2::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = a[[i, j]];
        }
        aug[[i, n]] = b[i];
    }

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = aug[[col, col]].abs();
        for row in (col + 1)..n {
            if aug[[row, col]].abs() > max_val {
                max_val = aug[[row, col]].abs();
                max_row = row;
            }
        }

        if max_val < 1e-14 {
            return Err(MathError::LinearAlgebra(
                "matrix is singular or nearly singular".to_string(),
            ));
        }

        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        for row in (col + 1)..n {
            let factor = aug[[row, col]] / aug[[col, col]];
            for j in col..=n {
                aug[[row, j]] -= factor * aug[[col, j]];
            }
        }
    }

    // Back substitution
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = aug[[i, n]];
        for j in (i + 1)..n {
            sum -= aug[[i, j]] * x[j];
        }
        x[i] = sum / aug[[i, i]];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    use super::*;

    #[test]
    fn solve_small_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn solve_singular_errors() {
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        assert!(solve_linear_system(&a, &array![1.0, 2.0]).is_err());
    }

    #[test]
    fn ridge_without_penalty_is_least_squares() {
        // y = 1 + 2x
        let x = array![[1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0, 11.0];

        let fit = ridge_regression(&x, &y, 0.0, true).unwrap();
        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept, 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn ridge_penalty_shrinks_coefficients() {
        let x = array![[1.0, 0.5], [2.0, -0.5], [3.0, 1.5], [4.0, 0.0], [5.0, 2.0]];
        let y = array![1.0, 2.2, 2.9, 4.1, 5.0];

        let loose = ridge_regression(&x, &y, 0.0, true).unwrap();
        let tight = ridge_regression(&x, &y, 100.0, true).unwrap();

        let norm = |c: &Array1<f64>| c.iter().map(|v| v * v).sum::<f64>();
        assert!(norm(&tight.coefficients) < norm(&loose.coefficients));
    }

    #[test]
    fn ridge_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let fit = ridge_regression(&x, &y, 0.0, false).unwrap();
        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-10);
        assert_eq!(fit.intercept, 0.0);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn ridge_rejects_bad_penalty(#[case] alpha: f64) {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(ridge_regression(&x, &y, alpha, true), Err(MathError::InvalidPenalty(_))));
    }

    #[test]
    fn ridge_dimension_mismatch() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![1.0, 2.0];
        assert!(matches!(
            ridge_regression(&x, &y, 1.0, true),
            Err(MathError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }
}
