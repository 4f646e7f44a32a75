//! Feature clipping and standardization over the whole table snapshot.

use std::collections::HashMap;

use mlstock_math::{MadClipper, RobustStats, Standardizer};
use mlstock_utils::{ensure_columns, float_values};
use ndarray::Array1;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::DatasetError;

/// A feature column as an array with `NaN` for missing entries.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if the column is absent.
pub fn feature_array(df: &DataFrame, name: &str) -> Result<Array1<f64>, DatasetError> {
    Ok(float_values(df, name)?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Median and MAD of every feature, keyed by feature name.
///
/// Features without any non-missing value are left out of the map.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature is absent.
pub fn fit_robust_stats(
    df: &DataFrame,
    features: &[String],
) -> Result<HashMap<String, RobustStats>, DatasetError> {
    ensure_columns(df, features)?;

    let mut stats = HashMap::with_capacity(features.len());
    for name in features {
        if let Some(fitted) = RobustStats::fit(&feature_array(df, name)?) {
            debug!(feature = %name, median = fitted.median, scope = fitted.scope, "robust stats");
            stats.insert(name.clone(), fitted);
        }
    }
    Ok(stats)
}

/// Clip every feature to its MAD bounds.
///
/// `stats` must come from [`fit_robust_stats`] on the same snapshot.
/// Features missing from `stats` are left as they are.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature is absent.
pub fn clip_features(
    df: DataFrame,
    features: &[String],
    stats: &HashMap<String, RobustStats>,
    clipper: &MadClipper,
) -> Result<DataFrame, DatasetError> {
    ensure_columns(&df, features)?;

    let exprs: Vec<Expr> = features
        .iter()
        .filter_map(|name| stats.get(name).map(|s| clipper.expr(name, s)))
        .collect();
    if exprs.is_empty() {
        return Ok(df);
    }

    Ok(df.lazy().with_columns(exprs).collect()?)
}

/// Scale every feature to zero mean and unit population variance.
///
/// A zero-variance feature is kept and mapped to `0` wherever it is
/// present. A feature with no present value is left untouched.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature is absent.
pub fn standardize_features(df: DataFrame, features: &[String]) -> Result<DataFrame, DatasetError> {
    ensure_columns(&df, features)?;

    let mut exprs = Vec::with_capacity(features.len());
    for name in features {
        let Some(scaler) = Standardizer::fit(&feature_array(&df, name)?) else {
            continue;
        };
        if scaler.is_degenerate() {
            warn!(feature = %name, mean = scaler.mean(), "constant feature, mapping to zero");
        }
        exprs.push(scaler.expr(name));
    }
    if exprs.is_empty() {
        return Ok(df);
    }

    Ok(df.lazy().with_columns(exprs).collect()?)
}
