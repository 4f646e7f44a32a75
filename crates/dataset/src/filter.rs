//! Row, stock and feature exclusion rules.
//!
//! Every function takes the table by value and returns the narrowed table
//! together with a [`StageReport`].

use std::collections::{HashMap, HashSet};

use mlstock_primitives::{
    TradeDate,
    columns::{LIST_DATE, TARGET, TRADE_DATE, TS_CODE},
};
use mlstock_utils::{ensure_columns, float_values, string_values};
use polars::prelude::*;
use tracing::debug;

use crate::{DatasetError, PipelineState, StageReport};

/// Keep only rows whose stock code is in `keep`.
fn retain_stocks(df: &DataFrame, keep: &HashSet<String>) -> Result<DataFrame, DatasetError> {
    let codes: Vec<&str> = keep.iter().map(String::as_str).collect();
    let keep = Series::new("keep".into(), codes);
    Ok(df.clone().lazy().filter(col(TS_CODE).is_in(lit(keep))).collect()?)
}

/// Drop rows before `start` and, when `min_listing_years` is set, rows less
/// than that many years after the stock's listing date.
///
/// Rows with a missing or unparsable listing date are kept.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if `trade_date` is absent, or if
/// the listing rule is enabled and `list_date` is absent.
pub fn filter_date_floor(
    df: DataFrame,
    start: TradeDate,
    min_listing_years: Option<u32>,
) -> Result<(DataFrame, StageReport), DatasetError> {
    ensure_columns(&df, &[TRADE_DATE])?;

    let floored =
        df.clone().lazy().filter(col(TRADE_DATE).gt_eq(lit(start.to_compact()))).collect()?;

    let out = match min_listing_years {
        Some(years) => {
            ensure_columns(&floored, &[LIST_DATE])?;
            let trade_dates = string_values(&floored, TRADE_DATE)?;
            let list_dates = string_values(&floored, LIST_DATE)?;

            let mask: Vec<bool> = trade_dates
                .iter()
                .zip(&list_dates)
                .map(|(trade, listed)| {
                    match (TradeDate::parse(trade), TradeDate::parse(listed)) {
                        (Ok(trade), Ok(listed)) => trade >= listed.years_after(years),
                        _ => true,
                    }
                })
                .collect();
            floored.filter(&BooleanChunked::from_slice("mask".into(), &mask))?
        }
        None => floored,
    };

    let report = StageReport::measure(PipelineState::DateFiltered, "date floor", &df, &out)?;
    Ok((out, report))
}

/// Drop every row whose `target` is missing.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if `target` is absent.
pub fn filter_missing_labels(df: DataFrame) -> Result<(DataFrame, StageReport), DatasetError> {
    ensure_columns(&df, &[TARGET])?;

    let out = df.clone().lazy().filter(col(TARGET).is_not_null()).collect()?;
    let report = StageReport::measure(PipelineState::LabelFiltered, "missing label", &df, &out)?;
    Ok((out, report))
}

/// Per-stock missing fraction of each feature, in feature order.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature is absent.
pub fn missing_ratios(
    df: &DataFrame,
    features: &[String],
) -> Result<HashMap<String, Vec<f64>>, DatasetError> {
    ensure_columns(df, features)?;

    let aggs: Vec<Expr> = features
        .iter()
        .map(|f| {
            (col(f.as_str()).null_count().cast(DataType::Float64) / len().cast(DataType::Float64))
                .alias(f.as_str())
        })
        .collect();

    let grouped = df.clone().lazy().group_by([col(TS_CODE)]).agg(aggs).collect()?;

    let codes = string_values(&grouped, TS_CODE)?;
    let columns = features
        .iter()
        .map(|f| float_values(&grouped, f))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(codes
        .into_iter()
        .enumerate()
        .map(|(i, code)| {
            let ratios = columns.iter().map(|c| c[i].unwrap_or(1.0)).collect();
            (code, ratios)
        })
        .collect())
}

/// Drop stocks whose most-missing feature exceeds `max_missing_ratio`.
///
/// The boundary is exclusive: a stock at exactly the threshold is kept.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature is absent.
pub fn filter_stock_coverage(
    df: DataFrame,
    features: &[String],
    max_missing_ratio: f64,
) -> Result<(DataFrame, StageReport), DatasetError> {
    let ratios = missing_ratios(&df, features)?;

    let keep: HashSet<String> = ratios
        .into_iter()
        .filter_map(|(code, r)| {
            let worst = r.iter().copied().fold(0.0_f64, f64::max);
            if worst > max_missing_ratio {
                debug!(ts_code = %code, worst_missing = worst, "dropping sparse stock");
                None
            } else {
                Some(code)
            }
        })
        .collect();

    let out = retain_stocks(&df, &keep)?;
    let report =
        StageReport::measure(PipelineState::StockCoverageFiltered, "stock coverage", &df, &out)?;
    Ok((out, report))
}

/// Drop stocks that have some feature missing in every observation.
///
/// Features are visited in declared order and each one narrows the set of
/// valid stocks; the narrowed set is applied once at the end.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature is absent.
pub fn filter_invalid_features(
    df: DataFrame,
    features: &[String],
) -> Result<(DataFrame, StageReport), DatasetError> {
    let ratios = missing_ratios(&df, features)?;
    let all: HashSet<String> = ratios.keys().cloned().collect();

    let valid = features.iter().enumerate().fold(all, |mut valid, (j, feature)| {
        valid.retain(|code| {
            let wholly_missing = ratios.get(code).is_some_and(|r| r[j] >= 1.0);
            if wholly_missing {
                debug!(ts_code = %code, feature = %feature, "dropping stock with empty feature");
            }
            !wholly_missing
        });
        valid
    });

    let out = retain_stocks(&df, &valid)?;
    let report =
        StageReport::measure(PipelineState::StockCoverageFiltered, "empty feature", &df, &out)?;
    Ok((out, report))
}

/// Drop every row with a missing feature or label.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a feature or `target` is absent.
pub fn filter_dense(
    df: DataFrame,
    features: &[String],
) -> Result<(DataFrame, StageReport), DatasetError> {
    ensure_columns(&df, features)?;
    ensure_columns(&df, &[TARGET])?;

    let complete = features
        .iter()
        .fold(col(TARGET).is_not_null(), |acc, f| acc.and(col(f.as_str()).is_not_null()));

    let out = df.clone().lazy().filter(complete).collect()?;
    let report = StageReport::measure(PipelineState::DenseFiltered, "incomplete row", &df, &out)?;
    Ok((out, report))
}
