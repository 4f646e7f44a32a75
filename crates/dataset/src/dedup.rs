//! Key uniqueness.

use mlstock_primitives::columns::CODE_DATE;
use mlstock_utils::ensure_columns;
use polars::prelude::*;

use crate::{DatasetError, PipelineState, StageReport};

/// First row of every distinct combination of `keys`, in original order.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a key column is absent.
pub(crate) fn first_per_key(df: &DataFrame, keys: &[&str]) -> Result<DataFrame, DatasetError> {
    ensure_columns(df, keys)?;
    let subset: Vec<String> = keys.iter().map(|k| (*k).to_string()).collect();
    Ok(df.unique_stable(Some(&subset), UniqueKeepStrategy::First, None)?)
}

/// Keep the first row of every `(ts_code, trade_date)` pair.
///
/// Row order is otherwise preserved and the result is contiguous.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a key column is absent.
pub fn deduplicate(df: DataFrame) -> Result<(DataFrame, StageReport), DatasetError> {
    let out = first_per_key(&df, &CODE_DATE)?;
    let report = StageReport::measure(PipelineState::Deduplicated, "duplicate key", &df, &out)?;
    Ok((out, report))
}

/// Whether every `(ts_code, trade_date)` pair occurs once.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if a key column is absent.
pub fn has_unique_keys(df: &DataFrame) -> Result<bool, DatasetError> {
    Ok(first_per_key(df, &CODE_DATE)?.height() == df.height())
}
