//! Missing-value handling for factor columns.

use polars::prelude::*;

use crate::UtilsError;

/// Check that every name in `columns` exists in `df`.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` naming the first absent column.
pub fn ensure_columns<S: AsRef<str>>(df: &DataFrame, columns: &[S]) -> Result<(), UtilsError> {
    let present = df.get_column_names();
    for name in columns {
        let name = name.as_ref();
        if !present.iter().any(|c| c.as_str() == name) {
            return Err(UtilsError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Cast `columns` to `Float64` and turn `NaN`/`Inf` into nulls.
///
/// After this call null is the only representation of a missing value.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if a column is absent, or a polars
/// error if a column cannot be cast.
pub fn normalize_missing<S: AsRef<str>>(
    mut df: DataFrame,
    columns: &[S],
) -> Result<DataFrame, UtilsError> {
    ensure_columns(&df, columns)?;

    for name in columns {
        let name = name.as_ref();
        let cast = df.column(name)?.cast(&DataType::Float64)?;
        let values: Vec<Option<f64>> =
            cast.f64()?.into_iter().map(|v| v.filter(|x| x.is_finite())).collect();
        df.with_column(Column::new(name.into(), values))?;
    }

    Ok(df)
}

/// Extract a float column as a vector with nulls kept as `None`.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if the column is absent, or a polars
/// error if it is not `Float64`.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, UtilsError> {
    let column = df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))?;
    Ok(column.f64()?.into_iter().collect())
}

/// Extract a string column as owned values; nulls become empty strings.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if the column is absent, or a polars
/// error if it is not a string column.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<String>, UtilsError> {
    let column = df.column(name).map_err(|_| UtilsError::MissingColumn(name.to_string()))?;
    Ok(column.str()?.into_iter().map(|v| v.unwrap_or_default().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_and_inf_become_null() {
        let df = df! {
            "ts_code" => &["A", "A", "B", "B"],
            "f" => &[1.0, f64::NAN, f64::INFINITY, 4.0],
        }
        .unwrap();

        let out = normalize_missing(df, &["f"]).unwrap();
        let values = float_values(&out, "f").unwrap();
        assert_eq!(values, vec![Some(1.0), None, None, Some(4.0)]);
    }

    #[test]
    fn integer_columns_are_cast() {
        let df = df! { "f" => &[Some(1i64), None, Some(3)] }.unwrap();
        let out = normalize_missing(df, &["f"]).unwrap();
        assert_eq!(float_values(&out, "f").unwrap(), vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn absent_column_is_reported() {
        let df = df! { "f" => &[1.0] }.unwrap();
        let err = normalize_missing(df, &["f", "g"]).unwrap_err();
        assert!(matches!(err, UtilsError::MissingColumn(ref c) if c == "g"));
    }

    #[test]
    fn string_values_extracts_codes() {
        let df = df! { "ts_code" => &["000001.SZ", "600000.SH"] }.unwrap();
        assert_eq!(string_values(&df, "ts_code").unwrap(), vec!["000001.SZ", "600000.SH"]);
    }
}
