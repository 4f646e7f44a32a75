//! CSV reading and writing.

use std::{fs::File, path::Path};

use polars::prelude::*;

use crate::UtilsError;

/// Read a CSV file with a header row.
///
/// Columns named in `string_cols` are cast to strings when present, so
/// `YYYYMMDD` dates that the reader infers as integers keep their textual
/// form.
///
/// # Errors
/// Returns `UtilsError::NotFound` if the file does not exist, or a polars
/// error if it cannot be parsed.
pub fn read_csv(path: &Path, string_cols: &[&str]) -> Result<DataFrame, UtilsError> {
    if !path.exists() {
        return Err(UtilsError::NotFound(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    keys_as_strings(df, string_cols)
}

/// Cast the present columns of `string_cols` to strings.
///
/// # Errors
/// Returns a polars error if a cast fails.
pub fn keys_as_strings(df: DataFrame, string_cols: &[&str]) -> Result<DataFrame, UtilsError> {
    let present = df.get_column_names();
    let casts: Vec<Expr> = string_cols
        .iter()
        .filter(|&&c| present.iter().any(|p| p.as_str() == c))
        .map(|&c| col(c).cast(DataType::String).alias(c))
        .collect();

    if casts.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(casts).collect()?)
}

/// Write `df` as a CSV file with a header row, creating parent directories.
///
/// # Errors
/// Returns an I/O error if the file cannot be created, or a polars error if
/// serialization fails.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), UtilsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
