//! Next-period excess return labels.

use mlstock_primitives::columns::{
    EXCESS_RETURN, INDEX_PCT_CHG, PCT_CHG, TARGET, TRADE_DATE, TS_CODE,
};
use mlstock_utils::{ensure_columns, normalize_missing};
use polars::prelude::*;

use crate::{DatasetError, dedup::first_per_key};

/// Label expression: `excess_return` shifted `shift` periods back within each stock.
///
/// Rows must already be sorted by stock and trade date.
pub fn forward_label(shift: u32) -> Expr {
    col(EXCESS_RETURN).shift(lit(-i64::from(shift))).over([col(TS_CODE)]).alias(TARGET)
}

/// Join the benchmark onto `weekly` and derive `target`.
///
/// For each stock ordered by trade date, `target(t)` is the excess return
/// of period `t + shift`. The last `shift` observations of every stock and
/// every week the benchmark does not cover get a missing label.
///
/// Only the first row of a repeated `(ts_code, trade_date)` key, and of a
/// repeated benchmark `trade_date`, is kept so the shift always steps to
/// the next week. The output is sorted by `(ts_code, trade_date)` and gains
/// the `index_pct_chg`, `excess_return` and `target` columns.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if either frame lacks a required
/// column.
pub fn attach_labels(
    weekly: DataFrame,
    benchmark: DataFrame,
    shift: u32,
) -> Result<DataFrame, DatasetError> {
    ensure_columns(&weekly, &[TS_CODE, TRADE_DATE, PCT_CHG])?;
    ensure_columns(&benchmark, &[TRADE_DATE, PCT_CHG])?;
    if shift == 0 {
        return Err(DatasetError::InvalidConfig("label shift must be at least 1".to_string()));
    }

    let weekly = first_per_key(&normalize_missing(weekly, &[PCT_CHG])?, &[TS_CODE, TRADE_DATE])?;
    let index = first_per_key(&normalize_missing(benchmark, &[PCT_CHG])?, &[TRADE_DATE])?
        .lazy()
        .select([col(TRADE_DATE), col(PCT_CHG).alias(INDEX_PCT_CHG)]);

    let labelled = weekly
        .lazy()
        .join(index, [col(TRADE_DATE)], [col(TRADE_DATE)], JoinArgs::new(JoinType::Left))
        .sort([TS_CODE, TRADE_DATE], SortMultipleOptions::new().with_maintain_order(true))
        .with_column((col(PCT_CHG) - col(INDEX_PCT_CHG)).alias(EXCESS_RETURN))
        .with_column(forward_label(shift))
        .collect()?;

    Ok(labelled)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use mlstock_utils::float_values;

    use super::*;

    fn benchmark() -> DataFrame {
        df! {
            "trade_date" => &["20190104", "20190111", "20190118"],
            "pct_chg" => &[1.0, -1.0, 0.5],
        }
        .unwrap()
    }

    #[test]
    fn target_is_next_period_excess_return() {
        // Rows deliberately out of order.
        let weekly = df! {
            "ts_code" => &["A", "A", "A"],
            "trade_date" => &["20190118", "20190104", "20190111"],
            "pct_chg" => &[3.5, 2.0, 1.0],
        }
        .unwrap();

        let out = attach_labels(weekly, benchmark(), 1).unwrap();
        let excess = float_values(&out, EXCESS_RETURN).unwrap();
        let target = float_values(&out, TARGET).unwrap();

        // e1 = 2 - 1, e2 = 1 - (-1), e3 = 3.5 - 0.5
        assert_eq!(excess, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(target, vec![Some(2.0), Some(3.0), None]);
    }

    #[test]
    fn shift_does_not_cross_stocks() {
        let weekly = df! {
            "ts_code" => &["B", "A", "B", "A"],
            "trade_date" => &["20190104", "20190104", "20190111", "20190111"],
            "pct_chg" => &[5.0, 2.0, 6.0, 3.0],
        }
        .unwrap();

        let out = attach_labels(weekly, benchmark(), 1).unwrap();
        let codes: Vec<Option<&str>> = out.column(TS_CODE).unwrap().str().unwrap().into_iter().collect();
        let target = float_values(&out, TARGET).unwrap();

        assert_eq!(codes, vec![Some("A"), Some("A"), Some("B"), Some("B")]);
        assert_relative_eq!(target[0].unwrap(), 4.0);
        assert!(target[1].is_none());
        assert_relative_eq!(target[2].unwrap(), 7.0);
        assert!(target[3].is_none());
    }

    #[test]
    fn benchmark_gap_gives_missing_label() {
        let weekly = df! {
            "ts_code" => &["A", "A", "A"],
            "trade_date" => &["20190104", "20190111", "20190125"],
            "pct_chg" => &[1.0, 1.0, 1.0],
        }
        .unwrap();

        let out = attach_labels(weekly, benchmark(), 1).unwrap();
        let index = float_values(&out, INDEX_PCT_CHG).unwrap();
        let target = float_values(&out, TARGET).unwrap();

        assert!(index[2].is_none());
        // 20190111 is labelled with the uncovered 20190125 week.
        assert!(target[1].is_none());
        assert!(target[0].is_some());
    }

    #[test]
    fn missing_stock_return_propagates() {
        let weekly = df! {
            "ts_code" => &["A", "A"],
            "trade_date" => &["20190104", "20190111"],
            "pct_chg" => &[Some(1.0), None],
        }
        .unwrap();

        let out = attach_labels(weekly, benchmark(), 1).unwrap();
        assert!(float_values(&out, TARGET).unwrap()[0].is_none());
    }

    #[test]
    fn longer_shift() {
        let weekly = df! {
            "ts_code" => &["A", "A", "A"],
            "trade_date" => &["20190104", "20190111", "20190118"],
            "pct_chg" => &[2.0, 1.0, 3.5],
        }
        .unwrap();

        let out = attach_labels(weekly, benchmark(), 2).unwrap();
        assert_eq!(float_values(&out, TARGET).unwrap(), vec![Some(3.0), None, None]);
    }

    #[test]
    fn repeated_week_keeps_next_week_label() {
        let weekly = df! {
            "ts_code" => &["A", "A", "A", "A"],
            "trade_date" => &["20190104", "20190104", "20190111", "20190118"],
            "pct_chg" => &[1.0, 9.0, 2.0, 3.0],
        }
        .unwrap();
        let flat = df! {
            "trade_date" => &["20190104", "20190111", "20190118"],
            "pct_chg" => &[0.0, 0.0, 0.0],
        }
        .unwrap();

        let out = attach_labels(weekly, flat, 1).unwrap();
        assert_eq!(float_values(&out, PCT_CHG).unwrap(), vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(float_values(&out, TARGET).unwrap(), vec![Some(2.0), Some(3.0), None]);
    }

    #[test]
    fn repeated_benchmark_date_is_joined_once() {
        let weekly = df! {
            "ts_code" => &["A", "A"],
            "trade_date" => &["20190104", "20190111"],
            "pct_chg" => &[1.0, 2.0],
        }
        .unwrap();
        let doubled = df! {
            "trade_date" => &["20190104", "20190104", "20190111"],
            "pct_chg" => &[0.0, 0.5, 0.0],
        }
        .unwrap();

        let out = attach_labels(weekly, doubled, 1).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(float_values(&out, TARGET).unwrap(), vec![Some(2.0), None]);
    }

    #[test]
    fn missing_return_column_is_schema_error() {
        let weekly = df! { "ts_code" => &["A"], "trade_date" => &["20190104"] }.unwrap();
        let err = attach_labels(weekly, benchmark(), 1).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == PCT_CHG));
    }
}
