//! Chronological train/test split.

use mlstock_primitives::TradeDate;
use ndarray::{Array1, Array2, Axis};

use crate::TrainError;

/// Features and labels on both sides of a split date.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training features.
    pub x_train: Array2<f64>,
    /// Training labels.
    pub y_train: Array1<f64>,
    /// Test features.
    pub x_test: Array2<f64>,
    /// Test labels.
    pub y_test: Array1<f64>,
}

/// Rows dated before `split` train, the others test.
///
/// `dates` are `YYYYMMDD` strings aligned with the rows of `x`.
///
/// # Errors
/// Returns `TrainError::InvalidConfig` if the inputs are misaligned, or
/// `TrainError::EmptySplit` if either side is empty.
pub fn split_by_date(
    x: &Array2<f64>,
    y: &Array1<f64>,
    dates: &[String],
    split: TradeDate,
) -> Result<TrainTestSplit, TrainError> {
    if x.nrows() != y.len() || dates.len() != y.len() {
        return Err(TrainError::InvalidConfig(format!(
            "misaligned inputs: {} rows, {} labels, {} dates",
            x.nrows(),
            y.len(),
            dates.len()
        )));
    }

    let split = split.to_compact();
    let (train, test): (Vec<usize>, Vec<usize>) =
        (0..dates.len()).partition(|&i| dates[i].as_str() < split.as_str());

    if train.is_empty() {
        return Err(TrainError::EmptySplit("train"));
    }
    if test.is_empty() {
        return Err(TrainError::EmptySplit("test"));
    }

    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), &train),
        y_train: y.select(Axis(0), &train),
        x_test: x.select(Axis(0), &test),
        y_test: y.select(Axis(0), &test),
    })
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn dates(ds: &[&str]) -> Vec<String> {
        ds.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn split_is_by_date_not_position() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![10.0, 20.0, 30.0, 40.0];
        let d = dates(&["20190104", "20181228", "20190111", "20181221"]);

        let split = split_by_date(&x, &y, &d, TradeDate::parse("20190101").unwrap()).unwrap();
        assert_eq!(split.y_train, array![20.0, 40.0]);
        assert_eq!(split.y_test, array![10.0, 30.0]);
        assert_eq!(split.x_test, array![[1.0], [3.0]]);
    }

    #[test]
    fn split_date_row_goes_to_test() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        let d = dates(&["20181228", "20190101"]);
        let split = split_by_date(&x, &y, &d, TradeDate::parse("20190101").unwrap()).unwrap();
        assert_eq!(split.y_test, array![2.0]);
    }

    #[test]
    fn empty_side_is_error() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0];
        let d = dates(&["20190104", "20190111"]);
        let err = split_by_date(&x, &y, &d, TradeDate::parse("20190101").unwrap()).unwrap_err();
        assert!(matches!(err, TrainError::EmptySplit("train")));
    }
}
