//! Pipeline states and per-stage removal reports.

use std::{collections::HashSet, fmt};

use mlstock_primitives::columns::TS_CODE;
use mlstock_utils::string_values;
use polars::prelude::*;
use tracing::info;

use crate::DatasetError;

/// Position of a feature table in the assembly sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineState {
    /// Labelled input, nothing removed yet.
    Raw,
    /// Warm-up (and too-recently-listed) rows removed.
    DateFiltered,
    /// Rows without a label removed.
    LabelFiltered,
    /// Sparse stocks removed.
    StockCoverageFiltered,
    /// Factors clipped to MAD bounds.
    Clipped,
    /// Factors scaled to zero mean and unit variance.
    Standardized,
    /// Rows with any missing factor or label removed.
    DenseFiltered,
    /// Duplicate keys removed.
    Deduplicated,
    /// Written to the feature store.
    Persisted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::DateFiltered => "date_filtered",
            Self::LabelFiltered => "label_filtered",
            Self::StockCoverageFiltered => "stock_coverage_filtered",
            Self::Clipped => "clipped",
            Self::Standardized => "standardized",
            Self::DenseFiltered => "dense_filtered",
            Self::Deduplicated => "deduplicated",
            Self::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Rows and stocks before and after one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// State reached by the stage.
    pub state: PipelineState,
    /// Short description of the rule applied.
    pub rule: &'static str,
    /// Row count before the stage.
    pub rows_before: usize,
    /// Row count after the stage.
    pub rows_after: usize,
    /// Distinct stocks before the stage.
    pub stocks_before: usize,
    /// Distinct stocks after the stage.
    pub stocks_after: usize,
}

impl StageReport {
    /// Measure `before` and `after` and log the result.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if a frame lacks `ts_code`.
    pub fn measure(
        state: PipelineState,
        rule: &'static str,
        before: &DataFrame,
        after: &DataFrame,
    ) -> Result<Self, DatasetError> {
        let report = Self {
            state,
            rule,
            rows_before: before.height(),
            rows_after: after.height(),
            stocks_before: count_stocks(before)?,
            stocks_after: count_stocks(after)?,
        };
        report.log();
        Ok(report)
    }

    /// Rows removed by the stage.
    #[must_use]
    pub const fn rows_removed(&self) -> usize {
        self.rows_before.saturating_sub(self.rows_after)
    }

    /// Stocks removed by the stage.
    #[must_use]
    pub const fn stocks_removed(&self) -> usize {
        self.stocks_before.saturating_sub(self.stocks_after)
    }

    /// Fraction of rows removed, `0` for an empty input.
    #[must_use]
    pub fn removal_ratio(&self) -> f64 {
        if self.rows_before == 0 {
            0.0
        } else {
            self.rows_removed() as f64 / self.rows_before as f64
        }
    }

    fn log(&self) {
        info!(
            state = %self.state,
            rule = self.rule,
            rows_removed = self.rows_removed(),
            rows_left = self.rows_after,
            stocks_removed = self.stocks_removed(),
            stocks_left = self.stocks_after,
            "removal ratio {:.2}%",
            self.removal_ratio() * 100.0
        );
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} {:>9} -> {:>9} rows ({:>6.2}% removed), {:>5} -> {:>5} stocks",
            self.state.to_string(),
            self.rows_before,
            self.rows_after,
            self.removal_ratio() * 100.0,
            self.stocks_before,
            self.stocks_after
        )
    }
}

/// Number of distinct stock codes in `df`.
///
/// # Errors
/// Returns `DatasetError::MissingColumn` if `df` lacks `ts_code`.
pub fn count_stocks(df: &DataFrame) -> Result<usize, DatasetError> {
    let codes = string_values(df, TS_CODE)?;
    Ok(codes.iter().collect::<HashSet<_>>().len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display() {
        assert_eq!(PipelineState::Raw.to_string(), "raw");
        assert_eq!(PipelineState::StockCoverageFiltered.to_string(), "stock_coverage_filtered");
        assert!(PipelineState::Clipped < PipelineState::Standardized);
    }

    #[test]
    fn report_counts_rows_and_stocks() {
        let before = df! {
            "ts_code" => &["A", "A", "B", "C"],
            "trade_date" => &["1", "2", "1", "1"],
        }
        .unwrap();
        let after = df! {
            "ts_code" => &["A", "A"],
            "trade_date" => &["1", "2"],
        }
        .unwrap();

        let report =
            StageReport::measure(PipelineState::LabelFiltered, "test", &before, &after).unwrap();
        assert_eq!(report.rows_removed(), 2);
        assert_eq!(report.stocks_removed(), 2);
        assert!((report.removal_ratio() - 0.5).abs() < 1e-12);
        assert!(report.to_string().contains("label_filtered"));
    }

    #[test]
    fn empty_input_has_zero_ratio() {
        let empty = df! { "ts_code" => Vec::<String>::new() }.unwrap();
        let report = StageReport::measure(PipelineState::Raw, "noop", &empty, &empty).unwrap();
        assert_eq!(report.removal_ratio(), 0.0);
    }
}
