//! Pipeline configuration.

use std::collections::HashSet;

use mlstock_math::DEFAULT_MAD_MULTIPLIER;
use mlstock_primitives::{TradeDate, columns};

use crate::DatasetError;

/// Worst-feature missing fraction above which a stock is dropped.
pub const DEFAULT_MAX_MISSING_RATIO: f64 = 0.8;

/// Periods between a feature observation and its label.
pub const DEFAULT_LABEL_SHIFT: u32 = 1;

/// Logical name encoded in persisted feature files.
pub const DEFAULT_DATASET_NAME: &str = "features";

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Logical name used in the persisted file name.
    pub name: String,
    /// First trade date kept in the output (date-floor bound).
    pub start_date: TradeDate,
    /// Last trade date requested from the data source.
    pub end_date: TradeDate,
    /// Ordered factor columns.
    pub factor_names: Vec<String>,
    /// Stocks whose worst factor exceeds this missing fraction are dropped.
    pub max_missing_ratio: f64,
    /// Clipping half-width in units of the median absolute deviation.
    pub mad_multiplier: f64,
    /// Forward shift, in periods, between features and label.
    pub label_shift: u32,
    /// Weeks loaded before `start_date` so lookback factors are populated.
    pub warmup_periods: u32,
    /// Minimum years since listing; `None` disables the check.
    pub min_listing_years: Option<u32>,
}

impl PipelineConfig {
    /// Create a configuration with default constants.
    #[must_use]
    pub fn new(start_date: TradeDate, end_date: TradeDate, factor_names: Vec<String>) -> Self {
        Self { start_date, end_date, factor_names, ..Self::default() }
    }

    /// First trade date requested from the data source, warm-up included.
    ///
    /// Never earlier than the earliest date the source serves.
    #[must_use]
    pub fn load_start(&self) -> TradeDate {
        let warm = self.start_date.weeks_before(self.warmup_periods);
        match TradeDate::parse(columns::EARLIEST_DATE) {
            Ok(earliest) if warm < earliest => earliest.min(self.start_date),
            _ => warm,
        }
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `DatasetError::InvalidConfig` describing the first problem found.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.start_date > self.end_date {
            return Err(DatasetError::InvalidConfig(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.factor_names.is_empty() {
            return Err(DatasetError::InvalidConfig("no factor names declared".to_string()));
        }

        let reserved = [
            columns::TS_CODE,
            columns::TRADE_DATE,
            columns::PCT_CHG,
            columns::LIST_DATE,
            columns::INDEX_PCT_CHG,
            columns::EXCESS_RETURN,
            columns::TARGET,
        ];
        let mut seen = HashSet::new();
        for name in &self.factor_names {
            if reserved.contains(&name.as_str()) {
                return Err(DatasetError::InvalidConfig(format!(
                    "factor name {name} collides with a reserved column"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(DatasetError::InvalidConfig(format!("duplicate factor name {name}")));
            }
        }

        if !(0.0..=1.0).contains(&self.max_missing_ratio) {
            return Err(DatasetError::InvalidConfig(format!(
                "max missing ratio {} outside [0, 1]",
                self.max_missing_ratio
            )));
        }
        if !self.mad_multiplier.is_finite() || self.mad_multiplier <= 0.0 {
            return Err(DatasetError::InvalidConfig(format!(
                "MAD multiplier {} must be finite and positive",
                self.mad_multiplier
            )));
        }
        if self.label_shift == 0 {
            return Err(DatasetError::InvalidConfig("label shift must be at least 1".to_string()));
        }
        if self.name.is_empty() {
            return Err(DatasetError::InvalidConfig("dataset name is empty".to_string()));
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DATASET_NAME.to_string(),
            start_date: TradeDate::from_ymd(2009, 1, 1).unwrap_or_default(),
            end_date: TradeDate::from_ymd(2022, 9, 1).unwrap_or_default(),
            factor_names: Vec::new(),
            max_missing_ratio: DEFAULT_MAX_MISSING_RATIO,
            mad_multiplier: DEFAULT_MAD_MULTIPLIER,
            label_shift: DEFAULT_LABEL_SHIFT,
            warmup_periods: columns::RESERVED_PERIODS,
            min_listing_years: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date(s: &str) -> TradeDate {
        TradeDate::parse(s).unwrap()
    }

    fn config() -> PipelineConfig {
        PipelineConfig::new(date("20190101"), date("20200101"), vec!["mom".into(), "vol".into()])
    }

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_missing_ratio, 0.8);
        assert_eq!(config.mad_multiplier, 5.0);
        assert_eq!(config.label_shift, 1);
        assert_eq!(config.warmup_periods, 50);
        assert_eq!(config.start_date.to_compact(), "20090101");
        assert_eq!(config.end_date.to_compact(), "20220901");
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[rstest]
    #[case::inverted_range(|c: &mut PipelineConfig| c.start_date = TradeDate::parse("20210101").unwrap())]
    #[case::no_factors(|c: &mut PipelineConfig| c.factor_names.clear())]
    #[case::duplicate_factor(|c: &mut PipelineConfig| c.factor_names.push("mom".into()))]
    #[case::reserved_name(|c: &mut PipelineConfig| c.factor_names.push("target".into()))]
    #[case::ratio_above_one(|c: &mut PipelineConfig| c.max_missing_ratio = 1.5)]
    #[case::zero_multiplier(|c: &mut PipelineConfig| c.mad_multiplier = 0.0)]
    #[case::zero_shift(|c: &mut PipelineConfig| c.label_shift = 0)]
    fn invalid_config_rejected(#[case] mutate: fn(&mut PipelineConfig)) {
        let mut config = config();
        mutate(&mut config);
        assert!(matches!(config.validate(), Err(DatasetError::InvalidConfig(_))));
    }

    #[test]
    fn load_start_includes_warmup() {
        let config = config();
        assert_eq!(config.load_start(), date("20190101").weeks_before(50));
    }

    #[test]
    fn load_start_never_precedes_earliest_date() {
        let config = PipelineConfig::new(date("20080301"), date("20090101"), vec!["mom".into()]);
        assert_eq!(config.load_start().to_compact(), "20080101");
    }
}
