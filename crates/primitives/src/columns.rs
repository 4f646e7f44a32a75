//! Canonical column names and pipeline-wide constants.

/// Stock identifier column.
pub const TS_CODE: &str = "ts_code";

/// Trade date column (`YYYYMMDD` string).
pub const TRADE_DATE: &str = "trade_date";

/// Raw weekly percentage change of a stock or of the benchmark.
pub const PCT_CHG: &str = "pct_chg";

/// Listing date column (`YYYYMMDD` string).
pub const LIST_DATE: &str = "list_date";

/// Benchmark percentage change after the join onto the weekly table.
pub const INDEX_PCT_CHG: &str = "index_pct_chg";

/// Stock return minus benchmark return for the same week.
pub const EXCESS_RETURN: &str = "excess_return";

/// Label column.
pub const TARGET: &str = "target";

/// Key columns of every observation.
pub const CODE_DATE: [&str; 2] = [TS_CODE, TRADE_DATE];

/// Earliest trade date the data source serves.
pub const EARLIEST_DATE: &str = "20080101";

/// Weeks of warm-up loaded before the study start so lookback factors are populated.
pub const RESERVED_PERIODS: u32 = 50;

/// Trade date separating the training sample from the test sample.
pub const TRAIN_TEST_SPLIT_DATE: &str = "20190101";

/// Benchmark index used for excess returns (CSI 300).
pub const BASELINE_INDEX_CODE: &str = "000300.SH";

/// Minimum years a stock must have been listed for an observation to be used.
pub const STOCK_IPO_YEARS: u32 = 1;
