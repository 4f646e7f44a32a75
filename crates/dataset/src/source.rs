//! CSV-backed data source and feature store.

use std::path::{Path, PathBuf};

use mlstock_primitives::{
    StockCode, TradeDate,
    columns::{BASELINE_INDEX_CODE, LIST_DATE, PCT_CHG, TARGET, TRADE_DATE, TS_CODE},
};
use mlstock_traits::{DataSource, FeatureStore, SourceError};
use mlstock_utils::{UtilsError, dated_file_name, ensure_columns, read_csv, write_csv};
use polars::prelude::*;
use tracing::{debug, info};

const KEY_COLUMNS: [&str; 3] = [TS_CODE, TRADE_DATE, LIST_DATE];

fn source_error(err: UtilsError) -> SourceError {
    match err {
        UtilsError::NotFound(path) => SourceError::NotFound(path),
        UtilsError::MissingColumn(name) => SourceError::MissingColumn(name),
        UtilsError::Io(e) => SourceError::Io(e),
        UtilsError::Polars(e) => SourceError::Polars(e),
    }
}

fn within(df: DataFrame, start: TradeDate, end: TradeDate) -> Result<DataFrame, SourceError> {
    Ok(df
        .lazy()
        .filter(
            col(TRADE_DATE)
                .gt_eq(lit(start.to_compact()))
                .and(col(TRADE_DATE).lt_eq(lit(end.to_compact()))),
        )
        .collect()?)
}

/// Weekly and benchmark tables read from two CSV files in one directory.
///
/// The benchmark file may hold several indices; when it has a `ts_code`
/// column only rows of `index_code` are used.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
    weekly_file: String,
    benchmark_file: String,
    index_code: StockCode,
}

impl CsvDataSource {
    /// Default weekly file name.
    pub const WEEKLY_FILE: &'static str = "weekly.csv";
    /// Default benchmark file name.
    pub const BENCHMARK_FILE: &'static str = "index_weekly.csv";

    /// Source reading the default file names under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            weekly_file: Self::WEEKLY_FILE.to_string(),
            benchmark_file: Self::BENCHMARK_FILE.to_string(),
            index_code: StockCode::new(BASELINE_INDEX_CODE),
        }
    }

    /// Override the file names.
    #[must_use]
    pub fn with_files(mut self, weekly: impl Into<String>, benchmark: impl Into<String>) -> Self {
        self.weekly_file = weekly.into();
        self.benchmark_file = benchmark.into();
        self
    }

    /// Override the benchmark index code.
    #[must_use]
    pub fn with_index_code(mut self, code: impl Into<StockCode>) -> Self {
        self.index_code = code.into();
        self
    }

    /// Factor columns of the weekly file: every column that is not a key,
    /// the return or the listing date, in file order.
    ///
    /// # Errors
    /// Returns `SourceError::NotFound` if the weekly file is missing.
    pub fn factor_columns(&self) -> Result<Vec<String>, SourceError> {
        let df = read_csv(&self.weekly_path(), &KEY_COLUMNS).map_err(source_error)?;
        Ok(df
            .get_column_names()
            .iter()
            .map(|c| c.as_str())
            .filter(|c| ![TS_CODE, TRADE_DATE, PCT_CHG, LIST_DATE].contains(c))
            .map(str::to_string)
            .collect())
    }

    fn weekly_path(&self) -> PathBuf {
        self.dir.join(&self.weekly_file)
    }

    fn benchmark_path(&self) -> PathBuf {
        self.dir.join(&self.benchmark_file)
    }
}

impl DataSource for CsvDataSource {
    fn load_weekly(
        &self,
        start: TradeDate,
        end: TradeDate,
        factor_names: &[String],
    ) -> Result<DataFrame, SourceError> {
        let path = self.weekly_path();
        let df = read_csv(&path, &KEY_COLUMNS).map_err(source_error)?;

        ensure_columns(&df, &[TS_CODE, TRADE_DATE, PCT_CHG]).map_err(source_error)?;
        ensure_columns(&df, factor_names).map_err(source_error)?;

        let mut keep: Vec<Expr> = vec![col(TS_CODE), col(TRADE_DATE), col(PCT_CHG)];
        if df.column(LIST_DATE).is_ok() {
            keep.push(col(LIST_DATE));
        }
        keep.extend(factor_names.iter().map(|f| col(f.as_str())));

        let df = within(df.lazy().select(keep).collect()?, start, end)?;
        info!(path = %path.display(), rows = df.height(), %start, %end, "loaded weekly data");
        Ok(df)
    }

    fn load_benchmark(&self, start: TradeDate, end: TradeDate) -> Result<DataFrame, SourceError> {
        let path = self.benchmark_path();
        let df = read_csv(&path, &KEY_COLUMNS).map_err(source_error)?;
        ensure_columns(&df, &[TRADE_DATE, PCT_CHG]).map_err(source_error)?;

        let df = if df.column(TS_CODE).is_ok() {
            df.lazy().filter(col(TS_CODE).eq(lit(self.index_code.as_str()))).collect()?
        } else {
            df
        };
        if df.height() == 0 {
            return Err(SourceError::InvalidData(format!(
                "no benchmark rows for {} in {}",
                self.index_code,
                path.display()
            )));
        }

        let df = within(df.lazy().select([col(TRADE_DATE), col(PCT_CHG)]).collect()?, start, end)?;
        debug!(index = %self.index_code, rows = df.height(), "loaded benchmark");
        Ok(df)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Feature tables kept as CSV files under one directory.
#[derive(Debug, Clone)]
pub struct CsvFeatureStore {
    dir: PathBuf,
}

impl CsvFeatureStore {
    /// Store writing under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FeatureStore for CsvFeatureStore {
    fn persist(
        &self,
        name: &str,
        start: TradeDate,
        end: TradeDate,
        df: &mut DataFrame,
    ) -> Result<PathBuf, SourceError> {
        let path = self.dir.join(dated_file_name(name, start, end, "csv"));
        write_csv(df, &path).map_err(source_error)?;
        info!(path = %path.display(), rows = df.height(), "persisted feature table");
        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<(DataFrame, Vec<String>), SourceError> {
        let df = read_csv(path, &[TS_CODE, TRADE_DATE]).map_err(source_error)?;

        let names: Vec<String> =
            df.get_column_names().iter().map(|c| c.to_string()).collect();
        for (i, expected) in [TS_CODE, TRADE_DATE, TARGET].into_iter().enumerate() {
            if names.get(i).map(String::as_str) != Some(expected) {
                return Err(SourceError::MissingColumn(expected.to_string()));
            }
        }

        let features = names[3..].to_vec();
        if features.is_empty() {
            return Err(SourceError::InvalidData(format!(
                "{} carries no feature columns",
                path.display()
            )));
        }

        info!(path = %path.display(), rows = df.height(), features = features.len(), "loaded feature table");
        Ok((df, features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mlstock-source-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn date(s: &str) -> TradeDate {
        TradeDate::parse(s).unwrap()
    }

    #[test]
    fn weekly_is_windowed_and_projected() {
        let dir = scratch_dir("weekly");
        std::fs::write(
            dir.join("weekly.csv"),
            "ts_code,trade_date,pct_chg,list_date,mom,extra\n\
             A,20181228,1.0,20000101,0.1,9\n\
             A,20190104,2.0,20000101,0.2,9\n\
             A,20190111,3.0,20000101,0.3,9\n",
        )
        .unwrap();

        let source = CsvDataSource::new(&dir);
        let df = source.load_weekly(date("20190101"), date("20190104"), &["mom".into()]).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(df.height(), 1);
        let cols: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(cols, vec!["ts_code", "trade_date", "pct_chg", "list_date", "mom"]);
        assert_eq!(df.column("list_date").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn factor_columns_skip_reserved() {
        let dir = scratch_dir("factor_columns");
        std::fs::write(
            dir.join("weekly.csv"),
            "ts_code,trade_date,pct_chg,mom,list_date,vol\nA,20190104,1.0,0.1,20000101,0.2\n",
        )
        .unwrap();

        let factors = CsvDataSource::new(&dir).factor_columns().unwrap();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(factors, vec!["mom".to_string(), "vol".to_string()]);
    }

    #[test]
    fn undeclared_factor_is_missing_column() {
        let dir = scratch_dir("absent_factor");
        std::fs::write(dir.join("weekly.csv"), "ts_code,trade_date,pct_chg\nA,20190104,1.0\n").unwrap();

        let err = CsvDataSource::new(&dir)
            .load_weekly(date("20190101"), date("20200101"), &["mom".into()])
            .unwrap_err();
        std::fs::remove_dir_all(&dir).ok();
        assert!(matches!(err, SourceError::MissingColumn(ref c) if c == "mom"));
    }

    #[test]
    fn benchmark_selects_index() {
        let dir = scratch_dir("benchmark");
        std::fs::write(
            dir.join("idx.csv"),
            "ts_code,trade_date,pct_chg\n\
             000300.SH,20190104,1.0\n\
             000905.SH,20190104,2.0\n\
             000300.SH,20190111,-1.0\n",
        )
        .unwrap();

        let source = CsvDataSource::new(&dir).with_files("weekly.csv", "idx.csv");
        let df = source.load_benchmark(date("20190101"), date("20191231")).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = CsvDataSource::new(scratch_dir("empty"))
            .load_benchmark(date("20190101"), date("20191231"))
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn store_round_trip() {
        let dir = scratch_dir("store");
        let store = CsvFeatureStore::new(&dir);
        let mut df = df! {
            "ts_code" => &["A", "B"],
            "trade_date" => &["20190104", "20190104"],
            "target" => &[0.5, -0.5],
            "mom" => &[1.0, -1.0],
            "vol" => &[0.1, 0.2],
        }
        .unwrap();

        let path = store.persist("features", date("20190101"), date("20191231"), &mut df).unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        let (back, features) = store.load(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert!(file_name.starts_with("features_20190101_20191231_"));
        assert_eq!(features, vec!["mom".to_string(), "vol".to_string()]);
        assert_eq!(back.height(), 2);
    }

    #[test]
    fn store_rejects_foreign_layout() {
        let dir = scratch_dir("foreign");
        let path = dir.join("other.csv");
        std::fs::write(&path, "trade_date,ts_code,target,mom\n20190104,A,1.0,1.0\n").unwrap();

        let err = CsvFeatureStore::new(&dir).load(&path).unwrap_err();
        std::fs::remove_dir_all(&dir).ok();
        assert!(matches!(err, SourceError::MissingColumn(ref c) if c == "ts_code"));
    }
}
