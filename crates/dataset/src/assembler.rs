//! Dataset assembly as a sequence of typed states.
//!
//! Each state is a [`FeatureTable`] parameterised by a marker type; the
//! transition methods exist only on the state they start from and consume
//! it, so stages cannot be skipped or reordered.

use std::{marker::PhantomData, path::Path};

use mlstock_math::MadClipper;
use mlstock_primitives::{
    TradeDate,
    columns::{LIST_DATE, TARGET, TRADE_DATE, TS_CODE},
};
use mlstock_traits::{DataSource, FeatureStore};
use mlstock_utils::{ensure_columns, normalize_missing};
use polars::prelude::*;
use tracing::{info, warn};

use crate::{
    Dataset, DatasetError, PipelineConfig, PipelineState, StageReport,
    dedup::deduplicate,
    filter::{
        filter_date_floor, filter_dense, filter_invalid_features, filter_missing_labels,
        filter_stock_coverage,
    },
    label::attach_labels,
    scale::{clip_features, fit_robust_stats, standardize_features},
};

/// Marker for a pipeline state.
pub trait Stage {
    /// The state this marker stands for.
    const STATE: PipelineState;
}

macro_rules! stages {
    ($($(#[$doc:meta])* $name:ident => $state:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Stage for $name {
                const STATE: PipelineState = PipelineState::$state;
            }
        )*
    };
}

stages! {
    /// Labelled input with normalized missing values.
    Raw => Raw;
    /// Rows before the start date removed.
    DateFiltered => DateFiltered;
    /// Unlabelled rows removed.
    LabelFiltered => LabelFiltered;
    /// Sparse and feature-less stocks removed.
    StockCoverageFiltered => StockCoverageFiltered;
    /// Features clipped.
    Clipped => Clipped;
    /// Features standardized.
    Standardized => Standardized;
    /// Incomplete rows removed.
    DenseFiltered => DenseFiltered;
    /// Keys unique.
    Deduplicated => Deduplicated;
}

/// A feature table in state `S`.
#[derive(Debug, Clone)]
pub struct FeatureTable<S> {
    df: DataFrame,
    features: Vec<String>,
    reports: Vec<StageReport>,
    _state: PhantomData<S>,
}

impl<S: Stage> FeatureTable<S> {
    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        S::STATE
    }

    /// Current table.
    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Ordered feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    /// Reports of the stages run so far.
    #[must_use]
    pub fn reports(&self) -> &[StageReport] {
        &self.reports
    }

    /// Move the frame through `stage` and append the reports it returns.
    fn step<T: Stage>(
        self,
        stage: impl FnOnce(DataFrame, &[String]) -> Result<(DataFrame, Vec<StageReport>), DatasetError>,
    ) -> Result<FeatureTable<T>, DatasetError> {
        let Self { df, features, mut reports, .. } = self;
        let (df, produced) = stage(df, &features)?;
        reports.extend(produced);
        Ok(FeatureTable { df, features, reports, _state: PhantomData })
    }
}

impl FeatureTable<Raw> {
    /// Enter the pipeline with a labelled table.
    ///
    /// Every feature and `target` are cast to floats with `NaN`/`Inf`
    /// turned into nulls.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if a key, `target` or a feature
    /// is absent.
    pub fn new(labelled: DataFrame, features: Vec<String>) -> Result<Self, DatasetError> {
        ensure_columns(&labelled, &[TS_CODE, TRADE_DATE, TARGET])?;
        ensure_columns(&labelled, &features)?;

        let df = normalize_missing(labelled, &features)?;
        let df = normalize_missing(df, &[TARGET])?;
        info!(rows = df.height(), features = features.len(), "pipeline input");

        Ok(Self { df, features, reports: Vec::new(), _state: PhantomData })
    }

    /// Drop warm-up rows and, optionally, rows too close to listing.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if the listing rule is enabled
    /// without a `list_date` column.
    pub fn filter_dates(
        self,
        start: TradeDate,
        min_listing_years: Option<u32>,
    ) -> Result<FeatureTable<DateFiltered>, DatasetError> {
        self.step(|df, _| {
            let (df, report) = filter_date_floor(df, start, min_listing_years)?;
            Ok((df, vec![report]))
        })
    }
}

impl FeatureTable<DateFiltered> {
    /// Drop rows without a label.
    ///
    /// # Errors
    /// Propagates table errors.
    pub fn filter_labels(self) -> Result<FeatureTable<LabelFiltered>, DatasetError> {
        self.step(|df, _| {
            let (df, report) = filter_missing_labels(df)?;
            Ok((df, vec![report]))
        })
    }
}

impl FeatureTable<LabelFiltered> {
    /// Drop sparse stocks, then stocks lacking a feature entirely.
    ///
    /// # Errors
    /// Propagates table errors.
    pub fn filter_stocks(
        self,
        max_missing_ratio: f64,
    ) -> Result<FeatureTable<StockCoverageFiltered>, DatasetError> {
        self.step(|df, features| {
            let (df, coverage) = filter_stock_coverage(df, features, max_missing_ratio)?;
            let (df, validity) = filter_invalid_features(df, features)?;
            Ok((df, vec![coverage, validity]))
        })
    }
}

impl FeatureTable<StockCoverageFiltered> {
    /// Clip every feature at its MAD bounds over the current table.
    ///
    /// # Errors
    /// Propagates table errors.
    pub fn clip(self, clipper: &MadClipper) -> Result<FeatureTable<Clipped>, DatasetError> {
        self.step(|df, features| {
            let stats = fit_robust_stats(&df, features)?;
            Ok((clip_features(df, features, &stats, clipper)?, Vec::new()))
        })
    }
}

impl FeatureTable<Clipped> {
    /// Standardize every feature over the current table.
    ///
    /// # Errors
    /// Propagates table errors.
    pub fn standardize(self) -> Result<FeatureTable<Standardized>, DatasetError> {
        self.step(|df, features| Ok((standardize_features(df, features)?, Vec::new())))
    }
}

impl FeatureTable<Standardized> {
    /// Drop rows with any missing feature or label.
    ///
    /// # Errors
    /// Propagates table errors.
    pub fn filter_dense(self) -> Result<FeatureTable<DenseFiltered>, DatasetError> {
        self.step(|df, features| {
            let (df, report) = filter_dense(df, features)?;
            Ok((df, vec![report]))
        })
    }
}

impl FeatureTable<DenseFiltered> {
    /// Keep the first row of every key.
    ///
    /// # Errors
    /// Propagates table errors.
    pub fn deduplicate(self) -> Result<FeatureTable<Deduplicated>, DatasetError> {
        self.step(|df, _| {
            let (df, report) = deduplicate(df)?;
            Ok((df, vec![report]))
        })
    }
}

impl FeatureTable<Deduplicated> {
    /// Finish without persisting.
    ///
    /// # Errors
    /// Returns `DatasetError::NotDense` if the table is not dense.
    pub fn into_dataset(self) -> Result<Dataset, DatasetError> {
        let Self { df, features, reports, .. } = self;
        Ok(Dataset::new(df, features)?.with_reports(reports))
    }

    /// Write the table through `store` and finish.
    ///
    /// # Errors
    /// Returns `DatasetError::Source` if the store fails.
    pub fn persist(
        self,
        store: &impl FeatureStore,
        name: &str,
        start: TradeDate,
        end: TradeDate,
    ) -> Result<Dataset, DatasetError> {
        let Self { df, features, reports, .. } = self;
        let dataset = Dataset::new(df, features)?;

        let mut table = dataset.table().clone();
        let path = store.persist(name, start, end, &mut table)?;
        info!(
            state = %PipelineState::Persisted,
            path = %path.display(),
            rows = table.height(),
            "feature table written"
        );

        Ok(dataset.with_path(path).with_reports(reports))
    }
}

/// Runs the full pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct DatasetAssembler {
    config: PipelineConfig,
    clipper: MadClipper,
}

impl DatasetAssembler {
    /// Create an assembler.
    ///
    /// # Errors
    /// Returns `DatasetError::InvalidConfig` if the configuration is invalid.
    pub fn new(config: PipelineConfig) -> Result<Self, DatasetError> {
        config.validate()?;
        let clipper = MadClipper::new(config.mad_multiplier)?;
        Ok(Self { config, clipper })
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Label, filter, scale and deduplicate `weekly` against `benchmark`.
    ///
    /// # Errors
    /// Returns `DatasetError::MissingColumn` if an input lacks a required
    /// column or a declared factor.
    pub fn assemble(
        &self,
        weekly: DataFrame,
        benchmark: DataFrame,
    ) -> Result<FeatureTable<Deduplicated>, DatasetError> {
        let config = &self.config;
        ensure_columns(&weekly, &config.factor_names)?;
        if config.min_listing_years.is_some() {
            ensure_columns(&weekly, &[LIST_DATE])?;
        }

        let labelled = attach_labels(weekly, benchmark, config.label_shift)?;
        let table = FeatureTable::new(labelled, config.factor_names.clone())?
            .filter_dates(config.start_date, config.min_listing_years)?
            .filter_labels()?
            .filter_stocks(config.max_missing_ratio)?
            .clip(&self.clipper)?
            .standardize()?
            .filter_dense()?
            .deduplicate()?;

        if table.frame().height() == 0 {
            warn!(name = %config.name, "pipeline produced an empty table");
        }
        Ok(table)
    }

    /// Load from `source`, assemble and persist to `store`.
    ///
    /// # Errors
    /// Returns the first error of any stage; nothing is persisted on error.
    pub fn run(
        &self,
        source: &impl DataSource,
        store: &impl FeatureStore,
    ) -> Result<Dataset, DatasetError> {
        let config = &self.config;
        let load_start = config.load_start();
        info!(
            source = source.name(),
            start = %config.start_date,
            load_start = %load_start,
            end = %config.end_date,
            "assembling dataset"
        );

        let weekly = source.load_weekly(load_start, config.end_date, &config.factor_names)?;
        let benchmark = source.load_benchmark(load_start, config.end_date)?;

        self.assemble(weekly, benchmark)?.persist(
            store,
            &config.name,
            config.start_date,
            config.end_date,
        )
    }
}

/// Load a previously persisted dataset.
///
/// # Errors
/// Returns `DatasetError::Source` if the file cannot be read.
pub fn load_from_file(store: &impl FeatureStore, path: &Path) -> Result<Dataset, DatasetError> {
    let (table, features) = store.load(path)?;
    Dataset::from_persisted(table, features, path)
}
