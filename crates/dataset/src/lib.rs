#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mlstock/mlstock-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod label;
pub use label::{attach_labels, forward_label};

pub mod filter;

pub mod scale;

mod dedup;
pub use dedup::{deduplicate, has_unique_keys};

mod report;
pub use report::{PipelineState, StageReport, count_stocks};

mod config;
pub use config::{
    DEFAULT_DATASET_NAME, DEFAULT_LABEL_SHIFT, DEFAULT_MAX_MISSING_RATIO, PipelineConfig,
};

mod dataset;
pub use dataset::Dataset;

mod assembler;
pub use assembler::{
    Clipped, DatasetAssembler, DateFiltered, Deduplicated, DenseFiltered, FeatureTable,
    LabelFiltered, Raw, Stage, Standardized, StockCoverageFiltered, load_from_file,
};

mod source;
pub use source::{CsvDataSource, CsvFeatureStore};

mod error;
pub use error::DatasetError;

/// Re-export commonly used types.
pub mod prelude {
    pub use mlstock_traits::{DataSource, FeatureStore};

    pub use super::{
        CsvDataSource, CsvFeatureStore, Dataset, DatasetAssembler, DatasetError, PipelineConfig,
        load_from_file,
    };
}
