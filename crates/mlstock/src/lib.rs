//! # mlstock
//!
//! Weekly stock factor dataset assembly and model training.
//!
//! This crate re-exports the mlstock workspace crates as modules and ships
//! the `mlstock` command line. Components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full`: Enables all components
//! - `primitives`: Column names, trade dates and stock codes
//! - `traits`: Data source, feature store and trainer traits
//! - `math`: Robust statistics, clipping, scaling and ridge kernels
//! - `utils`: CSV and missing-value utilities
//! - `dataset`: Dataset assembly pipeline
//! - `train`: Model training and evaluation
//! - `cli` (default): The `mlstock` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use mlstock::dataset::{CsvDataSource, CsvFeatureStore, DatasetAssembler, PipelineConfig};
//!
//! let assembler = DatasetAssembler::new(PipelineConfig::new(start, end, factors))?;
//! let dataset = assembler.run(&CsvDataSource::new("data"), &CsvFeatureStore::new("out"))?;
//! ```

#![doc(issue_tracker_base_url = "https://github.com/mlstock/mlstock-rs/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use mlstock_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use mlstock_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use mlstock_math as math;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use mlstock_utils as utils;
#[cfg(feature = "dataset")]
#[doc(inline)]
pub use mlstock_dataset as dataset;
#[cfg(feature = "train")]
#[doc(inline)]
pub use mlstock_train as train;

// Used by the binary only.
#[cfg(feature = "cli")]
use {clap as _, tracing as _, tracing_subscriber as _};
