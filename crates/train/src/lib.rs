#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mlstock/mlstock-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod target;
pub use target::{TargetMode, TrainAction};

mod split;
pub use split::{TrainTestSplit, split_by_date};

mod ridge;
pub use ridge::{LinearClassifier, LinearModel, RidgeClassifier, RidgeConfig, RidgeRegressor};

mod metrics;
pub use metrics::{
    ClassificationMetrics, Evaluation, RegressionMetrics, accuracy_score, r2_score,
};

mod search;
pub use search::{GridSearch, SearchResult, kfold_indices};

mod config;
pub use config::{DEFAULT_ALPHAS, DEFAULT_FOLDS, TrainConfig};

mod persist;
pub use persist::SavedModel;

mod runner;
pub use runner::{TrainOutcome, train, train_mode};

mod error;
pub use error::TrainError;

/// Re-export commonly used types.
pub mod prelude {
    pub use mlstock_traits::{ModelTrainer, Predictor};

    pub use super::{TargetMode, TrainAction, TrainConfig, TrainError, train, train_mode};
}
