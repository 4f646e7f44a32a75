#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mlstock/mlstock-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod robust;
pub use robust::{RobustStats, median};

mod winsorize;
pub use winsorize::{DEFAULT_MAD_MULTIPLIER, MadClipper, mad_clip, mad_clip_expr};

mod standardize;
pub use standardize::{Standardizer, standardize};

mod linalg;
pub use linalg::{RidgeSolution, ridge_regression, solve_linear_system};

mod error;
pub use error::MathError;
