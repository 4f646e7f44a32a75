#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mlstock/mlstock-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod csv;
pub use csv::{keys_as_strings, read_csv, write_csv};

mod missing;
pub use missing::{ensure_columns, float_values, normalize_missing, string_values};

mod naming;
pub use naming::{dated_file_name, stamped_file_name, timestamp};

mod error;
pub use error::UtilsError;
