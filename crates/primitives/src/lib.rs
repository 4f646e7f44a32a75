#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mlstock/mlstock-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod code;
pub use code::StockCode;

mod date;
pub use date::TradeDate;

pub mod columns;

mod error;
pub use error::PrimitiveError;
