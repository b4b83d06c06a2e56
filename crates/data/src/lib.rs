//! Data preparation for trade/sentiment analytics.
//!
//! This crate provides:
//! - CSV loading with header normalization and type coercion
//! - Left join of trades onto the daily sentiment index
//! - Derived features frozen into an `AnalysisTable`
//! - Date/sentiment filtering, a file-stamp keyed load cache, and CSV export

pub mod cache;
pub mod csv_storage;
pub mod error;
pub mod features;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod models;

pub use cache::{load_dataset, FileStamp, LoadCache, LoadedDataset};
pub use csv_storage::CsvStorage;
pub use error::DataError;
pub use features::{fractional_change, AnalysisRow, AnalysisTable, FeatureDeriver};
pub use filter::FilterSpec;
pub use loader::{LoadReport, Loader};
pub use merge::{dedup_by_date, merge, MergedRow, MergedTable};
pub use models::{Column, ColumnSet, SentimentRecord, SentimentTable, TradeRecord, TradeTable};
