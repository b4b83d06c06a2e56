//! Typed table models for the two inputs.

pub mod columns;
pub mod sentiment;
pub mod trade;

pub use columns::{Column, ColumnSet};
pub use sentiment::{SentimentRecord, SentimentTable};
pub use trade::{TradeRecord, TradeTable};
