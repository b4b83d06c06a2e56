//! Fear & greed index data model.

use chrono::NaiveDate;
use sentiment_desk_core::Classification;
use serde::{Deserialize, Serialize};

use super::columns::ColumnSet;

/// One day of the sentiment index.
///
/// Rows without a parseable date cannot be joined and are dropped at load
/// time, so `date` is the only required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub classification: Option<Classification>,
    /// Index magnitude, 0 (extreme fear) to 100 (extreme greed)
    pub value: Option<f64>,
}

impl SentimentRecord {
    #[must_use]
    pub fn new(date: NaiveDate, classification: Classification, value: f64) -> Self {
        Self {
            date,
            classification: Some(classification),
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentTable {
    pub records: Vec<SentimentRecord>,
    pub columns: ColumnSet,
}

impl SentimentTable {
    #[must_use]
    pub fn new(records: Vec<SentimentRecord>, columns: ColumnSet) -> Self {
        Self { records, columns }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
