//! Left join of trades onto the sentiment index by calendar day.

use chrono::NaiveDate;
use sentiment_desk_core::Classification;
use std::collections::{HashMap, HashSet};

use crate::models::{ColumnSet, SentimentRecord, SentimentTable, TradeRecord, TradeTable};

/// A trade with the sentiment of its day attached, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub trade: TradeRecord,
    pub classification: Option<Classification>,
    pub sentiment_value: Option<f64>,
}

/// Output of [`merge`]; rows are in trade-file order.
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    pub rows: Vec<MergedRow>,
    pub columns: ColumnSet,
    /// Sentiment rows discarded because an earlier row had the same date
    pub duplicate_dates: usize,
}

/// Keeps the first sentiment row for each date, preserving input order.
///
/// Returns the deduplicated rows and how many were discarded.
#[must_use]
pub fn dedup_by_date(records: Vec<SentimentRecord>) -> (Vec<SentimentRecord>, usize) {
    let mut seen = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut discarded = 0;

    for record in records {
        if seen.insert(record.date) {
            kept.push(record);
        } else {
            discarded += 1;
        }
    }

    (kept, discarded)
}

/// Left-joins every trade onto the sentiment row for its date.
///
/// The output has exactly one row per input trade. Trades without a date, or
/// whose date has no sentiment row, keep `None` for the sentiment fields.
#[must_use]
pub fn merge(trades: TradeTable, sentiment: SentimentTable) -> MergedTable {
    let columns = trades.columns.union(&sentiment.columns);
    let (unique, duplicate_dates) = dedup_by_date(sentiment.records);

    if duplicate_dates > 0 {
        tracing::warn!(
            "Sentiment has {} duplicate dates, keeping first occurrence",
            duplicate_dates
        );
    }

    let by_date: HashMap<NaiveDate, SentimentRecord> =
        unique.into_iter().map(|r| (r.date, r)).collect();

    let mut matched = 0usize;
    let rows: Vec<MergedRow> = trades
        .records
        .into_iter()
        .map(|trade| {
            let day = trade.date.and_then(|d| by_date.get(&d));
            if day.is_some() {
                matched += 1;
            }
            MergedRow {
                classification: day.and_then(|s| s.classification.clone()),
                sentiment_value: day.and_then(|s| s.value),
                trade,
            }
        })
        .collect();

    tracing::info!(
        "Merged {} trades, {} with sentiment, {} without",
        rows.len(),
        matched,
        rows.len() - matched
    );

    MergedTable {
        rows,
        columns,
        duplicate_dates,
    }
}
