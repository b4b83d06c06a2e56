//! Derived columns and the frozen analysis table.
//!
//! Percentage changes only mean something over an unbroken, ordered sequence.
//! [`FeatureDeriver::derive`] therefore sorts the merged table by date, computes
//! every derived column once, and seals the result in an [`AnalysisTable`].
//! Nothing downstream can recompute a derived column: rows are read-only and
//! filtering copies them with their features intact.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sentiment_desk_core::{Classification, Side};
use std::collections::BTreeSet;

use crate::merge::{MergedRow, MergedTable};
use crate::models::{Column, ColumnSet, TradeRecord};

/// Fractional change from `previous` to `current`, undefined when either is
/// missing or `previous` is zero.
#[must_use]
pub fn fractional_change(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    match (previous, current) {
        (Some(p), Some(c)) if p != 0.0 => Some((c - p) / p),
        _ => None,
    }
}

/// One analysis-ready row. Read-only outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRow {
    trade: TradeRecord,
    classification: Option<Classification>,
    sentiment_value: Option<f64>,
    volume_change: Option<f64>,
    price_return: Option<f64>,
}

impl AnalysisRow {
    #[must_use]
    pub fn trade(&self) -> &TradeRecord {
        &self.trade
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.trade.timestamp
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.trade.date
    }

    #[must_use]
    pub fn pnl(&self) -> Option<Decimal> {
        self.trade.closed_pnl
    }

    /// PnL as `f64` for statistics.
    #[must_use]
    pub fn pnl_f64(&self) -> Option<f64> {
        self.trade.closed_pnl.and_then(|p| p.to_f64())
    }

    #[must_use]
    pub fn side(&self) -> Option<&Side> {
        self.trade.side.as_ref()
    }

    #[must_use]
    pub fn classification(&self) -> Option<&Classification> {
        self.classification.as_ref()
    }

    #[must_use]
    pub fn sentiment_value(&self) -> Option<f64> {
        self.sentiment_value
    }

    /// Change of the sentiment value against the previous date in the table.
    #[must_use]
    pub fn volume_change(&self) -> Option<f64> {
        self.volume_change
    }

    /// Change of execution price against the previous trade by timestamp.
    #[must_use]
    pub fn price_return(&self) -> Option<f64> {
        self.price_return
    }
}

/// The merged table with derived columns computed and frozen.
///
/// Rows are sorted by date ascending (undated rows last, file order kept within
/// a date). Only [`FeatureDeriver::derive`] creates one from scratch;
/// [`AnalysisTable::empty`] is the derivation of an empty merge.
#[derive(Debug, Clone)]
pub struct AnalysisTable {
    rows: Vec<AnalysisRow>,
    columns: ColumnSet,
}

impl AnalysisTable {
    /// A table with no rows and no columns.
    #[must_use]
    pub fn empty() -> Self {
        FeatureDeriver::derive(MergedTable::default())
    }

    #[must_use]
    pub fn rows(&self) -> &[AnalysisRow] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies the rows accepted by `keep`, derived columns unchanged.
    #[must_use]
    pub fn retain_rows<F>(&self, mut keep: F) -> AnalysisTable
    where
        F: FnMut(&AnalysisRow) -> bool,
    {
        AnalysisTable {
            rows: self.rows.iter().filter(|r| keep(*r)).cloned().collect(),
            columns: self.columns.clone(),
        }
    }

    /// Distinct classifications present, in ordinal order.
    #[must_use]
    pub fn classifications(&self) -> BTreeSet<Classification> {
        self.rows
            .iter()
            .filter_map(|r| r.classification.clone())
            .collect()
    }

    /// First and last trade dates, if any row has a date.
    #[must_use]
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.rows.iter().filter_map(AnalysisRow::date);
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some((min, max))
    }
}

pub struct FeatureDeriver;

impl FeatureDeriver {
    /// Sorts the merged table by date and computes all derived columns.
    #[must_use]
    pub fn derive(merged: MergedTable) -> AnalysisTable {
        let MergedTable {
            mut rows, columns, ..
        } = merged;

        // Stable: rows sharing a date keep their file order.
        rows.sort_by_key(|r| (r.trade.date.is_none(), r.trade.date));

        let volume_changes = Self::volume_changes(&rows);
        let price_returns = Self::price_returns(&rows);

        let mut columns = columns;
        if columns.contains(Column::Value) {
            columns.insert(Column::VolumeChange);
        }
        if columns.contains(Column::ExecutionPrice) {
            columns.insert(Column::PriceReturn);
        }

        let rows: Vec<AnalysisRow> = rows
            .into_iter()
            .zip(volume_changes)
            .zip(price_returns)
            .map(|((row, volume_change), price_return)| AnalysisRow {
                trade: row.trade,
                classification: row.classification,
                sentiment_value: row.sentiment_value,
                volume_change,
                price_return,
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            with_volume_change = rows.iter().filter(|r| r.volume_change.is_some()).count(),
            "derived features"
        );

        AnalysisTable { rows, columns }
    }

    /// Sentiment change between consecutive distinct dates.
    ///
    /// Expects `rows` sorted by date. Every row of a date receives that date's
    /// change against the immediately preceding date in the table; the first
    /// date and undated rows get `None`.
    fn volume_changes(rows: &[MergedRow]) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(rows.len());
        let mut previous: Option<(NaiveDate, Option<f64>)> = None;
        let mut current: Option<(NaiveDate, Option<f64>, Option<f64>)> = None;

        for row in rows {
            let Some(date) = row.trade.date else {
                out.push(None);
                continue;
            };

            match current {
                Some((d, _, change)) if d == date => out.push(change),
                _ => {
                    if let Some((d, value, _)) = current {
                        previous = Some((d, value));
                    }
                    let change = previous.and_then(|(_, prev)| fractional_change(prev, row.sentiment_value));
                    current = Some((date, row.sentiment_value, change));
                    out.push(change);
                }
            }
        }

        out
    }

    /// Execution-price change between consecutive timestamped trades.
    fn price_returns(rows: &[MergedRow]) -> Vec<Option<f64>> {
        let mut out = vec![None; rows.len()];

        let mut order: Vec<usize> = (0..rows.len())
            .filter(|&i| rows[i].trade.timestamp.is_some())
            .collect();
        order.sort_by_key(|&i| rows[i].trade.timestamp);

        for pair in order.windows(2) {
            let previous = rows[pair[0]].trade.execution_price.and_then(|p| p.to_f64());
            let current = rows[pair[1]].trade.execution_price.and_then(|p| p.to_f64());
            out[pair[1]] = fractional_change(previous, current);
        }

        out
    }
}
