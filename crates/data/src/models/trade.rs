//! Trade history data model.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sentiment_desk_core::Side;
use serde::{Deserialize, Serialize};

use super::columns::ColumnSet;

/// One row of the broker's trade history after type coercion.
///
/// Every field is optional: a column may be absent from the file, and a cell
/// that fails to parse is kept as `None` rather than dropping the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 1-based data row number in the source file
    pub source_row: usize,
    /// Execution time as written by the broker (no timezone conversion)
    pub timestamp: Option<NaiveDateTime>,
    /// Calendar day of `timestamp`, the join key against sentiment
    pub date: Option<NaiveDate>,
    /// Fill price
    pub execution_price: Option<Decimal>,
    /// Fill size in tokens
    pub size: Option<Decimal>,
    /// Realized profit and loss when the position closed
    pub closed_pnl: Option<Decimal>,
    /// Long or short
    pub side: Option<Side>,
    /// Trader account identifier
    pub account: Option<String>,
    /// Traded asset
    pub coin: Option<String>,
}

impl TradeRecord {
    /// Creates a record stamped at `timestamp`, deriving its date.
    #[must_use]
    pub fn at(source_row: usize, timestamp: NaiveDateTime) -> Self {
        Self {
            source_row,
            timestamp: Some(timestamp),
            date: Some(timestamp.date()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_pnl(mut self, pnl: Decimal) -> Self {
        self.closed_pnl = Some(pnl);
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.execution_price = Some(price);
        self
    }

    /// Returns true if the trade closed with a positive PnL.
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.closed_pnl.is_some_and(|p| p > Decimal::ZERO)
    }
}

/// Trade rows plus the logical columns their source provided.
#[derive(Debug, Clone, Default)]
pub struct TradeTable {
    pub records: Vec<TradeRecord>,
    pub columns: ColumnSet,
}

impl TradeTable {
    #[must_use]
    pub fn new(records: Vec<TradeRecord>, columns: ColumnSet) -> Self {
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
