//! Per-date and per-sentiment breakdowns.
//!
//! Every function returns a [`Section`], unavailable when the table is empty
//! or lacks a column the breakdown groups or aggregates on. Rows missing the
//! grouping key itself are left out of the groups.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sentiment_desk_core::{Classification, Side};
use sentiment_desk_data::{AnalysisTable, Column};
use std::collections::BTreeMap;

use crate::metrics::{mean, sample_std, win_rate};
use crate::section::Section;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub pnl: Decimal,
}

/// Performance of trades taken under one sentiment classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentPerformance {
    pub classification: Classification,
    pub trades: usize,
    pub mean_pnl: Option<f64>,
    pub win_rate: Option<f64>,
    /// Sample standard deviation of PnL, the volatility proxy.
    pub pnl_std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeFrequency {
    pub date: NaiveDate,
    pub classification: Classification,
    pub trades: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideRatio {
    pub classification: Classification,
    pub side: Side,
    pub trades: usize,
    /// Share of this side among the classification's sided trades.
    pub ratio: f64,
}

fn require(table: &AnalysisTable, columns: &[Column]) -> Result<(), String> {
    if table.is_empty() {
        return Err("no trades in selection".to_string());
    }
    let missing = table.columns().missing(columns);
    if missing.is_empty() {
        Ok(())
    } else {
        let names: Vec<&str> = missing.iter().map(Column::name).collect();
        Err(format!("missing column: {}", names.join(", ")))
    }
}

/// Sum of PnL per trade date, ascending.
#[must_use]
pub fn daily_pnl(table: &AnalysisTable) -> Section<Vec<DailyPnl>> {
    if let Err(reason) = require(table, &[Column::ClosedPnl, Column::Timestamp]) {
        return Section::Unavailable(reason);
    }

    let mut by_date: BTreeMap<NaiveDate, Option<Decimal>> = BTreeMap::new();
    for row in table.rows() {
        if let (Some(date), Some(pnl)) = (row.date(), row.pnl()) {
            let sum = by_date.entry(date).or_insert(Some(Decimal::ZERO));
            *sum = sum.and_then(|s| s.checked_add(pnl));
        }
    }
    let Some(by_date) = by_date
        .into_iter()
        .map(|(date, pnl)| pnl.map(|pnl| (date, pnl)))
        .collect::<Option<Vec<_>>>()
    else {
        return Section::unavailable("daily PnL sum exceeds decimal range");
    };

    Section::Available(
        by_date
            .into_iter()
            .map(|(date, pnl)| DailyPnl { date, pnl })
            .collect(),
    )
}

/// Mean PnL, win rate, PnL volatility and trade count per classification.
#[must_use]
pub fn sentiment_performance(table: &AnalysisTable) -> Section<Vec<SentimentPerformance>> {
    if let Err(reason) = require(table, &[Column::Classification, Column::ClosedPnl]) {
        return Section::Unavailable(reason);
    }

    let mut groups: BTreeMap<&Classification, (usize, Vec<Decimal>)> = BTreeMap::new();
    for row in table.rows() {
        let Some(classification) = row.classification() else {
            continue;
        };
        let (trades, pnls) = groups.entry(classification).or_default();
        *trades += 1;
        if let Some(pnl) = row.pnl() {
            pnls.push(pnl);
        }
    }

    Section::Available(
        groups
            .into_iter()
            .map(|(classification, (trades, pnls))| {
                let values: Vec<f64> = pnls
                    .iter()
                    .filter_map(ToPrimitive::to_f64)
                    .collect();
                SentimentPerformance {
                    classification: classification.clone(),
                    trades,
                    mean_pnl: mean(&values),
                    win_rate: win_rate(&pnls),
                    pnl_std: sample_std(&values),
                }
            })
            .collect(),
    )
}

/// Trade count per (date, classification), ordered by date then label.
#[must_use]
pub fn trade_frequency(table: &AnalysisTable) -> Section<Vec<TradeFrequency>> {
    if let Err(reason) = require(table, &[Column::Classification, Column::Timestamp]) {
        return Section::Unavailable(reason);
    }

    let mut counts: BTreeMap<(NaiveDate, &Classification), usize> = BTreeMap::new();
    for row in table.rows() {
        if let (Some(date), Some(classification)) = (row.date(), row.classification()) {
            *counts.entry((date, classification)).or_default() += 1;
        }
    }

    Section::Available(
        counts
            .into_iter()
            .map(|((date, classification), trades)| TradeFrequency {
                date,
                classification: classification.clone(),
                trades,
            })
            .collect(),
    )
}

/// Share of each side within each classification. Ratios of one
/// classification sum to 1.
#[must_use]
pub fn side_ratios(table: &AnalysisTable) -> Section<Vec<SideRatio>> {
    if let Err(reason) = require(table, &[Column::Classification, Column::Side]) {
        return Section::Unavailable(reason);
    }

    let mut counts: BTreeMap<&Classification, BTreeMap<&Side, usize>> = BTreeMap::new();
    for row in table.rows() {
        if let (Some(classification), Some(side)) = (row.classification(), row.side()) {
            *counts
                .entry(classification)
                .or_default()
                .entry(side)
                .or_default() += 1;
        }
    }

    let mut ratios = Vec::new();
    for (classification, sides) in counts {
        let total: usize = sides.values().sum();
        for (side, trades) in sides {
            #[allow(clippy::cast_precision_loss)]
            let ratio = trades as f64 / total as f64;
            ratios.push(SideRatio {
                classification: classification.clone(),
                side: side.clone(),
                trades,
                ratio,
            });
        }
    }
    Section::Available(ratios)
}
