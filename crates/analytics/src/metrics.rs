use rust_decimal::Decimal;
use serde::Serialize;
use sentiment_desk_data::{AnalysisTable, Column};

/// Headline figures for the selected rows.
///
/// PnL-derived fields are `None` (rendered N/A) when the table is empty, has
/// no PnL column, or every PnL cell is missing. The total and mean are also
/// `None` when the sum leaves the decimal range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_trades: usize,
    pub trades_with_pnl: usize,
    pub total_pnl: Option<Decimal>,
    pub mean_pnl: Option<Decimal>,
    /// Percentage in `[0, 100]`.
    pub win_rate: Option<f64>,
}

impl Kpis {
    #[must_use]
    pub fn compute(table: &AnalysisTable) -> Self {
        let pnls: Vec<Decimal> = if table.columns().contains(Column::ClosedPnl) {
            table.rows().iter().filter_map(|r| r.pnl()).collect()
        } else {
            Vec::new()
        };

        let total_pnl = if pnls.is_empty() {
            None
        } else {
            checked_sum(pnls.iter().copied())
        };
        let mean_pnl = total_pnl.and_then(|total| total.checked_div(Decimal::from(pnls.len())));

        Self {
            total_trades: table.len(),
            trades_with_pnl: pnls.len(),
            total_pnl,
            mean_pnl,
            win_rate: win_rate(&pnls),
        }
    }
}

/// Sum that stops at `None` instead of overflowing.
#[must_use]
pub fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// `count(pnl > 0) / count(pnl) * 100`, `None` without values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn win_rate(pnls: &[Decimal]) -> Option<f64> {
    if pnls.is_empty() {
        return None;
    }
    let wins = pnls.iter().filter(|p| **p > Decimal::ZERO).count();
    Some(wins as f64 / pnls.len() as f64 * 100.0)
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N - 1), `None` below two values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}
