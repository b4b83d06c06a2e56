use chrono::NaiveDate;
use serde::Serialize;
use sentiment_desk_data::{AnalysisTable, FilterSpec};
use sentiment_desk_model::{ModelError, ModelSummary, TrainingOutcome};

use crate::grouping::{
    daily_pnl, sentiment_performance, side_ratios, trade_frequency, DailyPnl, SentimentPerformance,
    SideRatio, TradeFrequency,
};
use crate::metrics::Kpis;
use crate::recommendations::{self, Recommendations};
use crate::section::Section;

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub filter: FilterSpec,
    /// Trade date span of the selected rows.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub kpis: Kpis,
    pub daily_pnl: Section<Vec<DailyPnl>>,
    /// Feeds the mean PnL, win rate and volatility bars.
    pub by_sentiment: Section<Vec<SentimentPerformance>>,
    pub trade_frequency: Section<Vec<TradeFrequency>>,
    pub side_ratios: Section<Vec<SideRatio>>,
    pub classifier: Section<ModelSummary>,
    pub recommendations: Option<&'static Recommendations>,
}

impl DashboardReport {
    /// Aggregates `table`, already filtered by `filter`.
    #[must_use]
    pub fn build(
        table: &AnalysisTable,
        filter: &FilterSpec,
        classifier: Section<ModelSummary>,
    ) -> Self {
        let kpis = Kpis::compute(table);
        Self {
            filter: filter.clone(),
            date_range: table.date_range(),
            daily_pnl: daily_pnl(table),
            by_sentiment: sentiment_performance(table),
            trade_frequency: trade_frequency(table),
            side_ratios: side_ratios(table),
            classifier,
            recommendations: recommendations::for_trade_count(kpis.total_trades),
            kpis,
        }
    }
}

/// Folds a training attempt into a report section.
#[must_use]
pub fn classifier_section(result: Result<TrainingOutcome, ModelError>) -> Section<ModelSummary> {
    match result {
        Ok(TrainingOutcome::Trained(trained)) => Section::Available(trained.summary()),
        Ok(TrainingOutcome::Unavailable { missing }) => {
            let names: Vec<&str> = missing.iter().map(|c| c.name()).collect();
            Section::Unavailable(format!(
                "required features not available: {}",
                names.join(", ")
            ))
        }
        Err(err) => Section::Unavailable(err.to_string()),
    }
}
