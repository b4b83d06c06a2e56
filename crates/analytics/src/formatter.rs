#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

use crate::report::DashboardReport;
use crate::section::Section;
use sentiment_desk_model::ModelSummary;

const RULE: &str = "═══════════════════════════════════════════════════════════════\n";
const THIN: &str = "───────────────────────────────────────────────────────────────\n";

pub struct ReportFormatter;

fn na<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| "N/A".to_string(), render)
}

impl ReportFormatter {
    /// Pretty-printed JSON of the whole report.
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(report: &DashboardReport) -> serde_json::Result<String> {
        serde_json::to_string_pretty(report)
    }

    #[must_use]
    pub fn format(report: &DashboardReport) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(RULE);
        output.push_str("           TRADER PERFORMANCE VS MARKET SENTIMENT              \n");
        output.push_str(RULE);
        output.push('\n');

        Self::push_kpis(&mut output, report);
        Self::push_daily_pnl(&mut output, report);
        Self::push_sentiment(&mut output, report);
        Self::push_frequency(&mut output, report);
        Self::push_sides(&mut output, report);
        Self::push_volatility(&mut output, report);
        output.push_str(&Self::format_classifier(&report.classifier));
        Self::push_recommendations(&mut output, report);

        output.push_str(RULE);
        output
    }

    fn header(output: &mut String, title: &str) {
        output.push_str(title);
        output.push('\n');
        output.push_str(THIN);
    }

    fn unavailable(output: &mut String, reason: &str) {
        output.push_str(&format!("Unavailable ({})\n\n", reason));
    }

    fn push_kpis(output: &mut String, report: &DashboardReport) {
        Self::header(output, "Overall Performance");
        if let Some((start, end)) = report.date_range {
            output.push_str(&format!("Period:                {} to {}\n", start, end));
        }
        let kpis = &report.kpis;
        output.push_str(&format!("Total Trades:          {}\n", kpis.total_trades));
        output.push_str(&format!(
            "Total PnL:             {}\n",
            na(kpis.total_pnl, |v| format!("{:.2}", v))
        ));
        output.push_str(&format!(
            "Mean PnL:              {}\n",
            na(kpis.mean_pnl, |v| format!("{:.2}", v))
        ));
        output.push_str(&format!(
            "Win Rate:              {}\n",
            na(kpis.win_rate, |v| format!("{:.2}%", v))
        ));
        output.push('\n');
    }

    fn push_daily_pnl(output: &mut String, report: &DashboardReport) {
        Self::header(output, "Daily PnL Trend");
        match &report.daily_pnl {
            Section::Available(days) => {
                for day in days {
                    output.push_str(&format!("{}            {:>14.2}\n", day.date, day.pnl));
                }
                output.push('\n');
            }
            Section::Unavailable(reason) => Self::unavailable(output, reason),
        }
    }

    fn push_sentiment(output: &mut String, report: &DashboardReport) {
        Self::header(output, "Performance by Sentiment");
        match &report.by_sentiment {
            Section::Available(groups) => {
                output.push_str(&format!(
                    "{:<16} {:>8} {:>14} {:>10}\n",
                    "Sentiment", "Trades", "Avg PnL", "Win Rate"
                ));
                for g in groups {
                    output.push_str(&format!(
                        "{:<16} {:>8} {:>14} {:>10}\n",
                        g.classification.to_string(),
                        g.trades,
                        na(g.mean_pnl, |v| format!("{:.2}", v)),
                        na(g.win_rate, |v| format!("{:.2}%", v)),
                    ));
                }
                output.push('\n');
            }
            Section::Unavailable(reason) => Self::unavailable(output, reason),
        }
    }

    fn push_frequency(output: &mut String, report: &DashboardReport) {
        Self::header(output, "Daily Trade Frequency");
        match &report.trade_frequency {
            Section::Available(rows) => {
                for row in rows {
                    output.push_str(&format!(
                        "{}  {:<16} {:>8}\n",
                        row.date,
                        row.classification.to_string(),
                        row.trades
                    ));
                }
                output.push('\n');
            }
            Section::Unavailable(reason) => Self::unavailable(output, reason),
        }
    }

    fn push_sides(output: &mut String, report: &DashboardReport) {
        Self::header(output, "Long / Short Behaviour");
        match &report.side_ratios {
            Section::Available(rows) => {
                for row in rows {
                    output.push_str(&format!(
                        "{:<16} {:<8} {:>8} {:>9.2}%\n",
                        row.classification.to_string(),
                        row.side.to_string(),
                        row.trades,
                        row.ratio * 100.0
                    ));
                }
                output.push('\n');
            }
            Section::Unavailable(reason) => Self::unavailable(output, reason),
        }
    }

    fn push_volatility(output: &mut String, report: &DashboardReport) {
        Self::header(output, "Risk (PnL Volatility)");
        match &report.by_sentiment {
            Section::Available(groups) => {
                for g in groups {
                    output.push_str(&format!(
                        "{:<16} {:>14}\n",
                        g.classification.to_string(),
                        na(g.pnl_std, |v| format!("{:.2}", v)),
                    ));
                }
                output.push('\n');
            }
            Section::Unavailable(reason) => Self::unavailable(output, reason),
        }
    }

    /// Classifier section on its own, as printed by the `train` command.
    #[must_use]
    pub fn format_classifier(section: &Section<ModelSummary>) -> String {
        let mut output = String::new();
        Self::header(&mut output, "Predictive Model Performance");
        match section {
            Section::Available(model) => {
                output.push_str(&format!("Model Accuracy:        {:.2}\n", model.accuracy));
                output.push_str(&format!(
                    "Rows (train/test):     {} / {}\n",
                    model.n_train, model.n_test
                ));
                output.push_str(&format!("Iterations:            {}\n", model.iterations));
                let encoding: Vec<String> = model
                    .encoding
                    .iter()
                    .map(|e| format!("{}={}", e.label, e.code))
                    .collect();
                output.push_str(&format!("Sentiment Codes:       {}\n", encoding.join(", ")));
                output.push('\n');
                output.push_str("Classification Report\n");
                output.push_str(&model.report.render());
                output.push('\n');
            }
            Section::Unavailable(reason) => Self::unavailable(&mut output, reason),
        }
        output
    }

    fn push_recommendations(output: &mut String, report: &DashboardReport) {
        let Some(recs) = report.recommendations else {
            return;
        };
        Self::header(output, "Strategic Recommendations");
        output.push_str(&format!("{}\n\n", recs.title));
        for (i, regime) in recs.regimes.iter().enumerate() {
            output.push_str(&format!("{}. {} Regime\n", i + 1, regime.regime));
            for line in regime.observations {
                output.push_str(&format!("   - {}\n", line));
            }
            output.push_str(&format!("   Recommendation: {}\n\n", regime.recommendation));
        }
        output.push_str("Executive Insight\n");
        for line in recs.insight {
            output.push_str(&format!("{}\n", line));
        }
        output.push_str("Integrating market sentiment as a dynamic regime filter can:\n");
        for line in recs.benefits {
            output.push_str(&format!("  • {}\n", line));
        }
        output.push_str(&format!("{}\n\n", recs.conclusion));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_desk_data::{AnalysisTable, FilterSpec};

    #[test]
    fn empty_report_renders_na() {
        let report = DashboardReport::build(
            &AnalysisTable::empty(),
            &FilterSpec::new(),
            Section::unavailable("no trades in selection"),
        );
        let text = ReportFormatter::format(&report);
        assert!(text.contains("Total Trades:          0"));
        assert!(text.contains("Total PnL:             N/A"));
        assert!(text.contains("Win Rate:              N/A"));
        assert!(text.contains("Unavailable (no trades in selection)"));
        assert!(!text.contains("Strategic Recommendations"));
    }

    #[test]
    fn json_tags_section_status() {
        let report = DashboardReport::build(
            &AnalysisTable::empty(),
            &FilterSpec::new(),
            Section::unavailable("no trades in selection"),
        );
        let json: serde_json::Value =
            serde_json::from_str(&ReportFormatter::to_json(&report).unwrap()).unwrap();
        assert_eq!(json["daily_pnl"]["status"], "unavailable");
        assert_eq!(json["kpis"]["total_trades"], 0);
        assert!(json["kpis"]["win_rate"].is_null());
    }
}
