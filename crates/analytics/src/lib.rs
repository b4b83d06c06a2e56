//! Sentiment-segmented performance reporting.
//!
//! [`Pipeline`] loads and caches the analysis table, applies a
//! [`FilterSpec`](sentiment_desk_data::FilterSpec), and assembles a
//! [`DashboardReport`] of KPIs, per-date and per-sentiment breakdowns, the
//! classifier evaluation and the static recommendations. Each breakdown is a
//! [`Section`] that degrades to `Unavailable` on its own.

pub mod formatter;
pub mod grouping;
pub mod metrics;
pub mod pipeline;
pub mod recommendations;
pub mod report;
pub mod section;

pub use formatter::ReportFormatter;
pub use grouping::{DailyPnl, SentimentPerformance, SideRatio, TradeFrequency};
pub use metrics::Kpis;
pub use pipeline::Pipeline;
pub use recommendations::{RegimeGuidance, Recommendations, RECOMMENDATIONS};
pub use report::{classifier_section, DashboardReport};
pub use section::Section;
