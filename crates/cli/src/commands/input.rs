//! Arguments shared by every command: where the inputs are and which rows to keep.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use sentiment_desk_core::{AppConfig, Classification, ConfigLoader, DEFAULT_CONFIG_PATH};
use sentiment_desk_data::FilterSpec;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Input files and row selection.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Trade history CSV (overrides config)
    #[arg(long, env = "SENTIMENT_DESK_TRADES")]
    pub trades: Option<PathBuf>,

    /// Fear & greed index CSV (overrides config)
    #[arg(long, env = "SENTIMENT_DESK_SENTIMENT")]
    pub sentiment: Option<PathBuf>,

    /// First trade date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last trade date to include (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Keep only these sentiment classifications (repeatable, e.g. "extreme greed")
    #[arg(long = "sentiment-filter", value_name = "LABEL")]
    pub sentiment_filter: Vec<Classification>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl InputArgs {
    /// Layered configuration with command-line paths applied last.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be parsed.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = ConfigLoader::load_from(&self.config)
            .with_context(|| format!("Failed to load config from {}", self.config.display()))?;
        if let Some(trades) = &self.trades {
            config.data.trades_path = trades.clone();
        }
        if let Some(sentiment) = &self.sentiment {
            config.data.sentiment_path = sentiment.clone();
        }
        Ok(config)
    }

    /// Filter built from the date bounds and sentiment selection.
    ///
    /// # Errors
    /// Returns an error if `start` is after `end`.
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            anyhow::ensure!(start <= end, "--start {} is after --end {}", start, end);
        }

        let mut filter = FilterSpec::new();
        if let Some(start) = self.start {
            filter = filter.with_start(start);
        }
        if let Some(end) = self.end {
            filter = filter.with_end(end);
        }
        if !self.sentiment_filter.is_empty() {
            filter = filter.with_classifications(self.sentiment_filter.iter().cloned());
        }
        Ok(filter)
    }
}
