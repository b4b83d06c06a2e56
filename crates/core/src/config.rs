use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub columns: ColumnConfig,
    pub model: ModelConfig,
}

/// Locations of the two input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub trades_path: PathBuf,
    pub sentiment_path: PathBuf,
}

/// Header aliases and value formats used by the loader.
///
/// Aliases are compared against headers after trimming and lowercasing, so
/// they must themselves be lowercase. The first alias found in a file wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub pnl: Vec<String>,
    pub timestamp: Vec<String>,
    pub side: Vec<String>,
    pub execution_price: Vec<String>,
    pub size: Vec<String>,
    pub account: Vec<String>,
    pub coin: Vec<String>,
    pub sentiment_date: Vec<String>,
    pub classification: Vec<String>,
    pub value: Vec<String>,
    /// `chrono` format strings tried in order for trade timestamps.
    pub timestamp_formats: Vec<String>,
    /// `chrono` format strings tried in order for sentiment dates.
    pub date_formats: Vec<String>,
}

/// Which rows the sentiment encoder is fit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderScope {
    /// Fit once over the full unfiltered table, canonical ordinal codes.
    #[default]
    Domain,
    /// Re-fit on every training call over the labels present in that call.
    Subset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub test_fraction: f64,
    pub seed: u64,
    pub max_iter: usize,
    pub learning_rate: f64,
    pub tolerance: f64,
    /// Inverse regularization strength, as in `C` for scikit-style models.
    pub c: f64,
    pub encoder_scope: EncoderScope,
}

fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            trades_path: PathBuf::from("data/historical_data.csv"),
            sentiment_path: PathBuf::from("data/fear_greed_index.csv"),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            pnl: aliases(&["closed pnl", "closed_pnl", "pnl"]),
            timestamp: aliases(&["timestamp ist", "timestamp", "time"]),
            side: aliases(&["side", "direction"]),
            execution_price: aliases(&["execution price", "execution_price", "price"]),
            size: aliases(&["size tokens", "size_tokens", "size"]),
            account: aliases(&["account"]),
            coin: aliases(&["coin", "symbol"]),
            sentiment_date: aliases(&["date"]),
            classification: aliases(&["classification", "value_classification"]),
            value: aliases(&["value"]),
            timestamp_formats: aliases(&[
                "%d-%m-%Y %H:%M",
                "%d-%m-%Y %H:%M:%S",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%dT%H:%M:%S%.f",
            ]),
            date_formats: aliases(&["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"]),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            max_iter: 1000,
            learning_rate: 0.1,
            tolerance: 1e-6,
            c: 1.0,
            encoder_scope: EncoderScope::Domain,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            columns: ColumnConfig::default(),
            model: ModelConfig::default(),
        }
    }
}
