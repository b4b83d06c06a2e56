//! Memoized load of the two input files.
//!
//! The expensive part of a run is reading and merging the files; filters and
//! reports are cheap. The cache keeps the derived table for a pair of paths and
//! reloads only when either file's modification time changes or the cache is
//! explicitly invalidated.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::DataError;
use crate::features::{AnalysisTable, FeatureDeriver};
use crate::loader::{LoadReport, Loader};
use crate::merge::merge;

/// Identity of a file at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    /// Stamps `path`.
    ///
    /// # Errors
    /// Returns `DataError::MissingInput` if the file does not exist.
    pub fn of(path: &Path, kind: &'static str) -> Result<Self, DataError> {
        if !path.is_file() {
            return Err(DataError::MissingInput {
                kind,
                path: path.to_path_buf(),
            });
        }
        let metadata = std::fs::metadata(path).map_err(|e| DataError::io(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    trades: FileStamp,
    sentiment: FileStamp,
}

/// Everything produced by one load.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub table: AnalysisTable,
    pub trades_report: LoadReport,
    pub sentiment_report: LoadReport,
    pub duplicate_sentiment_dates: usize,
}

/// Loads, merges and derives features for a pair of input files.
///
/// # Errors
/// Returns `DataError::MissingInput` if either file is absent.
pub fn load_dataset(loader: &Loader, trades: &Path, sentiment: &Path) -> Result<LoadedDataset, DataError> {
    let (trade_table, trades_report) = loader.load_trades(trades)?;
    let (sentiment_table, sentiment_report) = loader.load_sentiment(sentiment)?;

    let merged = merge(trade_table, sentiment_table);
    let duplicate_sentiment_dates = merged.duplicate_dates;
    let table = FeatureDeriver::derive(merged);

    Ok(LoadedDataset {
        table,
        trades_report,
        sentiment_report,
        duplicate_sentiment_dates,
    })
}

#[derive(Debug, Default)]
pub struct LoadCache {
    entry: Option<(CacheKey, LoadedDataset)>,
    loads: usize,
}

impl LoadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached dataset, loading it if the cache is empty, the paths
    /// differ, or either file changed on disk.
    ///
    /// # Errors
    /// Returns `DataError::MissingInput` if either file is absent, or any load error.
    pub fn get_or_load(
        &mut self,
        loader: &Loader,
        trades: &Path,
        sentiment: &Path,
    ) -> Result<&LoadedDataset, DataError> {
        let key = CacheKey {
            trades: FileStamp::of(trades, "trade")?,
            sentiment: FileStamp::of(sentiment, "sentiment")?,
        };

        let (_, dataset) = match self.entry.take() {
            Some((cached, dataset)) if cached == key => {
                tracing::debug!("Using cached dataset");
                self.entry.insert((cached, dataset))
            }
            _ => {
                tracing::info!("Loading input files (cache miss)");
                let dataset = load_dataset(loader, trades, sentiment)?;
                self.loads += 1;
                self.entry.insert((key, dataset))
            }
        };

        Ok(&*dataset)
    }

    /// Drops the cached dataset so the next call reloads.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            tracing::debug!("Load cache invalidated");
        }
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }

    /// Number of loads performed since creation.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.loads
    }
}
