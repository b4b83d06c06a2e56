//! Load → filter → aggregate/train orchestration.

use std::path::Path;

use sentiment_desk_core::{AppConfig, EncoderScope};
use sentiment_desk_data::{
    AnalysisTable, CsvStorage, DataError, FilterSpec, LoadCache, LoadedDataset, Loader,
};
use sentiment_desk_model::{ClassifierTrainer, ModelSummary};
use tracing::info;

use crate::report::{classifier_section, DashboardReport};
use crate::section::Section;

/// Owns the configuration and the load cache for repeated runs.
pub struct Pipeline {
    config: AppConfig,
    loader: Loader,
    cache: LoadCache,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let loader = Loader::new(config.columns.clone());
        Self {
            config,
            loader,
            cache: LoadCache::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Forces the next run to reread both input files.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    /// Number of times the input files have been read.
    #[must_use]
    pub fn loads(&self) -> usize {
        self.cache.loads()
    }

    /// The full, unfiltered dataset.
    ///
    /// # Errors
    /// Returns `DataError::MissingInput` if an input file is absent, or any
    /// read error.
    pub fn dataset(&mut self) -> Result<&LoadedDataset, DataError> {
        self.cache.get_or_load(
            &self.loader,
            &self.config.data.trades_path,
            &self.config.data.sentiment_path,
        )
    }

    /// Rows accepted by `filter`, derived columns as computed on the full table.
    pub fn select(&mut self, filter: &FilterSpec) -> Result<AnalysisTable, DataError> {
        Ok(self.dataset()?.table.filter(filter))
    }

    /// Builds the full dashboard report for `filter`.
    pub fn report(&mut self, filter: &FilterSpec) -> Result<DashboardReport, DataError> {
        let classifier = self.classifier(filter)?;
        let table = self.select(filter)?;
        let report = DashboardReport::build(&table, filter, classifier);
        info!(
            "Report built: {} trades, classifier {}",
            report.kpis.total_trades,
            if report.classifier.is_available() {
                "trained"
            } else {
                "unavailable"
            }
        );
        Ok(report)
    }

    /// Trains the classifier on the rows accepted by `filter`.
    ///
    /// With the domain encoder scope the sentiment codes are fitted on the
    /// full table, so they are the same for every filter.
    pub fn classifier(&mut self, filter: &FilterSpec) -> Result<Section<ModelSummary>, DataError> {
        let trainer = ClassifierTrainer::new(self.config.model.clone());
        let dataset = self.dataset()?;

        let shared_encoder = match trainer.encoder_scope() {
            EncoderScope::Domain => Some(trainer.fit_encoder(&dataset.table)),
            EncoderScope::Subset => None,
        };

        let table = dataset.table.filter(filter);
        if table.is_empty() {
            return Ok(Section::unavailable("no trades in selection"));
        }
        Ok(classifier_section(
            trainer.train(&table, shared_encoder.as_ref()),
        ))
    }

    /// Writes the selected rows to `output` as CSV, returning the row count.
    pub fn export(&mut self, filter: &FilterSpec, output: &Path) -> Result<usize, DataError> {
        let table = self.select(filter)?;
        CsvStorage::write_analysis_table(output, &table)?;
        Ok(table.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_inputs(dir: &TempDir) -> AppConfig {
        let trades = dir.path().join("trades.csv");
        let sentiment = dir.path().join("sentiment.csv");
        fs::write(
            &trades,
            "Timestamp IST,Side,Closed PnL\n\
             01-01-2023 09:00,BUY,10\n\
             01-01-2023 10:00,SELL,-5\n\
             02-01-2023 09:00,BUY,20\n",
        )
        .unwrap();
        fs::write(
            &sentiment,
            "date,classification,value\n\
             2023-01-01,Fear,20\n\
             2023-01-02,Greed,30\n",
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.data.trades_path = trades;
        config.data.sentiment_path = sentiment;
        config
    }

    #[test]
    fn repeated_runs_reuse_the_cache() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(write_inputs(&dir));

        pipeline.report(&FilterSpec::new()).unwrap();
        pipeline.report(&FilterSpec::new()).unwrap();
        assert_eq!(pipeline.loads(), 1);

        pipeline.invalidate();
        pipeline.report(&FilterSpec::new()).unwrap();
        assert_eq!(pipeline.loads(), 2);
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let mut config = write_inputs(&dir);
        config.data.trades_path = dir.path().join("absent.csv");
        let mut pipeline = Pipeline::new(config);

        let err = pipeline.report(&FilterSpec::new()).unwrap_err();
        assert!(err.is_missing_input());
    }

    #[test]
    fn tiny_dataset_reports_classifier_as_unavailable() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(write_inputs(&dir));
        let section = pipeline.classifier(&FilterSpec::new()).unwrap();
        // Only the single 2023-01-02 row has a volume change.
        assert!(!section.is_available());
    }

    #[test]
    fn export_writes_selected_rows() {
        let dir = TempDir::new().unwrap();
        let mut pipeline = Pipeline::new(write_inputs(&dir));
        let output = dir.path().join("unified.csv");
        let day_two = chrono::NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();

        let rows = pipeline
            .export(&FilterSpec::new().with_start(day_two), &output)
            .unwrap();
        assert_eq!(rows, 1);
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains(",0.5,"));
    }
}
