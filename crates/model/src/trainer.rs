//! Profitability classifier over `[volume_change, sentiment code]`.

use ndarray::{Array1, Array2};
use serde::Serialize;
use sentiment_desk_core::{EncoderScope, ModelConfig};
use sentiment_desk_data::{AnalysisTable, Column};
use tracing::{debug, info};

use crate::encoder::SentimentEncoder;
use crate::error::ModelError;
use crate::evaluation::ClassificationReport;
use crate::logistic::{LogisticParams, LogisticRegression};
use crate::split::train_test_split;

/// Columns the classifier cannot run without.
pub const REQUIRED_COLUMNS: [Column; 3] =
    [Column::ClosedPnl, Column::Classification, Column::VolumeChange];

pub const FEATURE_NAMES: [&str; 2] = ["volume_change", "sentiment_encoded"];

/// Result of a training attempt that did not fail outright.
#[derive(Debug, Clone)]
pub enum TrainingOutcome {
    Trained(Box<TrainedModel>),
    /// A required column is absent from the table.
    Unavailable { missing: Vec<Column> },
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: LogisticRegression,
    pub encoder: SentimentEncoder,
    pub accuracy: f64,
    pub report: ClassificationReport,
    pub n_train: usize,
    pub n_test: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EncodedLabel {
    pub label: String,
    pub code: usize,
}

/// Serializable view of a trained model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub encoder_scope: EncoderScope,
    pub encoding: Vec<EncodedLabel>,
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
    pub report: ClassificationReport,
}

impl TrainedModel {
    #[must_use]
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            encoder_scope: self.encoder.scope(),
            encoding: self
                .encoder
                .mapping()
                .into_iter()
                .map(|(label, code)| EncodedLabel {
                    label: label.to_string(),
                    code,
                })
                .collect(),
            features: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            coefficients: self
                .model
                .coefficients()
                .map(|c| c.to_vec())
                .unwrap_or_default(),
            intercept: self.model.intercept().unwrap_or_default(),
            iterations: self.model.cost_history.len(),
            accuracy: self.accuracy,
            n_train: self.n_train,
            n_test: self.n_test,
            report: self.report.clone(),
        }
    }
}

pub struct ClassifierTrainer {
    config: ModelConfig,
}

impl ClassifierTrainer {
    #[must_use]
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn encoder_scope(&self) -> EncoderScope {
        self.config.encoder_scope
    }

    /// Encoder for `table` according to the configured scope.
    #[must_use]
    pub fn fit_encoder(&self, table: &AnalysisTable) -> SentimentEncoder {
        let labels = table.classifications();
        match self.config.encoder_scope {
            EncoderScope::Domain => SentimentEncoder::fit_domain(labels.iter()),
            EncoderScope::Subset => SentimentEncoder::fit_subset(labels.iter()),
        }
    }

    /// Trains on `table`.
    ///
    /// `encoder` is a pre-fitted encoder shared across calls; without one the
    /// encoder is fitted on `table` itself.
    ///
    /// # Errors
    /// Returns `InsufficientData` when no usable row remains, the test part
    /// is empty, or the training part lacks one of the two classes.
    pub fn train(
        &self,
        table: &AnalysisTable,
        encoder: Option<&SentimentEncoder>,
    ) -> Result<TrainingOutcome, ModelError> {
        let missing = table.columns().missing(&REQUIRED_COLUMNS);
        if !missing.is_empty() {
            info!("Classifier unavailable, missing columns: {:?}", missing);
            return Ok(TrainingOutcome::Unavailable { missing });
        }

        let encoder = match encoder {
            Some(encoder) => encoder.clone(),
            None => self.fit_encoder(table),
        };

        let examples: Vec<([f64; 2], f64)> = table
            .rows()
            .iter()
            .filter_map(|row| {
                let volume_change = row.volume_change()?;
                let code = encoder.encode(row.classification()?)?;
                // A missing PnL counts as not profitable.
                let label = if row.trade().is_win() { 1.0 } else { 0.0 };
                #[allow(clippy::cast_precision_loss)]
                let code = code as f64;
                Some(([volume_change, code], label))
            })
            .collect();

        let n = examples.len();
        debug!(
            "Classifier: {} usable rows of {} after dropping missing features",
            n,
            table.len()
        );
        if n == 0 {
            return Err(ModelError::insufficient(0, "no rows with all features"));
        }

        let split = train_test_split(n, self.config.test_fraction, self.config.seed);
        if split.test.is_empty() {
            return Err(ModelError::insufficient(n, "empty test split"));
        }
        let (x_train, y_train) = design_matrix(&examples, &split.train);
        let (x_test, y_test) = design_matrix(&examples, &split.test);

        let positives = y_train.iter().filter(|&&y| y >= 0.5).count();
        if positives == 0 || positives == y_train.len() {
            return Err(ModelError::insufficient(
                n,
                "training split contains a single class",
            ));
        }

        let mut model = LogisticRegression::new(LogisticParams {
            learning_rate: self.config.learning_rate,
            max_iter: self.config.max_iter,
            tolerance: self.config.tolerance,
            c: self.config.c,
        });
        model.fit(&x_train, &y_train)?;

        let predictions = model.predict(&x_test)?;
        let report = ClassificationReport::from_predictions(&y_test, &predictions);
        info!(
            "Classifier trained on {} rows, held-out accuracy {:.4} on {} rows",
            split.train.len(),
            report.accuracy,
            split.test.len()
        );

        Ok(TrainingOutcome::Trained(Box::new(TrainedModel {
            model,
            encoder,
            accuracy: report.accuracy,
            report,
            n_train: split.train.len(),
            n_test: split.test.len(),
        })))
    }
}

fn design_matrix(examples: &[([f64; 2], f64)], indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
    let mut x = Array2::<f64>::zeros((indices.len(), FEATURE_NAMES.len()));
    let mut y = Array1::<f64>::zeros(indices.len());
    for (row, &idx) in indices.iter().enumerate() {
        let (features, label) = examples[idx];
        x[[row, 0]] = features[0];
        x[[row, 1]] = features[1];
        y[row] = label;
    }
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sentiment_desk_core::Classification;
    use sentiment_desk_data::{
        merge, FeatureDeriver, FilterSpec, SentimentRecord, SentimentTable, TradeRecord,
        TradeTable,
    };

    /// Greed days alternate with fear days; `pnl` gives each trade's PnL from
    /// (greed, trade index).
    fn build(
        days: u32,
        pnl: impl Fn(bool, u32) -> Option<Decimal>,
        trade_columns: &[Column],
        sentiment_columns: &[Column],
    ) -> AnalysisTable {
        let mut trades = Vec::new();
        let mut sentiment = Vec::new();
        for day in 0..days {
            let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(day.into());
            let greed = day % 2 == 0;
            let (label, value) = if greed {
                (Classification::Greed, 70.0 + f64::from(day % 5))
            } else {
                (Classification::Fear, 30.0 - f64::from(day % 5))
            };
            sentiment.push(SentimentRecord::new(date, label, value));
            for trade in 0..2u32 {
                let record = TradeRecord::at(
                    (day * 2 + trade) as usize,
                    date.and_hms_opt(10 + trade, 0, 0).unwrap(),
                );
                trades.push(match pnl(greed, trade) {
                    Some(pnl) => record.with_pnl(pnl),
                    None => record,
                });
            }
        }

        FeatureDeriver::derive(merge(
            TradeTable::new(trades, trade_columns.iter().copied().collect()),
            SentimentTable::new(sentiment, sentiment_columns.iter().copied().collect()),
        ))
    }

    /// Greed trades win, fear trades lose.
    fn table(days: u32, with_value: bool) -> AnalysisTable {
        let sentiment_columns: &[Column] = if with_value {
            &[Column::Classification, Column::Value]
        } else {
            &[Column::Classification]
        };
        build(
            days,
            |greed, trade| {
                let pnl = if greed { 10 + i64::from(trade) } else { -5 - i64::from(trade) };
                Some(Decimal::from(pnl))
            },
            &[Column::Timestamp, Column::ClosedPnl],
            sentiment_columns,
        )
    }

    fn config() -> ModelConfig {
        ModelConfig::default()
    }

    #[test]
    fn trains_and_reports_on_separable_sentiment() {
        let trainer = ClassifierTrainer::new(config());
        let outcome = trainer.train(&table(30, true), None).unwrap();
        let TrainingOutcome::Trained(trained) = outcome else {
            panic!("expected a trained model");
        };

        // 29 days with a volume change, two trades each.
        assert_eq!(trained.n_train + trained.n_test, 58);
        assert_eq!(trained.n_test, 12);
        assert!(trained.accuracy > 0.9);
        assert_eq!(trained.report.macro_avg.support, 12);

        let summary = trained.summary();
        assert_eq!(summary.features, vec!["volume_change", "sentiment_encoded"]);
        assert_eq!(summary.coefficients.len(), 2);
        assert_eq!(summary.encoder_scope, EncoderScope::Domain);
    }

    #[test]
    fn training_is_reproducible() {
        let trainer = ClassifierTrainer::new(config());
        let data = table(30, true);
        let first = trainer.train(&data, None).unwrap();
        let second = trainer.train(&data, None).unwrap();
        match (first, second) {
            (TrainingOutcome::Trained(a), TrainingOutcome::Trained(b)) => {
                assert_eq!(a.report, b.report);
                assert_eq!(
                    a.model.coefficients().unwrap(),
                    b.model.coefficients().unwrap()
                );
            }
            _ => panic!("expected trained models"),
        }
    }

    #[test]
    fn missing_feature_column_is_unavailable_not_error() {
        let trainer = ClassifierTrainer::new(config());
        let outcome = trainer.train(&table(10, false), None).unwrap();
        match outcome {
            TrainingOutcome::Unavailable { missing } => {
                assert_eq!(missing, vec![Column::VolumeChange]);
            }
            TrainingOutcome::Trained(_) => panic!("expected unavailable"),
        }
    }

    #[test]
    fn missing_pnl_column_is_unavailable() {
        let data = build(
            10,
            |_, _| None,
            &[Column::Timestamp],
            &[Column::Classification, Column::Value],
        );
        let outcome = ClassifierTrainer::new(config()).train(&data, None).unwrap();
        let TrainingOutcome::Unavailable { missing } = outcome else {
            panic!("expected unavailable");
        };
        assert_eq!(missing, vec![Column::ClosedPnl]);
    }

    #[test]
    fn missing_classification_column_is_unavailable() {
        let data = build(
            10,
            |_, _| Some(Decimal::ONE),
            &[Column::Timestamp, Column::ClosedPnl],
            &[Column::Value],
        );
        let outcome = ClassifierTrainer::new(config()).train(&data, None).unwrap();
        let TrainingOutcome::Unavailable { missing } = outcome else {
            panic!("expected unavailable");
        };
        assert_eq!(missing, vec![Column::Classification]);
    }

    #[test]
    fn missing_pnl_cells_are_labelled_unprofitable() {
        // Fear trades have no PnL at all; they must stay in as the losing class.
        let data = build(
            30,
            |greed, _| greed.then_some(Decimal::from(10)),
            &[Column::Timestamp, Column::ClosedPnl],
            &[Column::Classification, Column::Value],
        );
        let outcome = ClassifierTrainer::new(config()).train(&data, None).unwrap();
        let TrainingOutcome::Trained(trained) = outcome else {
            panic!("expected a trained model");
        };
        assert_eq!(trained.n_train + trained.n_test, 58);
        assert_eq!(trained.report.confusion_matrix.total(), 12);
    }

    #[test]
    fn single_class_training_is_insufficient() {
        let greed_only = table(30, true).filter(
            &FilterSpec::new().with_classifications([Classification::Greed]),
        );
        let trainer = ClassifierTrainer::new(config());
        let err = trainer.train(&greed_only, None).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientData { .. }));
    }

    #[test]
    fn empty_table_is_insufficient() {
        let empty = table(30, true).filter(
            &FilterSpec::new()
                .with_start(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
        );
        let trainer = ClassifierTrainer::new(config());
        assert_eq!(
            trainer.train(&empty, None).unwrap_err(),
            ModelError::InsufficientData {
                rows: 0,
                reason: "no rows with all features".into()
            }
        );
    }

    #[test]
    fn shared_encoder_is_used_as_given() {
        let data = table(30, true);
        let subset_trainer = ClassifierTrainer::new(ModelConfig {
            encoder_scope: EncoderScope::Subset,
            ..config()
        });
        let subset = subset_trainer.fit_encoder(&data);
        assert_eq!(subset.encode(&Classification::Fear), Some(0));
        assert_eq!(subset.encode(&Classification::Greed), Some(1));

        let domain = SentimentEncoder::fit_domain(data.classifications().iter());
        let outcome = subset_trainer.train(&data, Some(&domain)).unwrap();
        let TrainingOutcome::Trained(trained) = outcome else {
            panic!("expected a trained model");
        };
        assert_eq!(trained.encoder, domain);
    }
}
