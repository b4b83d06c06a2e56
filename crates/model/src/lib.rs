//! Baseline profitability classifier.
//!
//! Trades are labeled profitable when their closed PnL is positive and
//! described by the day's sentiment `volume_change` and an integer code for
//! the sentiment classification. A class-balanced logistic regression is
//! fitted on a seeded 80/20 split and scored on the held-out part.

pub mod encoder;
pub mod error;
pub mod evaluation;
pub mod logistic;
pub mod split;
pub mod trainer;

pub use encoder::SentimentEncoder;
pub use error::ModelError;
pub use evaluation::{ClassScores, ClassificationReport, ConfusionMatrix};
pub use logistic::{LogisticParams, LogisticRegression};
pub use split::{test_size, train_test_split, SplitIndices};
pub use trainer::{
    ClassifierTrainer, EncodedLabel, ModelSummary, TrainedModel, TrainingOutcome,
    FEATURE_NAMES, REQUIRED_COLUMNS,
};
