use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("insufficient data for training: {reason} ({rows} usable rows)")]
    InsufficientData { rows: usize, reason: String },

    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl ModelError {
    pub(crate) fn insufficient(rows: usize, reason: impl Into<String>) -> Self {
        ModelError::InsufficientData {
            rows,
            reason: reason.into(),
        }
    }
}
