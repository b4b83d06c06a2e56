use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a load. Cell-level problems never end up here; they are
/// coerced to missing values and counted in the `LoadReport`.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{kind} file not found: {path}")]
    MissingInput { kind: &'static str, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        DataError::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the missing-input case, which callers treat as fatal config.
    #[must_use]
    pub fn is_missing_input(&self) -> bool {
        matches!(self, DataError::MissingInput { .. })
    }
}
