use serde::Serialize;

/// A report section that either has data or says why it has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Available(T),
    Unavailable(String),
}

impl<T> Section<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Section::Unavailable(reason.into())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available(_))
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Section::Available(_) => None,
            Section::Unavailable(reason) => Some(reason),
        }
    }
}
