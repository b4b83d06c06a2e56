//! Integer codes for sentiment classifications.

use sentiment_desk_core::{Classification, EncoderScope};
use std::collections::{BTreeMap, BTreeSet};

/// Maps each classification to a stable integer code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentEncoder {
    scope: EncoderScope,
    codes: BTreeMap<Classification, usize>,
}

impl SentimentEncoder {
    /// Fits over the whole sentiment domain.
    ///
    /// The five known labels always get their ordinal code (extreme fear = 0
    /// through extreme greed = 4) whether or not they occur, so codes do not
    /// depend on which rows are present. Unknown labels seen in `labels` are
    /// appended after them in label order.
    pub fn fit_domain<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a Classification>,
    {
        let mut codes: BTreeMap<Classification, usize> = Classification::KNOWN
            .into_iter()
            .enumerate()
            .map(|(code, label)| (label, code))
            .collect();

        let others: BTreeSet<&Classification> = labels
            .into_iter()
            .filter(|label| label.rank().is_none())
            .collect();
        for label in others {
            let next = codes.len();
            codes.insert(label.clone(), next);
        }

        Self {
            scope: EncoderScope::Domain,
            codes,
        }
    }

    /// Fits over only the labels present, sorted by their text.
    ///
    /// This mirrors a per-call label encoder: the same label can receive a
    /// different code for a different subset of rows.
    pub fn fit_subset<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a Classification>,
    {
        let mut distinct: Vec<&Classification> = labels
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        distinct.sort_by_key(|label| label.to_string());

        let codes = distinct
            .into_iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code))
            .collect();

        Self {
            scope: EncoderScope::Subset,
            codes,
        }
    }

    #[must_use]
    pub fn scope(&self) -> EncoderScope {
        self.scope
    }

    #[must_use]
    pub fn encode(&self, label: &Classification) -> Option<usize> {
        self.codes.get(label).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Label/code pairs ordered by code.
    #[must_use]
    pub fn mapping(&self) -> Vec<(Classification, usize)> {
        let mut pairs: Vec<(Classification, usize)> =
            self.codes.iter().map(|(l, c)| (l.clone(), *c)).collect();
        pairs.sort_by_key(|(_, code)| *code);
        pairs
    }
}
