//! Date-range and sentiment subsetting of the analysis table.

use chrono::NaiveDate;
use sentiment_desk_core::Classification;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::features::{AnalysisRow, AnalysisTable};

/// User-selected subset. Every constraint is optional.
///
/// Both date bounds are inclusive at calendar-day granularity, which matches
/// `start 00:00 <= timestamp < (end + 1 day) 00:00`. When any bound or a
/// classification set is given, rows lacking the corresponding field are
/// excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub classifications: Option<BTreeSet<Classification>>,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_classifications<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = Classification>,
    {
        self.classifications = Some(labels.into_iter().collect());
        self
    }

    /// True when no constraint is set.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.classifications.is_none()
    }

    #[must_use]
    pub fn accepts(&self, row: &AnalysisRow) -> bool {
        if self.start.is_some() || self.end.is_some() {
            let Some(date) = row.date() else {
                return false;
            };
            if self.start.is_some_and(|start| date < start) {
                return false;
            }
            if self.end.is_some_and(|end| date > end) {
                return false;
            }
        }

        match &self.classifications {
            Some(selected) => row
                .classification()
                .is_some_and(|label| selected.contains(label)),
            None => true,
        }
    }
}

impl AnalysisTable {
    /// Returns the rows accepted by `spec`. Derived columns are carried as-is.
    #[must_use]
    pub fn filter(&self, spec: &FilterSpec) -> AnalysisTable {
        if spec.is_unrestricted() {
            return self.clone();
        }
        let filtered = self.retain_rows(|row| spec.accepts(row));
        tracing::debug!(
            before = self.len(),
            after = filtered.len(),
            "applied filter"
        );
        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureDeriver;
    use crate::merge::merge;
    use crate::models::{Column, SentimentRecord, SentimentTable, TradeRecord, TradeTable};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    fn table() -> AnalysisTable {
        let trades = TradeTable::new(
            vec![
                TradeRecord::at(1, day(1).and_hms_opt(0, 0, 0).unwrap()),
                TradeRecord::at(2, day(2).and_hms_opt(23, 59, 59).unwrap()),
                TradeRecord::at(3, day(3).and_hms_opt(12, 0, 0).unwrap()),
                TradeRecord::at(4, day(4).and_hms_opt(12, 0, 0).unwrap()),
                TradeRecord::default(),
            ],
            [Column::Timestamp].into_iter().collect(),
        );
        let sentiment = SentimentTable::new(
            vec![
                SentimentRecord::new(day(1), Classification::Fear, 20.0),
                SentimentRecord::new(day(2), Classification::Greed, 30.0),
                SentimentRecord::new(day(3), Classification::Fear, 45.0),
            ],
            [Column::Classification, Column::Value].into_iter().collect(),
        );
        FeatureDeriver::derive(merge(trades, sentiment))
    }

    fn rows_of(table: &AnalysisTable) -> Vec<usize> {
        table.rows().iter().map(|r| r.trade().source_row).collect()
    }

    #[test]
    fn unrestricted_filter_keeps_everything() {
        let t = table();
        assert_eq!(t.filter(&FilterSpec::new()).len(), 5);
    }

    #[test]
    fn end_date_is_inclusive_to_the_last_second() {
        let filtered = table().filter(&FilterSpec::new().with_start(day(2)).with_end(day(2)));
        assert_eq!(rows_of(&filtered), vec![2]);
    }

    #[test]
    fn date_bounds_exclude_undated_rows() {
        let filtered = table().filter(&FilterSpec::new().with_start(day(1)));
        assert_eq!(rows_of(&filtered), vec![1, 2, 3, 4]);
    }

    #[test]
    fn classification_selection_drops_unlabelled_rows() {
        let filtered =
            table().filter(&FilterSpec::new().with_classifications([Classification::Fear]));
        assert_eq!(rows_of(&filtered), vec![1, 3]);
    }

    #[test]
    fn empty_range_yields_empty_table() {
        let filtered = table().filter(
            &FilterSpec::new()
                .with_start(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
                .with_end(NaiveDate::from_ymd_opt(2030, 12, 31).unwrap()),
        );
        assert!(filtered.is_empty());
        assert!(filtered.columns().contains(Column::VolumeChange));
    }

    #[test]
    fn filtered_rows_keep_their_volume_change() {
        let full = table();
        let filtered = full.filter(&FilterSpec::new().with_classifications([Classification::Fear]));
        let day3_full = full.rows().iter().find(|r| r.date() == Some(day(3))).unwrap();
        let day3_filtered = filtered.rows().iter().find(|r| r.date() == Some(day(3))).unwrap();
        assert_eq!(day3_full.volume_change(), day3_filtered.volume_change());
        assert!(day3_filtered.volume_change().is_some());
    }
}
