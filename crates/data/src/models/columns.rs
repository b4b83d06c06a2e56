//! Logical column presence.
//!
//! Input files are allowed to omit optional columns. Rather than failing, each
//! table records which logical columns its source actually had so every
//! downstream consumer can decide for itself whether it has enough to work with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A logical column of the analysis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Timestamp,
    ExecutionPrice,
    Size,
    ClosedPnl,
    Side,
    Account,
    Coin,
    Classification,
    Value,
    VolumeChange,
    PriceReturn,
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Column::Timestamp => "timestamp",
            Column::ExecutionPrice => "execution_price",
            Column::Size => "size",
            Column::ClosedPnl => "closed_pnl",
            Column::Side => "side",
            Column::Account => "account",
            Column::Coin => "coin",
            Column::Classification => "classification",
            Column::Value => "value",
            Column::VolumeChange => "volume_change",
            Column::PriceReturn => "price_return",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of logical columns present in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet(BTreeSet<Column>);

impl ColumnSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: Column) {
        self.0.insert(column);
    }

    #[must_use]
    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    /// Columns from `required` that this set lacks, in the order given.
    #[must_use]
    pub fn missing(&self, required: &[Column]) -> Vec<Column> {
        required
            .iter()
            .copied()
            .filter(|c| !self.contains(*c))
            .collect()
    }

    #[must_use]
    pub fn union(&self, other: &ColumnSet) -> ColumnSet {
        ColumnSet(self.0.union(&other.0).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        ColumnSet(iter.into_iter().collect())
    }
}
