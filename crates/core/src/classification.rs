//! Domain labels shared by the loader, the reports, and the classifier.
//!
//! The sentiment index publishes one of five labels per day. Anything outside
//! that closed set is kept verbatim as `Other` so it still groups and filters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fear & greed classification for a calendar day.
///
/// Variant order is the ordinal order of the index, so the derived `Ord`
/// sorts from extreme fear to extreme greed with unknown labels last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
    Other(String),
}

impl Classification {
    /// The closed set in ordinal order.
    pub const KNOWN: [Classification; 5] = [
        Classification::ExtremeFear,
        Classification::Fear,
        Classification::Neutral,
        Classification::Greed,
        Classification::ExtremeGreed,
    ];

    /// Ordinal position within the closed set, `None` for `Other`.
    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        match self {
            Classification::ExtremeFear => Some(0),
            Classification::Fear => Some(1),
            Classification::Neutral => Some(2),
            Classification::Greed => Some(3),
            Classification::ExtremeGreed => Some(4),
            Classification::Other(_) => None,
        }
    }

    /// Parses a raw label, returning `None` for blank input.
    #[must_use]
    pub fn parse_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let key: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        Some(match key.as_str() {
            "extremefear" => Classification::ExtremeFear,
            "fear" => Classification::Fear,
            "neutral" => Classification::Neutral,
            "greed" => Classification::Greed,
            "extremegreed" => Classification::ExtremeGreed,
            _ => Classification::Other(trimmed.to_string()),
        })
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| "empty classification label".to_string())
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::ExtremeFear => write!(f, "Extreme Fear"),
            Classification::Fear => write!(f, "Fear"),
            Classification::Neutral => write!(f, "Neutral"),
            Classification::Greed => write!(f, "Greed"),
            Classification::ExtremeGreed => write!(f, "Extreme Greed"),
            Classification::Other(label) => write!(f, "{label}"),
        }
    }
}

/// Trade direction as reported by the broker.
///
/// Brokers disagree on vocabulary (`BUY`/`SELL` vs `long`/`short`), so both
/// spellings map onto the same variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Long,
    Short,
    Other(String),
}

impl Side {
    /// Parses a raw side value, returning `None` for blank input.
    #[must_use]
    pub fn parse_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(match trimmed.to_lowercase().as_str() {
            "long" | "buy" | "b" => Side::Long,
            "short" | "sell" | "s" => Side::Short,
            _ => Side::Other(trimmed.to_string()),
        })
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
            Side::Other(label) => write!(f, "{label}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_labels_in_any_spelling() {
        assert_eq!(
            Classification::parse_label("Extreme Fear"),
            Some(Classification::ExtremeFear)
        );
        assert_eq!(
            Classification::parse_label("extreme_greed"),
            Some(Classification::ExtremeGreed)
        );
        assert_eq!(
            Classification::parse_label("  GREED "),
            Some(Classification::Greed)
        );
        assert_eq!(
            Classification::from_str("neutral").unwrap(),
            Classification::Neutral
        );
    }

    #[test]
    fn unknown_labels_are_preserved() {
        assert_eq!(
            Classification::parse_label(" Euphoria "),
            Some(Classification::Other("Euphoria".to_string()))
        );
        assert_eq!(Classification::parse_label("   "), None);
        assert!(Classification::from_str("").is_err());
    }

    #[test]
    fn ordering_follows_the_index() {
        let mut labels = vec![
            Classification::Other("Euphoria".to_string()),
            Classification::Greed,
            Classification::ExtremeFear,
            Classification::Neutral,
        ];
        labels.sort();
        assert_eq!(
            labels,
            vec![
                Classification::ExtremeFear,
                Classification::Neutral,
                Classification::Greed,
                Classification::Other("Euphoria".to_string()),
            ]
        );
        assert_eq!(Classification::Greed.rank(), Some(3));
        assert_eq!(Classification::Other("x".into()).rank(), None);
    }

    #[test]
    fn display_round_trips_known_labels() {
        for label in Classification::KNOWN {
            let shown = label.to_string();
            assert_eq!(Classification::parse_label(&shown), Some(label));
        }
    }

    #[test]
    fn side_accepts_buy_sell_vocabulary() {
        assert_eq!(Side::parse_label("BUY"), Some(Side::Long));
        assert_eq!(Side::parse_label("long"), Some(Side::Long));
        assert_eq!(Side::parse_label("Sell"), Some(Side::Short));
        assert_eq!(
            Side::parse_label("hedge"),
            Some(Side::Other("hedge".to_string()))
        );
        assert_eq!(Side::parse_label(""), None);
        assert_eq!(Side::Short.to_string(), "short");
    }
}
