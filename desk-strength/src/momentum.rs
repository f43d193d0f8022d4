//! Momentum scores for the market movers board.
//!
//! Scores are clamped to [0, 100] and bucketed into four classifications. A classification
//! supplied by the server is used verbatim when it is one of the known buckets; otherwise the
//! bucket is derived from the score.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::UnknownClassification;
use crate::format::{clamp_score, format_score};
use crate::instrument::{InstrumentId, format_instrument_id};

/// Lower bound (inclusive) of the "Very Bullish" bucket.
pub const VERY_BULLISH_THRESHOLD: f64 = 70.0;
/// Lower bound (inclusive) of the "Bullish" bucket.
pub const BULLISH_THRESHOLD: f64 = 50.0;
/// Lower bound (inclusive) of the "Bearish" bucket.
pub const BEARISH_THRESHOLD: f64 = 30.0;

/// Four ordinal momentum buckets.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum MomentumClassification {
    #[serde(rename = "Very Bearish")]
    VeryBearish,
    #[serde(rename = "Bearish")]
    Bearish,
    #[serde(rename = "Bullish")]
    Bullish,
    #[serde(rename = "Very Bullish")]
    VeryBullish,
}

impl MomentumClassification {
    pub const ALL: [MomentumClassification; 4] = [
        MomentumClassification::VeryBullish,
        MomentumClassification::Bullish,
        MomentumClassification::Bearish,
        MomentumClassification::VeryBearish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MomentumClassification::VeryBullish => "Very Bullish",
            MomentumClassification::Bullish => "Bullish",
            MomentumClassification::Bearish => "Bearish",
            MomentumClassification::VeryBearish => "Very Bearish",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(
            self,
            MomentumClassification::VeryBullish | MomentumClassification::Bullish
        )
    }
}

impl std::fmt::Display for MomentumClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MomentumClassification {
    type Err = UnknownClassification;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim();
        MomentumClassification::ALL
            .into_iter()
            .find(|classification| classification.as_str().eq_ignore_ascii_case(normalised))
            .ok_or_else(|| UnknownClassification(s.to_string()))
    }
}

/// Bucket a score. Thresholds are inclusive lower bounds: 70, 50, 30.
pub fn classify(score: f64) -> MomentumClassification {
    if score >= VERY_BULLISH_THRESHOLD {
        MomentumClassification::VeryBullish
    } else if score >= BULLISH_THRESHOLD {
        MomentumClassification::Bullish
    } else if score >= BEARISH_THRESHOLD {
        MomentumClassification::Bearish
    } else {
        MomentumClassification::VeryBearish
    }
}

/// Clamp a raw momentum score into [0, 100]. Non-finite scores become 0.
pub fn clamp_momentum_score(score: f64) -> f64 {
    clamp_score(score)
}

/// Momentum row as delivered by the live feed or the static defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawMomentumEntry {
    pub symbol: String,
    #[serde(default)]
    pub display: Option<String>,
    pub score: f64,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RawMomentumEntry {
    pub fn new(symbol: impl Into<String>, score: f64) -> Self {
        Self {
            symbol: symbol.into(),
            display: None,
            score,
            classification: None,
            updated_at: None,
        }
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }
}

/// Normalised momentum entry shown on the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumEntry {
    pub symbol: String,
    pub display: String,
    pub score: f64,
    pub classification: MomentumClassification,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MomentumEntry {
    /// Integer string when integral, otherwise one decimal place.
    pub fn formatted_score(&self) -> String {
        format_score(self.score)
    }
}

/// Clamp the score and settle the classification of a raw entry.
pub fn normalize(raw: &RawMomentumEntry) -> MomentumEntry {
    let score = clamp_momentum_score(raw.score);

    let classification = match raw.classification.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => match text.parse::<MomentumClassification>() {
            Ok(classification) => classification,
            Err(error) => {
                warn!(symbol = %raw.symbol, %error, "ignoring server classification");
                classify(score)
            }
        },
        _ => classify(score),
    };

    let display = raw
        .display
        .as_deref()
        .map(str::trim)
        .filter(|display| !display.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format_instrument_id(&InstrumentId::new(&raw.symbol)));

    MomentumEntry {
        symbol: raw.symbol.clone(),
        display,
        score,
        classification,
        updated_at: raw.updated_at,
    }
}

/// Normalise a batch, preserving order.
pub fn normalize_all(raw: &[RawMomentumEntry]) -> Vec<MomentumEntry> {
    raw.iter().map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(30.0), MomentumClassification::Bearish);
        assert_eq!(classify(29.999), MomentumClassification::VeryBearish);
        assert_eq!(classify(50.0), MomentumClassification::Bullish);
        assert_eq!(classify(49.999), MomentumClassification::Bearish);
        assert_eq!(classify(70.0), MomentumClassification::VeryBullish);
        assert_eq!(classify(69.999), MomentumClassification::Bullish);
        assert_eq!(classify(0.0), MomentumClassification::VeryBearish);
        assert_eq!(classify(100.0), MomentumClassification::VeryBullish);
    }

    #[test]
    fn test_clamp_momentum_score() {
        assert_eq!(clamp_momentum_score(-5.0), 0.0);
        assert_eq!(clamp_momentum_score(150.0), 100.0);
        assert_eq!(clamp_momentum_score(42.0), 42.0);
    }

    #[test]
    fn test_normalize_eurusd_without_server_classification() {
        let entry = normalize(&RawMomentumEntry::new("EURUSD", 72.0));

        assert_eq!(entry.classification, MomentumClassification::VeryBullish);
        assert_eq!(entry.classification.to_string(), "Very Bullish");
        assert_eq!(entry.formatted_score(), "72");
        assert_eq!(entry.display, "EURUSD");
    }

    #[test]
    fn test_server_classification_wins() {
        let entry = normalize(
            &RawMomentumEntry::new("XAUUSD", 72.0)
                .with_display("Gold")
                .with_classification("Bearish"),
        );

        assert_eq!(entry.classification, MomentumClassification::Bearish);
        assert_eq!(entry.display, "Gold");
    }

    #[test]
    fn test_unknown_server_classification_falls_back_to_score() {
        let entry = normalize(&RawMomentumEntry::new("BTC", 35.5).with_classification("Neutral"));

        assert_eq!(entry.classification, MomentumClassification::Bearish);
        assert_eq!(entry.formatted_score(), "35.5");
    }

    #[test]
    fn test_normalize_clamps_before_classifying() {
        let entry = normalize(&RawMomentumEntry::new("usd_jpy", -12.0));

        assert_eq!(entry.score, 0.0);
        assert_eq!(entry.classification, MomentumClassification::VeryBearish);
        assert_eq!(entry.display, "USD/JPY");
    }

    #[test]
    fn test_classification_parsing() {
        assert_eq!(
            "very bullish".parse::<MomentumClassification>(),
            Ok(MomentumClassification::VeryBullish)
        );
        assert_eq!(
            " Very Bearish ".parse::<MomentumClassification>(),
            Ok(MomentumClassification::VeryBearish)
        );
        assert!("Neutral".parse::<MomentumClassification>().is_err());
    }

    #[test]
    fn test_raw_entry_deserialises_snake_case_timestamp() {
        let raw: RawMomentumEntry = serde_json::from_str(
            r#"{ "symbol": "GBPUSD", "display": "GBP/USD", "score": 55.25, "updated_at": "2024-03-01T12:00:00Z" }"#,
        )
        .unwrap();

        let entry = normalize(&raw);
        assert_eq!(
            entry.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(entry.classification, MomentumClassification::Bullish);

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["classification"], "Bullish");
    }
}
