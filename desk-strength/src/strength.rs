//! Strength scores: raw config entries and their labelled, normalised form.

use serde::{Deserialize, Serialize};

use crate::format::{clamp_score, format_score};
use crate::instrument::{InstrumentCatalog, InstrumentId};

/// Sentiment attached to a strength score.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[serde(alias = "Bullish")]
    Bullish,
    #[serde(alias = "Bearish")]
    Bearish,
    #[default]
    #[serde(alias = "Neutral")]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Bearish => "Bearish",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strength entry as it appears in the asset class config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthEntryConfig {
    pub instrument_id: InstrumentId,
    #[serde(default)]
    pub label: Option<String>,
    pub score: f64,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub day_change: String,
}

/// Labelled strength entry, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthEntry {
    pub instrument_id: InstrumentId,
    pub label: String,
    pub score: f64,
    pub sentiment: Sentiment,
    pub day_change: String,
}

impl StrengthEntry {
    pub fn new(config: &StrengthEntryConfig, catalog: &InstrumentCatalog) -> Self {
        Self {
            instrument_id: config.instrument_id.clone(),
            label: catalog.resolve_label(&config.instrument_id, config.label.as_deref()),
            score: clamp_score(config.score),
            sentiment: config.sentiment,
            day_change: config.day_change.trim().to_string(),
        }
    }

    pub fn formatted_score(&self) -> String {
        format_score(self.score)
    }

    /// Direction of the day change string: `Some(true)` for gains, `Some(false)` for losses,
    /// `None` when flat or unparseable.
    pub fn day_change_is_positive(&self) -> Option<bool> {
        let numeric: String = self
            .day_change
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
            .collect();

        match numeric.parse::<f64>() {
            Ok(change) if change > 0.0 => Some(true),
            Ok(change) if change < 0.0 => Some(false),
            _ => None,
        }
    }
}

/// Attach resolved labels to every configured strength entry, preserving order.
pub fn normalize_strength_entries(
    configs: &[StrengthEntryConfig],
    catalog: &InstrumentCatalog,
) -> Vec<StrengthEntry> {
    configs
        .iter()
        .map(|config| StrengthEntry::new(config, catalog))
        .collect()
}
