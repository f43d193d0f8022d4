//! Relative-strength time series: raw config and labelled, chart-aligned series.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SeriesError;
use crate::format::clamp_score;
use crate::instrument::{InstrumentCatalog, InstrumentId};

/// Series entry as it appears in the asset class config. One value per chart label.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesConfig {
    pub instrument_id: InstrumentId,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl SeriesConfig {
    pub fn new(instrument_id: impl Into<InstrumentId>, values: Vec<f64>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            label: None,
            values,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Strict check that this series has exactly one value per chart label.
    pub fn validate_len(&self, labels: usize) -> Result<(), SeriesError> {
        if self.values.len() == labels {
            Ok(())
        } else {
            Err(SeriesError::LengthMismatch {
                instrument: self.instrument_id.to_string(),
                values: self.values.len(),
                labels,
            })
        }
    }
}

/// Labelled series with sanitised values, truncated to the chart's label count.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledSeries {
    pub instrument_id: InstrumentId,
    pub label: String,
    pub values: Vec<f64>,
}

impl LabeledSeries {
    /// Build a series aligned to `labels` chart categories.
    ///
    /// Values are matched to labels by position up to the shorter of the two; any surplus on
    /// either side is dropped with a warning. Non-finite values become 0 and every value is
    /// clamped into [0, 100].
    pub fn aligned(config: &SeriesConfig, labels: usize, catalog: &InstrumentCatalog) -> Self {
        if config.values.len() != labels {
            warn!(
                instrument = %config.instrument_id,
                values = config.values.len(),
                labels,
                "series length does not match chart labels, truncating to the shorter"
            );
        }

        Self {
            instrument_id: config.instrument_id.clone(),
            label: catalog.resolve_label(&config.instrument_id, config.label.as_deref()),
            values: config
                .values
                .iter()
                .take(labels)
                .copied()
                .map(clamp_score)
                .collect(),
        }
    }

    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Attach labels to every configured series and align each to the chart labels.
pub fn build_series(
    labels: &[String],
    configs: &[SeriesConfig],
    catalog: &InstrumentCatalog,
) -> Vec<LabeledSeries> {
    configs
        .iter()
        .map(|config| LabeledSeries::aligned(config, labels.len(), catalog))
        .collect()
}
