//! Everything the strength views of one asset class render, built in one pass.

use serde::Serialize;
use tracing::debug;

use crate::config::{AssetClassConfig, DeskConfig};
use crate::error::ConfigError;
use crate::geometry::{ChartGeometry, MatrixGeometry, build_chart, build_matrix};
use crate::instrument::InstrumentCatalog;
use crate::momentum::{MomentumEntry, normalize_all};
use crate::series::build_series;
use crate::strength::{StrengthEntry, normalize_strength_entries};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrengthPanel {
    pub entries: Vec<StrengthEntry>,
    pub chart: ChartGeometry,
    pub matrix: MatrixGeometry,
    /// Market movers shown until the live feed answers
    pub default_movers: Vec<MomentumEntry>,
}

impl StrengthPanel {
    pub fn build(config: &AssetClassConfig, catalog: &InstrumentCatalog) -> Self {
        let series = build_series(&config.chart.labels, &config.chart.series, catalog);

        let panel = Self {
            entries: normalize_strength_entries(&config.strength.entries, catalog),
            chart: build_chart(&config.chart.labels, &series),
            matrix: build_matrix(&config.matrix.points, catalog),
            default_movers: normalize_all(&config.market_movers.default_entries),
        };

        debug!(
            entries = panel.entries.len(),
            series = panel.chart.series.len(),
            points = panel.matrix.points.len(),
            movers = panel.default_movers.len(),
            "built strength panel"
        );
        panel
    }

    /// Build the panel of a named asset class of the desk.
    pub fn for_asset_class(desk: &DeskConfig, asset_class: &str) -> Result<Self, ConfigError> {
        let config = desk.asset_class(asset_class)?;
        Ok(Self::build(config, &desk.instruments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::momentum::MomentumClassification;

    const DESK_JSON: &str = r#"{
        "instruments": {
            "eur_usd": { "ticker": "EURUSD" },
            "xau_usd": { "short": "GOLD", "name": "Gold Spot" }
        },
        "assetClasses": {
            "forex": {
                "strength": {
                    "entries": [
                        { "instrumentId": "eur_usd", "score": 64, "sentiment": "bullish", "dayChange": "+0.32%" },
                        { "instrumentId": "xau_usd", "score": 120, "sentiment": "bearish", "dayChange": "-1.10%" }
                    ]
                },
                "chart": {
                    "labels": ["W1", "W2", "W3"],
                    "series": [
                        { "instrumentId": "eur_usd", "values": [20, 50, 80] },
                        { "instrumentId": "gbp_usd", "label": "Cable", "values": [30, 40, 50, 60] }
                    ]
                },
                "matrix": {
                    "points": [
                        { "instrumentId": "xau_usd", "shortTerm": 72, "longTerm": 66, "direction": "bullish", "conviction": 80 }
                    ]
                },
                "marketMovers": {
                    "defaultEntries": [ { "symbol": "EURUSD", "display": "EUR/USD", "score": 72 } ]
                }
            }
        }
    }"#;

    #[test]
    fn test_build_forex_panel() {
        let desk = DeskConfig::from_json_str(DESK_JSON).unwrap();
        let panel = StrengthPanel::for_asset_class(&desk, "forex").unwrap();

        assert_eq!(panel.entries.len(), 2);
        assert_eq!(panel.entries[0].label, "EURUSD");
        assert_eq!(panel.entries[1].label, "GOLD");
        assert_eq!(panel.entries[1].score, 100.0);

        assert_eq!(panel.chart.series.len(), 2);
        assert_eq!(panel.chart.series[0].points.len(), 3);
        assert_eq!(
            panel.chart.series[0].last_point.as_ref().map(|last| last.label.as_str()),
            Some("80")
        );
        // Longer series is cut to the label count
        assert_eq!(panel.chart.series[1].label, "Cable");
        assert_eq!(panel.chart.series[1].points.len(), 3);

        assert_eq!(panel.matrix.points.len(), 1);
        assert_eq!(panel.matrix.points[0].label, "GOLD");

        assert_eq!(
            panel.default_movers[0].classification,
            MomentumClassification::VeryBullish
        );
    }

    #[test]
    fn test_empty_asset_class_builds_empty_panel() {
        let panel = StrengthPanel::build(&AssetClassConfig::default(), &InstrumentCatalog::new());

        assert!(panel.entries.is_empty());
        assert!(panel.chart.series.is_empty());
        assert!(panel.chart.x_ticks.is_empty());
        assert_eq!(panel.chart.y_ticks.len(), 5);
        assert!(panel.matrix.points.is_empty());
        assert!(panel.default_movers.is_empty());
    }

    #[test]
    fn test_unknown_asset_class() {
        let desk = DeskConfig::from_json_str(DESK_JSON).unwrap();
        assert!(matches!(
            StrengthPanel::for_asset_class(&desk, "rates"),
            Err(ConfigError::UnknownAssetClass(_))
        ));
    }
}
