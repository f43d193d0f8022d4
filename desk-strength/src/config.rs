//! Desk configuration.
//!
//! Two kinds of configuration live here:
//! - the static desk config (instrument metadata plus one [`AssetClassConfig`] per asset
//!   class), loaded from JSON
//! - runtime settings for the momentum feed and the realtime change channel, built from
//!   defaults, builder methods and environment variables

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::geometry::MatrixPointConfig;
use crate::instrument::InstrumentCatalog;
use crate::momentum::RawMomentumEntry;
use crate::series::SeriesConfig;
use crate::strength::StrengthEntryConfig;

/// Default interval between momentum refreshes, measured from the end of the previous attempt.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct StrengthConfig {
    #[serde(default)]
    pub entries: Vec<StrengthEntryConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MatrixConfig {
    #[serde(default)]
    pub points: Vec<MatrixPointConfig>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMoversConfig {
    #[serde(default)]
    pub default_entries: Vec<RawMomentumEntry>,
}

/// Everything the strength views need for one asset class.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassConfig {
    #[serde(default)]
    pub strength: StrengthConfig,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub market_movers: MarketMoversConfig,
}

/// Static desk configuration keyed by asset class.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskConfig {
    #[serde(default)]
    pub instruments: InstrumentCatalog,
    #[serde(default)]
    pub asset_classes: BTreeMap<String, AssetClassConfig>,
}

impl DeskConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn asset_class(&self, name: &str) -> Result<&AssetClassConfig, ConfigError> {
        self.asset_classes
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAssetClass(name.to_string()))
    }

    pub fn asset_class_names(&self) -> impl Iterator<Item = &str> {
        self.asset_classes.keys().map(String::as_str)
    }
}

/// Read an environment variable, treating blank values as unset.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Momentum feed (hosted backend function) settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Backend function URL
    pub url: String,
    /// Anonymous api key sent as `apikey` and bearer token
    pub api_key: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Delay between the end of one refresh attempt and the start of the next
    pub refresh_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:54321/functions/v1/momentum-scores".to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(10),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl FeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `DESK_MOMENTUM_FEED_URL` and `DESK_API_KEY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_var("DESK_MOMENTUM_FEED_URL").unwrap_or(defaults.url),
            api_key: env_var("DESK_API_KEY"),
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn parsed_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.url.clone(),
            source,
        })
    }
}

/// Shortest heartbeat period the realtime listener will use.
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Realtime change channel settings.
#[derive(Debug, Clone)]
pub struct RealtimeConfig {
    /// Realtime websocket endpoint
    pub url: String,
    /// Anonymous api key appended to the connection url
    pub api_key: Option<String>,
    /// Database schema of the watched table
    pub schema: String,
    /// Watched table
    pub table: String,
    /// Heartbeat interval to keep the channel alive
    pub heartbeat_interval: Duration,
    /// Reconnection delay after disconnect
    pub reconnect_delay: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:54321/realtime/v1/websocket".to_string(),
            api_key: None,
            schema: "public".to_string(),
            table: "momentum_scores".to_string(),
            heartbeat_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

impl RealtimeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Defaults overridden by `DESK_REALTIME_WS_URL`, `DESK_API_KEY` and `DESK_MOMENTUM_TABLE`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_var("DESK_REALTIME_WS_URL").unwrap_or(defaults.url),
            api_key: env_var("DESK_API_KEY"),
            table: env_var("DESK_MOMENTUM_TABLE").unwrap_or(defaults.table),
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Connection url with the api key and protocol version in the query string.
    pub fn connect_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.url).map_err(|source| ConfigError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
            query.append_pair("vsn", "1.0.0");
        }

        Ok(url)
    }

    /// Heartbeat period actually used, never shorter than [`MIN_HEARTBEAT_INTERVAL`].
    pub fn heartbeat_period(&self) -> Duration {
        self.heartbeat_interval.max(MIN_HEARTBEAT_INTERVAL)
    }

    /// Channel topic for the watched table.
    pub fn topic(&self) -> String {
        format!("realtime:{}:{}", self.schema, self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::InstrumentId;

    const DESK_JSON: &str = r#"{
        "instruments": {
            "eur_usd": { "ticker": "EURUSD", "name": "Euro / US Dollar" }
        },
        "assetClasses": {
            "forex": {
                "strength": {
                    "entries": [
                        { "instrumentId": "eur_usd", "score": 64, "sentiment": "bullish", "dayChange": "+0.32%" }
                    ]
                },
                "chart": {
                    "labels": ["W1", "W2", "W3"],
                    "series": [ { "instrumentId": "eur_usd", "values": [40, 52, 64] } ]
                },
                "matrix": {
                    "points": [
                        { "instrumentId": "eur_usd", "shortTerm": 64, "longTerm": 58, "direction": "bullish", "conviction": 70 }
                    ]
                },
                "marketMovers": {
                    "defaultEntries": [ { "symbol": "EURUSD", "display": "EUR/USD", "score": 61 } ]
                }
            },
            "crypto": {}
        }
    }"#;

    #[test]
    fn test_desk_config_parses() {
        let config = DeskConfig::from_json_str(DESK_JSON).unwrap();

        assert_eq!(config.instruments.len(), 1);
        assert_eq!(config.asset_class_names().collect::<Vec<_>>(), vec!["crypto", "forex"]);

        let forex = config.asset_class("forex").unwrap();
        assert_eq!(forex.strength.entries[0].instrument_id, InstrumentId::new("eur_usd"));
        assert_eq!(forex.chart.labels.len(), 3);
        assert_eq!(forex.chart.series[0].values, vec![40.0, 52.0, 64.0]);
        assert_eq!(forex.matrix.points[0].conviction, 70.0);
        assert_eq!(forex.market_movers.default_entries[0].symbol, "EURUSD");

        let crypto = config.asset_class("crypto").unwrap();
        assert!(crypto.chart.series.is_empty());
    }

    #[test]
    fn test_unknown_asset_class() {
        let config = DeskConfig::from_json_str(DESK_JSON).unwrap();
        assert!(matches!(
            config.asset_class("rates"),
            Err(ConfigError::UnknownAssetClass(name)) if name == "rates"
        ));
    }

    #[test]
    fn test_malformed_config_is_a_parse_error() {
        assert!(matches!(
            DeskConfig::from_json_str("{ \"assetClasses\": [] }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        assert!(matches!(
            DeskConfig::from_path("/definitely/not/here/desk.json"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_feed_config_builder() {
        let config = FeedConfig::new("https://example.supabase.co/functions/v1/momentum")
            .with_api_key("anon")
            .with_refresh_interval(Duration::from_secs(15));

        assert_eq!(config.api_key.as_deref(), Some("anon"));
        assert_eq!(config.refresh_interval, Duration::from_secs(15));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.parsed_url().is_ok());
        assert!(FeedConfig::new("not a url").parsed_url().is_err());
    }

    #[test]
    fn test_heartbeat_period_has_a_floor() {
        let config = RealtimeConfig::default().with_heartbeat_interval(Duration::ZERO);
        assert_eq!(config.heartbeat_period(), MIN_HEARTBEAT_INTERVAL);

        let config = RealtimeConfig::default().with_heartbeat_interval(Duration::from_secs(15));
        assert_eq!(config.heartbeat_period(), Duration::from_secs(15));
    }

    #[test]
    fn test_realtime_connect_url_and_topic() {
        let config = RealtimeConfig::new("wss://example.supabase.co/realtime/v1/websocket")
            .with_api_key("anon")
            .with_table("momentum");

        let url = config.connect_url().unwrap();
        assert_eq!(url.scheme(), "wss");
        assert_eq!(url.query(), Some("apikey=anon&vsn=1.0.0"));
        assert_eq!(config.topic(), "realtime:public:momentum");
    }
}
