//! Instrument identifiers and the metadata table used to resolve display labels.

use derive_more::{Display, From};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Opaque key identifying a tradeable instrument (eg/ "eur_usd", "XAUUSD", "btc").
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Display, From, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct InstrumentId(pub SmolStr);

impl InstrumentId {
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self(SmolStr::new(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for InstrumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Display metadata for an instrument. Every field is optional in the source table.
#[derive(Debug, Clone, Eq, PartialEq, Default, Deserialize, Serialize)]
pub struct InstrumentMeta {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl InstrumentMeta {
    /// First non-blank of ticker, short code, name.
    pub fn label(&self) -> Option<&str> {
        [&self.ticker, &self.short, &self.name]
            .into_iter()
            .flatten()
            .map(|label| label.trim())
            .find(|label| !label.is_empty())
    }
}

/// Lookup table from [`InstrumentId`] to [`InstrumentMeta`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct InstrumentCatalog {
    instruments: FnvHashMap<InstrumentId, InstrumentMeta>,
}

impl InstrumentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<InstrumentId>, meta: InstrumentMeta) {
        self.instruments.insert(id.into(), meta);
    }

    pub fn with(mut self, id: impl Into<InstrumentId>, meta: InstrumentMeta) -> Self {
        self.insert(id, meta);
        self
    }

    pub fn get(&self, id: &InstrumentId) -> Option<&InstrumentMeta> {
        self.instruments.get(id)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Resolve the display label for an instrument.
    ///
    /// Precedence: a non-blank explicit label, then the catalog metadata, then
    /// [`format_instrument_id`]. Never fails.
    pub fn resolve_label(&self, id: &InstrumentId, explicit: Option<&str>) -> String {
        if let Some(label) = explicit.map(str::trim).filter(|label| !label.is_empty()) {
            return label.to_string();
        }

        self.get(id)
            .and_then(InstrumentMeta::label)
            .map(str::to_string)
            .unwrap_or_else(|| format_instrument_id(id))
    }
}

impl FromIterator<(InstrumentId, InstrumentMeta)> for InstrumentCatalog {
    fn from_iter<T: IntoIterator<Item = (InstrumentId, InstrumentMeta)>>(iter: T) -> Self {
        Self {
            instruments: iter.into_iter().collect(),
        }
    }
}

/// Fallback label for instruments missing from the catalog.
///
/// Uppercases the id and joins `_`, `-`, `/` and `:` separated parts with `/`, so
/// "eur_usd" becomes "EUR/USD" and "xauusd" becomes "XAUUSD".
pub fn format_instrument_id(id: &InstrumentId) -> String {
    let parts: Vec<String> = id
        .as_str()
        .split(['_', '-', '/', ':'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_uppercase)
        .collect();

    if parts.is_empty() {
        id.as_str().trim().to_uppercase()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(ticker: Option<&str>, short: Option<&str>, name: Option<&str>) -> InstrumentMeta {
        InstrumentMeta {
            ticker: ticker.map(str::to_string),
            short: short.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn test_format_instrument_id() {
        assert_eq!(format_instrument_id(&"eur_usd".into()), "EUR/USD");
        assert_eq!(format_instrument_id(&"xauusd".into()), "XAUUSD");
        assert_eq!(format_instrument_id(&"btc-usdt".into()), "BTC/USDT");
        assert_eq!(format_instrument_id(&"__".into()), "__");
        assert_eq!(format_instrument_id(&"".into()), "");
    }

    #[test]
    fn test_meta_label_precedence() {
        assert_eq!(meta(Some("EURUSD"), Some("EU"), Some("Euro")).label(), Some("EURUSD"));
        assert_eq!(meta(None, Some("EU"), Some("Euro")).label(), Some("EU"));
        assert_eq!(meta(Some("  "), None, Some("Euro")).label(), Some("Euro"));
        assert_eq!(meta(None, None, None).label(), None);
    }

    #[test]
    fn test_resolve_label() {
        let catalog = InstrumentCatalog::new()
            .with("eur_usd", meta(Some("EURUSD"), None, None))
            .with("spx", meta(None, None, Some("S&P 500")));

        assert_eq!(catalog.resolve_label(&"eur_usd".into(), None), "EURUSD");
        assert_eq!(catalog.resolve_label(&"eur_usd".into(), Some("Euro")), "Euro");
        assert_eq!(catalog.resolve_label(&"eur_usd".into(), Some(" ")), "EURUSD");
        assert_eq!(catalog.resolve_label(&"spx".into(), None), "S&P 500");
        assert_eq!(catalog.resolve_label(&"gbp_jpy".into(), None), "GBP/JPY");
    }

    #[test]
    fn test_catalog_deserialises_from_map() {
        let catalog: InstrumentCatalog = serde_json::from_str(
            r#"{ "xau_usd": { "ticker": "XAUUSD", "name": "Gold" }, "btc": {} }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve_label(&"xau_usd".into(), None), "XAUUSD");
        assert_eq!(catalog.resolve_label(&"btc".into(), None), "BTC");
    }
}
