#![forbid(unsafe_code)]

//! # Desk Strength
//!
//! Geometry and live data for the market strength views of a trading desk:
//! - strength scores and time series labelled from an instrument catalog
//! - pixel geometry for the relative-strength chart and the short/long term matrix
//! - momentum classification for the market movers board, refreshed from a live feed on an
//!   interval and on realtime change notifications
//! - standalone SVG rendering of the geometry
//!
//! Every geometry builder is a pure function of its inputs. The only asynchronous pieces are
//! the [`refresh::MomentumRefresher`] and the [`realtime::RealtimeNotifier`] it subscribes to.

pub mod config;
pub mod error;
pub mod feed;
pub mod format;
pub mod geometry;
pub mod instrument;
pub mod momentum;
pub mod panel;
pub mod realtime;
pub mod refresh;
pub mod series;
pub mod strength;
pub mod svg;

pub use config::{AssetClassConfig, DeskConfig, FeedConfig, RealtimeConfig};
pub use error::{ConfigError, FeedError, RenderError, SeriesError, UnknownClassification};
pub use feed::{HttpMomentumFeed, MomentumFeed};
pub use instrument::{InstrumentCatalog, InstrumentId, InstrumentMeta, format_instrument_id};
pub use momentum::{
    MomentumClassification, MomentumEntry, RawMomentumEntry, classify, clamp_momentum_score,
    normalize, normalize_all,
};
pub use panel::StrengthPanel;
pub use realtime::{ChangeCallback, ChangeNotifier, RealtimeNotifier, RealtimeStatus, Subscription};
pub use refresh::{MomentumBoard, MomentumRefresher};
pub use series::{LabeledSeries, SeriesConfig, build_series};
pub use strength::{Sentiment, StrengthEntry, StrengthEntryConfig, normalize_strength_entries};
