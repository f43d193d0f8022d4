use thiserror::Error;

/// Message shown when the momentum feed fails without a usable server message.
pub const GENERIC_FEED_ERROR: &str = "Unable to load market movers";

/// Errors raised while loading the static desk configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read desk config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse desk config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown asset class: {0}")]
    UnknownAssetClass(String),

    #[error("failed to build http client: {0}")]
    HttpClient(String),

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors raised by a [`MomentumFeed`](crate::feed::MomentumFeed) fetch.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FeedError {
    #[error("momentum feed transport error: {0}")]
    Transport(String),

    #[error("momentum feed returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("momentum feed server error: {0}")]
    Server(String),

    #[error("failed to decode momentum feed response: {0}")]
    Decode(String),
}

impl FeedError {
    /// User facing message: the server supplied message when there is one, otherwise a
    /// generic fallback.
    pub fn display_message(&self) -> String {
        let server_message = match self {
            FeedError::Status {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            FeedError::Server(message) => Some(message.as_str()),
            _ => None,
        };

        server_message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| GENERIC_FEED_ERROR.to_string())
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FeedError::Decode(error.to_string())
        } else {
            FeedError::Transport(error.to_string())
        }
    }
}

/// Raised by strict series validation when a series does not line up with its chart labels.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum SeriesError {
    #[error("series {instrument} has {values} values but the chart has {labels} labels")]
    LengthMismatch {
        instrument: String,
        values: usize,
        labels: usize,
    },
}

/// Raised when a classification string is not one of the four momentum buckets.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown momentum classification: {0}")]
pub struct UnknownClassification(pub String);

/// Errors raised while writing rendered SVG documents.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
