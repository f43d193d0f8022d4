//! Momentum feed: the hosted backend function serving the latest momentum rows.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::FeedConfig;
use crate::error::{ConfigError, FeedError};
use crate::momentum::RawMomentumEntry;

/// Source of momentum rows.
///
/// `Ok(None)` means the backend answered without a `data` field; callers keep what they have.
#[async_trait]
pub trait MomentumFeed: Send + Sync {
    async fn fetch(&self) -> Result<Option<Vec<RawMomentumEntry>>, FeedError>;
}

/// Response body of the momentum backend function.
#[derive(Debug, Default, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub data: Option<Vec<RawMomentumEntry>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FeedResponse {
    /// Server supplied error text, if any.
    pub fn server_message(&self) -> Option<String> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    }
}

/// [`MomentumFeed`] backed by an HTTP backend function.
#[derive(Debug, Clone)]
pub struct HttpMomentumFeed {
    client: Client,
    url: Url,
    api_key: Option<String>,
}

impl HttpMomentumFeed {
    pub fn new(config: &FeedConfig) -> Result<Self, ConfigError> {
        let url = config.parsed_url()?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| ConfigError::HttpClient(error.to_string()))?;

        Ok(Self {
            client,
            url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl MomentumFeed for HttpMomentumFeed {
    async fn fetch(&self) -> Result<Option<Vec<RawMomentumEntry>>, FeedError> {
        let mut request = self.client.post(self.url.clone()).json(&serde_json::json!({}));
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        decode_response(status, &body)
    }
}

/// Map a response status and body to feed rows.
///
/// Non-2xx responses become [`FeedError::Status`] carrying the body's `error`/`message` text
/// when the body is JSON and has one.
pub fn decode_response(
    status: StatusCode,
    body: &str,
) -> Result<Option<Vec<RawMomentumEntry>>, FeedError> {
    if !status.is_success() {
        let message = serde_json::from_str::<FeedResponse>(body)
            .ok()
            .and_then(|response| response.server_message());
        return Err(FeedError::Status {
            status: status.as_u16(),
            message,
        });
    }

    parse_feed_body(body)
}

/// Decode a successful response body.
pub fn parse_feed_body(body: &str) -> Result<Option<Vec<RawMomentumEntry>>, FeedError> {
    let response: FeedResponse =
        serde_json::from_str(body).map_err(|error| FeedError::Decode(error.to_string()))?;

    if response.data.is_none() {
        if let Some(message) = response.server_message() {
            return Err(FeedError::Server(message));
        }
    }

    debug!(
        rows = response.data.as_ref().map(Vec::len),
        "decoded momentum feed response"
    );
    Ok(response.data)
}
