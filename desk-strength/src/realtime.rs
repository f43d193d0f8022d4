//! Realtime change notifications for the momentum table.
//!
//! [`ChangeNotifier`] is the capability the refresher depends on: `subscribe(callback)`
//! returns a [`Subscription`] that unsubscribes when dropped. [`RealtimeNotifier`]
//! implements it over a realtime websocket (postgres changes channel) with heartbeats and
//! automatic reconnection.

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::RealtimeConfig;
use crate::error::ConfigError;

/// Callback fired on every change notification.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Push-style change notifications.
pub trait ChangeNotifier: Send + Sync {
    fn subscribe(&self, callback: ChangeCallback) -> Subscription;
}

/// Handle to an active subscription. Dropping it unsubscribes.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Subscription with nothing to tear down.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Connection status of the realtime channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealtimeStatus {
    Connected,
    Disconnected,
    Reconnecting,
}

/// Outbound channel message.
#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    topic: &'a str,
    event: &'a str,
    payload: serde_json::Value,
    #[serde(rename = "ref")]
    reference: String,
}

/// Inbound channel message. `ref` and friends are ignored.
#[derive(Debug, Deserialize)]
struct InboundMessage {
    topic: String,
    event: String,
    #[serde(default)]
    payload: serde_json::Value,
}

fn join_message(config: &RealtimeConfig, topic: &str, reference: u64) -> String {
    let message = OutboundMessage {
        topic,
        event: "phx_join",
        payload: serde_json::json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [
                    { "event": "*", "schema": config.schema, "table": config.table }
                ]
            }
        }),
        reference: reference.to_string(),
    };
    serde_json::to_string(&message).unwrap_or_default()
}

fn heartbeat_message(reference: u64) -> String {
    let message = OutboundMessage {
        topic: "phoenix",
        event: "heartbeat",
        payload: serde_json::json!({}),
        reference: reference.to_string(),
    };
    serde_json::to_string(&message).unwrap_or_default()
}

/// What an inbound text frame means for subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Inbound {
    /// A row of the watched table changed
    Change,
    /// Join or heartbeat reply
    Reply { ok: bool },
    /// Channel closed or errored server side
    ChannelDown,
    Other,
}

fn classify_inbound(text: &str, topic: &str) -> Option<Inbound> {
    let message = serde_json::from_str::<InboundMessage>(text).ok()?;

    let inbound = match message.event.as_str() {
        "postgres_changes" | "INSERT" | "UPDATE" | "DELETE" if message.topic == topic => {
            Inbound::Change
        }
        "phx_reply" => Inbound::Reply {
            ok: message.payload.get("status").and_then(|status| status.as_str()) == Some("ok"),
        },
        "phx_error" | "phx_close" if message.topic == topic => Inbound::ChannelDown,
        _ => Inbound::Other,
    };
    Some(inbound)
}

/// [`ChangeNotifier`] over a realtime websocket.
#[derive(Debug)]
pub struct RealtimeNotifier {
    config: RealtimeConfig,
    url: Url,
    status_tx: watch::Sender<RealtimeStatus>,
}

impl RealtimeNotifier {
    pub fn new(config: RealtimeConfig) -> Result<Self, ConfigError> {
        let url = config.connect_url()?;
        let (status_tx, _) = watch::channel(RealtimeStatus::Disconnected);
        Ok(Self {
            config,
            url,
            status_tx,
        })
    }

    /// Receiver for connection status updates.
    pub fn status(&self) -> watch::Receiver<RealtimeStatus> {
        self.status_tx.subscribe()
    }
}

impl ChangeNotifier for RealtimeNotifier {
    fn subscribe(&self, callback: ChangeCallback) -> Subscription {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            error!("realtime subscribe called outside a tokio runtime, notifications disabled");
            return Subscription::noop();
        };

        let config = self.config.clone();
        let url = self.url.clone();
        let status_tx = self.status_tx.clone();
        let handle = runtime.spawn(async move {
            run_realtime_loop(config, url, callback, status_tx).await;
        });

        let status_tx = self.status_tx.clone();
        Subscription::new(move || {
            handle.abort();
            status_tx.send_replace(RealtimeStatus::Disconnected);
            debug!("realtime subscription cancelled");
        })
    }
}

/// Connect, join the change channel and forward change events until the socket drops,
/// then reconnect after the configured delay.
async fn run_realtime_loop(
    config: RealtimeConfig,
    url: Url,
    callback: ChangeCallback,
    status_tx: watch::Sender<RealtimeStatus>,
) {
    let topic = config.topic();
    info!("Starting realtime listener for {} on {}", topic, config.url);

    let mut reference: u64 = 0;

    loop {
        status_tx.send_replace(RealtimeStatus::Reconnecting);

        match connect_async(url.as_str()).await {
            Ok((ws_stream, _)) => {
                info!("Connected to realtime at {}", config.url);
                let (mut write, mut read) = ws_stream.split();

                reference += 1;
                if let Err(e) = write
                    .send(Message::text(join_message(&config, &topic, reference)))
                    .await
                {
                    error!("Failed to join {}: {}", topic, e);
                } else {
                    status_tx.send_replace(RealtimeStatus::Connected);

                    let mut heartbeat = tokio::time::interval(config.heartbeat_period());
                    // First tick completes immediately
                    heartbeat.tick().await;

                    loop {
                        tokio::select! {
                            _ = heartbeat.tick() => {
                                reference += 1;
                                if write.send(Message::text(heartbeat_message(reference))).await.is_err() {
                                    debug!("Failed to send heartbeat, connection likely dead");
                                    break;
                                }
                            }
                            msg = read.next() => match msg {
                                Some(Ok(Message::Text(text))) => {
                                    match classify_inbound(text.as_str(), &topic) {
                                        Some(Inbound::Change) => {
                                            debug!("Change notification on {}", topic);
                                            callback();
                                        }
                                        Some(Inbound::Reply { ok: false }) => {
                                            warn!("Realtime rejected a request: {}", text.as_str());
                                        }
                                        Some(Inbound::ChannelDown) => {
                                            warn!("Realtime channel {} closed by server", topic);
                                            break;
                                        }
                                        Some(_) => {}
                                        None => {
                                            let preview: String = text.as_str().chars().take(100).collect();
                                            debug!("Failed to parse realtime message: {}", preview);
                                        }
                                    }
                                }
                                Some(Ok(Message::Close(_))) | None => {
                                    warn!("Realtime connection closed");
                                    break;
                                }
                                Some(Ok(_)) => {
                                    // Ping/Pong handled by tungstenite
                                }
                                Some(Err(e)) => {
                                    error!("Realtime error: {}", e);
                                    break;
                                }
                            }
                        }
                    }
                }

                status_tx.send_replace(RealtimeStatus::Disconnected);
            }
            Err(e) => {
                error!("Failed to connect to realtime at {}: {}", config.url, e);
                status_tx.send_replace(RealtimeStatus::Disconnected);
            }
        }

        debug!(
            "Waiting {:?} before reconnecting to realtime...",
            config.reconnect_delay
        );
        tokio::time::sleep(config.reconnect_delay).await;
    }
}
