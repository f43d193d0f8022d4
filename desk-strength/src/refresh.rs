//! Live momentum board refresh.
//!
//! One tokio task per board: fetch, publish, then wait for either the refresh interval
//! (measured from the end of the previous attempt) or a change notification. Only one fetch is
//! ever in flight. Each successful fetch replaces the whole entry list; failures keep the
//! previous entries and publish a display message instead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::feed::MomentumFeed;
use crate::momentum::{MomentumEntry, RawMomentumEntry, normalize_all};
use crate::realtime::{ChangeNotifier, Subscription};

/// Snapshot of a momentum board.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumBoard {
    pub entries: Vec<MomentumEntry>,
    /// Display message of the last failed attempt, cleared by the next success
    pub error: Option<String>,
    pub loading: bool,
    pub last_success: Option<DateTime<Utc>>,
    /// Completed fetch attempts, successful or not
    pub cycles: u64,
}

impl MomentumBoard {
    pub fn new(defaults: Vec<MomentumEntry>) -> Self {
        Self {
            entries: defaults,
            error: None,
            loading: true,
            last_success: None,
            cycles: 0,
        }
    }

    pub fn from_defaults(defaults: &[RawMomentumEntry]) -> Self {
        Self::new(normalize_all(defaults))
    }

    /// Fold one fetch result into the board.
    ///
    /// `Ok(Some(rows))` replaces every entry, `Ok(None)` keeps the entries, and both clear the
    /// error. `Err` keeps the entries and records the display message.
    pub fn apply(
        &mut self,
        result: Result<Option<Vec<RawMomentumEntry>>, FeedError>,
        now: DateTime<Utc>,
    ) {
        match result {
            Ok(Some(rows)) => {
                self.entries = normalize_all(&rows);
                self.error = None;
                self.last_success = Some(now);
            }
            Ok(None) => {
                self.error = None;
                self.last_success = Some(now);
            }
            Err(error) => {
                warn!(%error, "momentum refresh failed, keeping previous entries");
                self.error = Some(error.display_message());
            }
        }
        self.loading = false;
        self.cycles += 1;
    }
}

/// Background refresher for a [`MomentumBoard`].
///
/// Dropping the refresher (or calling [`MomentumRefresher::shutdown`]) cancels the pending
/// timer, unsubscribes from change notifications and guarantees no further board updates.
#[derive(Debug)]
pub struct MomentumRefresher {
    board_rx: watch::Receiver<MomentumBoard>,
    refresh: Arc<Notify>,
    mounted: Arc<AtomicBool>,
    task: JoinHandle<()>,
    subscription: Option<Subscription>,
}

impl MomentumRefresher {
    /// Start refreshing. Must be called from within a tokio runtime.
    pub fn spawn(
        defaults: &[RawMomentumEntry],
        feed: Arc<dyn MomentumFeed>,
        notifier: &dyn ChangeNotifier,
        interval: Duration,
    ) -> Self {
        let (board_tx, board_rx) = watch::channel(MomentumBoard::from_defaults(defaults));
        let refresh = Arc::new(Notify::new());
        let mounted = Arc::new(AtomicBool::new(true));

        let subscription = {
            let refresh = Arc::clone(&refresh);
            notifier.subscribe(Arc::new(move || refresh.notify_one()))
        };

        let task = tokio::spawn(run_refresh_loop(
            feed,
            board_tx,
            Arc::clone(&refresh),
            Arc::clone(&mounted),
            interval,
        ));

        Self {
            board_rx,
            refresh,
            mounted,
            task,
            subscription: Some(subscription),
        }
    }

    /// Current board snapshot.
    pub fn board(&self) -> MomentumBoard {
        self.board_rx.borrow().clone()
    }

    /// Receiver notified on every board update.
    pub fn subscribe(&self) -> watch::Receiver<MomentumBoard> {
        self.board_rx.clone()
    }

    /// Fetch again as soon as the in-flight attempt (if any) settles.
    pub fn request_refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.mounted.swap(false, Ordering::AcqRel) {
            self.task.abort();
            if let Some(subscription) = self.subscription.take() {
                subscription.unsubscribe();
            }
            debug!("momentum refresher torn down");
        }
    }
}

impl Drop for MomentumRefresher {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run_refresh_loop(
    feed: Arc<dyn MomentumFeed>,
    board_tx: watch::Sender<MomentumBoard>,
    refresh: Arc<Notify>,
    mounted: Arc<AtomicBool>,
    interval: Duration,
) {
    info!("Starting momentum refresher (interval {:?})", interval);

    loop {
        if !mounted.load(Ordering::Acquire) {
            return;
        }
        board_tx.send_modify(|board| board.loading = true);

        let result = feed.fetch().await;

        // Torn down while the fetch was in flight
        if !mounted.load(Ordering::Acquire) {
            debug!("discarding momentum result after teardown");
            return;
        }
        board_tx.send_modify(|board| board.apply(result, Utc::now()));

        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                debug!("momentum refresh interval elapsed");
            }
            _ = refresh.notified() => {
                debug!("momentum refresh requested");
            }
        }
    }
}
