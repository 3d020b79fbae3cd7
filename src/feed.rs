//! Feed runtime: wires the stream, the snapshot client, and the sync engine.
//!
//! [`DepthFeed`] owns the engine and is its only writer; its run loop is the
//! single sequential path through which snapshot completions and diff events
//! mutate book state. Readers hold a [`BookReader`], which observes immutable
//! [`BookView`]s published by pointer swap after each successful apply -
//! a reader can never see one side at event N and the other at N-1.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{error, info, warn};

use crate::client::rest::RestClient;
use crate::client::websocket::{DepthStream, ReconnectConfig};
use crate::config::Config;
use crate::error::Error;
use crate::orderbook::sync::{ApplyOutcome, BookView, SnapshotOutcome, SyncEngine, SyncState};
use crate::types::messages::DepthSnapshot;

/// Shared slot the feed publishes into and readers read from
struct Shared {
    view: RwLock<Arc<BookView>>,
}

/// Read handle over the feed's published book.
///
/// Cheap to clone and safe to use from any task; reads are lock-held only for
/// the duration of an `Arc` clone.
#[derive(Clone)]
pub struct BookReader {
    shared: Arc<Shared>,
}

impl BookReader {
    /// Current view, truncated to `limit` levels per side.
    ///
    /// Always answers, even mid-resync; check `sync_state` on the returned
    /// view to know whether it is live or last-known.
    #[must_use]
    pub fn book(&self, limit: usize) -> BookView {
        self.shared.view.read().truncated(limit)
    }

    /// Like [`book`](Self::book) but refuses stale data.
    ///
    /// # Errors
    ///
    /// `Error::NotSynced` while the feed is unsynced or mid-resync.
    pub fn try_book(&self, limit: usize) -> Result<BookView, Error> {
        let view = self.shared.view.read();
        if view.sync_state != SyncState::Synced {
            return Err(Error::NotSynced);
        }
        Ok(view.truncated(limit))
    }

    /// The full published view without copying levels
    #[must_use]
    pub fn view(&self) -> Arc<BookView> {
        Arc::clone(&self.shared.view.read())
    }

    /// Whether the published view is live
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.shared.view.read().sync_state == SyncState::Synced
    }
}

/// Runtime that keeps a local book synchronized for one instrument.
///
/// # Example
///
/// ```rust,no_run
/// use binance_depth::{Config, DepthFeed};
///
/// # async fn example() -> binance_depth::Result<()> {
/// let feed = DepthFeed::new(Config::new("BTCUSD_PERP"))?;
/// let reader = feed.reader();
///
/// tokio::spawn(feed.run());
///
/// let view = reader.book(5);
/// println!("top of book: {:?} / {:?}", view.best_bid(), view.best_ask());
/// # Ok(())
/// # }
/// ```
pub struct DepthFeed {
    config: Config,
    reconnect: ReconnectConfig,
    rest: RestClient,
    engine: SyncEngine,
    shared: Arc<Shared>,
    /// Levels per side carried in published views
    published_depth: usize,
}

impl DepthFeed {
    /// Create a feed for the configured instrument
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: Config) -> Result<Self, Error> {
        let rest = RestClient::new(&config)?;
        let engine = SyncEngine::new(config.symbol());
        let published_depth = config.snapshot_limit() as usize;

        let initial = BookView {
            last_update_id: 0,
            symbol: config.symbol().to_string(),
            pair: String::new(),
            event_time: 0,
            transaction_time: 0,
            bids: Vec::new(),
            asks: Vec::new(),
            sync_state: SyncState::Unsynced,
        };
        let shared = Arc::new(Shared {
            view: RwLock::new(Arc::new(initial)),
        });

        Ok(Self {
            config,
            reconnect: ReconnectConfig::default(),
            rest,
            engine,
            shared,
            published_depth,
        })
    }

    /// Set the reconnect and retry policy
    #[must_use]
    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }

    /// Get a read handle; clones share the same published view
    #[must_use]
    pub fn reader(&self) -> BookReader {
        BookReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Drive the feed until a permanent failure.
    ///
    /// Connects the stream, synchronizes via snapshot, applies live events,
    /// and transparently resyncs on gaps and reconnects on transport loss.
    /// Returns only when the retry budget is exhausted or the venue rejects
    /// us permanently; the published view is marked stale before returning,
    /// so no reader sees a `Synced` view from a dead feed.
    pub async fn run(mut self) -> Result<(), Error> {
        let mut attempt = 0u32;

        loop {
            let error = match DepthStream::connect(&self.config).await {
                Ok(mut stream) => {
                    self.engine.start();
                    self.publish();

                    let applied_before = self.engine.stats().applied;
                    let error = match self.drive(&mut stream).await {
                        Err(e) => e,
                        Ok(()) => unreachable!("drive only returns on error"),
                    };
                    // A connection that applied events was healthy; only
                    // connect-and-drop cycles accumulate against the budget.
                    if self.engine.stats().applied > applied_before {
                        attempt = 0;
                    }
                    if error.is_transient() {
                        self.engine.on_source_lost();
                        self.publish();
                    }
                    error
                }
                Err(e) => e,
            };

            if !error.is_transient() {
                self.fail_closed();
                return Err(error);
            }

            attempt += 1;
            let Some(delay) = self.redial_delay(attempt) else {
                error!(error = %error, "stream reconnect budget exhausted");
                self.fail_closed();
                return Err(error);
            };
            warn!(error = %error, ?delay, attempt, "diff source lost, redialing");
            tokio::time::sleep(delay).await;
        }
    }

    /// Backoff before redial number `attempt`, or `None` once the budget
    /// is spent. Disconnects after a successful connect pay the same cost
    /// as failed connects.
    fn redial_delay(&self, attempt: u32) -> Option<Duration> {
        if !self.reconnect.allows_attempt(attempt) {
            return None;
        }
        Some(self.reconnect.delay_for_attempt(attempt - 1))
    }

    /// Event loop for one stream connection. Returns only on error.
    async fn drive(&mut self, stream: &mut DepthStream) -> Result<(), Error> {
        let mut snapshot_needed = true;

        loop {
            if snapshot_needed {
                let snapshot = self.fetch_snapshot_buffering(stream).await?;
                match self.engine.on_snapshot(snapshot) {
                    SnapshotOutcome::Synced => {
                        snapshot_needed = false;
                        self.publish();
                    }
                    SnapshotOutcome::ResyncRequired => {
                        info!("buffered events outran the snapshot, fetching another");
                        continue;
                    }
                }
            }

            match stream.next().await {
                Some(Ok(event)) => match self.engine.on_event(event) {
                    ApplyOutcome::Applied => self.publish(),
                    ApplyOutcome::Gap { .. } => {
                        // Re-publish so readers see the view marked Syncing
                        snapshot_needed = true;
                        self.publish();
                    }
                    ApplyOutcome::Stale | ApplyOutcome::Buffered => {}
                },
                Some(Err(e)) => return Err(e),
                None => return Err(Error::ConnectionClosed),
            }
        }
    }

    /// Fetch a snapshot with bounded backoff, buffering stream events that
    /// arrive in the meantime so they can replay once the snapshot lands.
    async fn fetch_snapshot_buffering(
        &mut self,
        stream: &mut DepthStream,
    ) -> Result<DepthSnapshot, Error> {
        let rest = &self.rest;
        let config = &self.config;
        let engine = &mut self.engine;
        let mut attempt = 0u32;

        loop {
            let delay = if attempt == 0 {
                Duration::ZERO
            } else {
                self.reconnect.delay_for_attempt(attempt - 1)
            };

            let fetch = async {
                tokio::time::sleep(delay).await;
                rest.depth_snapshot(config.symbol(), config.snapshot_limit())
                    .await
            };
            tokio::pin!(fetch);

            loop {
                tokio::select! {
                    result = &mut fetch => match result {
                        Ok(snapshot) => return Ok(snapshot),
                        Err(e) if e.is_transient() => {
                            attempt += 1;
                            if !self.reconnect.allows_attempt(attempt) {
                                error!(error = %e, attempts = attempt, "snapshot retry budget exhausted");
                                return Err(Error::SnapshotUnavailable { attempts: attempt });
                            }
                            warn!(error = %e, attempt, "snapshot fetch failed, backing off");
                            break;
                        }
                        Err(e) => return Err(e),
                    },
                    message = stream.next() => match message {
                        Some(Ok(event)) => {
                            engine.on_event(event);
                        }
                        Some(Err(e)) => return Err(e),
                        None => return Err(Error::ConnectionClosed),
                    },
                }
            }
        }
    }

    /// Swap a freshly built immutable view into the shared slot
    fn publish(&self) {
        let view = Arc::new(self.engine.current_view(self.published_depth));
        *self.shared.view.write() = view;
    }

    /// Stop serving `Synced` views before reporting a permanent failure
    fn fail_closed(&mut self) {
        self.engine.on_source_lost();
        self.publish();
    }
}
