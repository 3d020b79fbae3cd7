//! Snapshot + diff stream reconciliation.
//!
//! This module provides [`SyncEngine`], the state machine that merges a
//! point-in-time REST snapshot with the diff depth stream into one
//! monotonically-advancing book:
//!
//! - Events that arrive before the snapshot resolves are buffered, never
//!   applied directly and never dropped.
//! - Once the snapshot lands, buffered events are replayed in arrival order
//!   through the same gap checks as live events, so every event is applied
//!   exactly once and in order.
//! - A diff whose `pu` does not chain from the last applied `u` means the
//!   venue dropped an event on the floor; the engine refuses to apply it and
//!   demands a fresh snapshot instead of silently corrupting the book.
//!
//! The engine is sans-IO: it never fetches anything itself. Callers feed it
//! snapshots and events and act on the returned outcomes, which keeps every
//! sequencing rule unit-testable without a venue.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::types::messages::{DepthSnapshot, DepthUpdateEvent};
use crate::types::{PriceLevel, TimestampMs, UpdateId};

use super::book::{BookSide, Side};

/// Synchronization state of the local book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    /// No valid snapshot applied yet
    Unsynced,
    /// Snapshot requested; incoming events are being buffered
    Syncing,
    /// Book is valid and tracking live updates
    Synced,
}

/// What the engine did with a diff event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Event applied; the view advanced and should be republished
    Applied,
    /// Engine is not synced; event retained for replay
    Buffered,
    /// Event entirely precedes the current book state; discarded
    Stale,
    /// Missed event detected; this event was buffered and the engine needs a
    /// fresh snapshot
    Gap {
        /// Update id the event was expected to chain from
        expected: UpdateId,
        /// Update id it actually carried
        got: UpdateId,
    },
}

/// Result of applying a snapshot and replaying the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Buffer replayed cleanly; the book is live
    Synced,
    /// Replay hit a gap between buffered events; fetch another snapshot
    ResyncRequired,
}

/// Counters for every decision the engine makes.
///
/// Discards are deliberate outcomes here, not swallowed exceptions; operators
/// can watch these to tell a healthy feed from a flapping one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Events applied to the book
    pub applied: u64,
    /// Events buffered while unsynced
    pub buffered: u64,
    /// Events discarded as already reflected
    pub stale_discarded: u64,
    /// Sequence gaps detected
    pub gaps_detected: u64,
    /// Snapshots applied
    pub snapshots_applied: u64,
}

/// Immutable, self-consistent view of the book.
///
/// Built wholesale after each successful apply and published by pointer swap,
/// so readers never observe one side at event N and the other at N-1.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    /// Id through which this view is valid
    pub last_update_id: UpdateId,
    /// Contract symbol
    pub symbol: String,
    /// Underlying pair
    pub pair: String,
    /// Event time of the last applied message
    pub event_time: TimestampMs,
    /// Transaction time of the last applied message
    pub transaction_time: TimestampMs,
    /// Bid levels, price descending
    pub bids: Vec<PriceLevel>,
    /// Ask levels, price ascending
    pub asks: Vec<PriceLevel>,
    /// Whether the book was live when this view was built
    pub sync_state: SyncState,
}

impl BookView {
    /// Best bid, if any
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best ask, if any
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Spread between best ask and best bid
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price() - bid.price()),
            _ => None,
        }
    }

    /// Midpoint of best bid and best ask
    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price() + ask.price()) / Decimal::TWO),
            _ => None,
        }
    }

    /// Check if the book is crossed (best bid >= best ask).
    ///
    /// Shouldn't happen in a healthy market but is useful for validation.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price() >= ask.price(),
            _ => false,
        }
    }

    /// Copy of this view with at most `limit` levels per side
    #[must_use]
    pub fn truncated(&self, limit: usize) -> BookView {
        BookView {
            bids: self.bids.iter().take(limit).copied().collect(),
            asks: self.asks.iter().take(limit).copied().collect(),
            ..self.clone()
        }
    }
}

/// The snapshot + diff reconciliation state machine for one instrument.
///
/// Owns both book sides and the sequence tracking fields. Exactly one logical
/// writer may drive it; reads go through [`BookView`]s built by
/// [`current_view`](Self::current_view).
#[derive(Debug)]
pub struct SyncEngine {
    symbol: String,
    pair: String,
    bids: BookSide,
    asks: BookSide,
    /// Id through which the current book state is valid
    last_update_id: UpdateId,
    /// Final id of the most recently applied event; 0 = none since snapshot
    previous_update_id: UpdateId,
    state: SyncState,
    /// Events received while unsynced, in arrival order
    buffer: VecDeque<DepthUpdateEvent>,
    event_time: TimestampMs,
    transaction_time: TimestampMs,
    stats: SyncStats,
}

impl SyncEngine {
    /// Create an engine for the given contract symbol
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            pair: String::new(),
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            last_update_id: 0,
            previous_update_id: 0,
            state: SyncState::Unsynced,
            buffer: VecDeque::new(),
            event_time: 0,
            transaction_time: 0,
            stats: SyncStats::default(),
        }
    }

    /// Current synchronization state
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Check whether the book is live
    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.state == SyncState::Synced
    }

    /// Id through which the book is valid
    #[must_use]
    pub const fn last_update_id(&self) -> UpdateId {
        self.last_update_id
    }

    /// Decision counters
    #[must_use]
    pub const fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Number of events waiting for a snapshot
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Begin (re)synchronization.
    ///
    /// Transitions to `Syncing`; the caller must now fetch a snapshot. Events
    /// handed to [`on_event`](Self::on_event) in the meantime are buffered.
    pub fn start(&mut self) {
        info!(symbol = %self.symbol, "starting book synchronization");
        self.state = SyncState::Syncing;
    }

    /// The stream transport was lost.
    ///
    /// Buffered events predate the disconnect and can never chain across it,
    /// so they are dropped. The last-known book is retained and keeps serving
    /// stale-marked views until a fresh snapshot replaces it.
    pub fn on_source_lost(&mut self) {
        warn!(symbol = %self.symbol, "diff source lost, book no longer tracking");
        self.state = SyncState::Unsynced;
        self.buffer.clear();
    }

    /// Handle one diff event from the stream.
    ///
    /// While syncing the event is buffered; while synced it goes through the
    /// gap checks and is applied, discarded as stale, or triggers a resync.
    /// On [`ApplyOutcome::Gap`] the caller must fetch a fresh snapshot.
    pub fn on_event(&mut self, event: DepthUpdateEvent) -> ApplyOutcome {
        match self.state {
            SyncState::Unsynced | SyncState::Syncing => {
                debug!(
                    symbol = %self.symbol,
                    first = event.first_update_id,
                    last = event.final_update_id,
                    "buffering event while unsynced"
                );
                self.buffer.push_back(event);
                self.stats.buffered += 1;
                ApplyOutcome::Buffered
            }
            SyncState::Synced => self.try_apply(event),
        }
    }

    /// Apply a fresh snapshot and replay the buffer.
    ///
    /// Both sides are replaced wholesale. Buffered events already reflected by
    /// the snapshot are discarded; the rest replay in arrival order through
    /// the same rules as live events. Returns
    /// [`SnapshotOutcome::ResyncRequired`] if the replay itself hits a gap, in
    /// which case the caller fetches another snapshot (the gap event and
    /// everything after it stay buffered).
    pub fn on_snapshot(&mut self, snapshot: DepthSnapshot) -> SnapshotOutcome {
        info!(
            symbol = %snapshot.symbol,
            last_update_id = snapshot.last_update_id,
            bids = snapshot.bids.len(),
            asks = snapshot.asks.len(),
            buffered = self.buffer.len(),
            "applying depth snapshot"
        );

        self.bids.clear();
        self.asks.clear();
        for level in &snapshot.bids {
            self.bids.apply_level(level.price(), level.quantity());
        }
        for level in &snapshot.asks {
            self.asks.apply_level(level.price(), level.quantity());
        }

        self.last_update_id = snapshot.last_update_id;
        self.previous_update_id = 0;
        self.symbol = snapshot.symbol;
        self.pair = snapshot.pair;
        self.event_time = snapshot.event_time;
        self.transaction_time = snapshot.transaction_time;
        self.state = SyncState::Synced;
        self.stats.snapshots_applied += 1;

        let mut pending = std::mem::take(&mut self.buffer);
        while let Some(event) = pending.pop_front() {
            if let ApplyOutcome::Gap { .. } = self.try_apply(event) {
                // The gap event is already re-buffered; keep the remainder
                // behind it in arrival order.
                self.buffer.append(&mut pending);
                return SnapshotOutcome::ResyncRequired;
            }
        }

        info!(
            symbol = %self.symbol,
            last_update_id = self.last_update_id,
            "book synchronized"
        );
        SnapshotOutcome::Synced
    }

    /// Build an immutable view of the current book, at most `limit` levels
    /// per side.
    #[must_use]
    pub fn current_view(&self, limit: usize) -> BookView {
        BookView {
            last_update_id: self.last_update_id,
            symbol: self.symbol.clone(),
            pair: self.pair.clone(),
            event_time: self.event_time,
            transaction_time: self.transaction_time,
            bids: self.bids.top_n(limit),
            asks: self.asks.top_n(limit),
            sync_state: self.state,
        }
    }

    fn try_apply(&mut self, event: DepthUpdateEvent) -> ApplyOutcome {
        // Event entirely precedes validated state
        if event.final_update_id < self.last_update_id {
            debug!(
                u = event.final_update_id,
                last_update_id = self.last_update_id,
                "discarding stale event"
            );
            self.stats.stale_discarded += 1;
            return ApplyOutcome::Stale;
        }

        if self.previous_update_id != 0 {
            // Must chain from the last applied event
            if event.prev_final_update_id != self.previous_update_id {
                let expected = self.previous_update_id;
                let got = event.prev_final_update_id;
                self.begin_resync(event, expected, got);
                return ApplyOutcome::Gap { expected, got };
            }
        } else {
            // First event since the snapshot: admit iff U <= lastUpdateId+1 <= u
            if event.final_update_id <= self.last_update_id {
                debug!(
                    u = event.final_update_id,
                    last_update_id = self.last_update_id,
                    "event already reflected by snapshot"
                );
                self.stats.stale_discarded += 1;
                return ApplyOutcome::Stale;
            }
            if event.first_update_id > self.last_update_id + 1 {
                let expected = self.last_update_id + 1;
                let got = event.first_update_id;
                self.begin_resync(event, expected, got);
                return ApplyOutcome::Gap { expected, got };
            }
        }

        self.apply(event);
        ApplyOutcome::Applied
    }

    /// A gap means an event was lost upstream; applying anything past it
    /// would silently corrupt the book. Buffer the event and demand a fresh
    /// snapshot.
    fn begin_resync(&mut self, event: DepthUpdateEvent, expected: UpdateId, got: UpdateId) {
        warn!(
            symbol = %self.symbol,
            expected,
            got,
            "sequence gap detected, resynchronizing"
        );
        self.stats.gaps_detected += 1;
        self.state = SyncState::Syncing;
        self.buffer.push_back(event);
    }

    fn apply(&mut self, event: DepthUpdateEvent) {
        for level in &event.bids {
            self.bids.apply_level(level.price(), level.quantity());
        }
        for level in &event.asks {
            self.asks.apply_level(level.price(), level.quantity());
        }

        self.last_update_id = event.final_update_id;
        self.previous_update_id = event.final_update_id;
        self.event_time = event.event_time;
        self.transaction_time = event.transaction_time;
        self.pair = event.pair;
        self.stats.applied += 1;

        debug!(
            symbol = %self.symbol,
            last_update_id = self.last_update_id,
            bids = self.bids.len(),
            asks = self.asks.len(),
            "event applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn levels(raw: &[(&str, &str)]) -> Vec<PriceLevel> {
        raw.iter()
            .map(|(p, q)| PriceLevel::new(dec(p), dec(q)))
            .collect()
    }

    fn snapshot(last_update_id: u64, bids: &[(&str, &str)], asks: &[(&str, &str)]) -> DepthSnapshot {
        DepthSnapshot {
            last_update_id,
            event_time: 1_700_000_000_000,
            transaction_time: 1_700_000_000_000,
            symbol: "BTCUSD_PERP".to_string(),
            pair: "BTCUSD".to_string(),
            bids: levels(bids),
            asks: levels(asks),
        }
    }

    fn event(
        first: u64,
        last: u64,
        prev: u64,
        bids: &[(&str, &str)],
        asks: &[(&str, &str)],
    ) -> DepthUpdateEvent {
        DepthUpdateEvent {
            event_type: "depthUpdate".to_string(),
            event_time: 1_700_000_001_000,
            transaction_time: 1_700_000_001_000,
            symbol: "BTCUSD_PERP".to_string(),
            pair: "BTCUSD".to_string(),
            first_update_id: first,
            final_update_id: last,
            prev_final_update_id: prev,
            bids: levels(bids),
            asks: levels(asks),
        }
    }

    fn synced_engine() -> SyncEngine {
        let mut engine = SyncEngine::new("BTCUSD_PERP");
        engine.start();
        let outcome = engine.on_snapshot(snapshot(100, &[("10", "1")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::Synced);
        engine
    }

    #[test]
    fn test_initial_state() {
        let engine = SyncEngine::new("BTCUSD_PERP");
        assert_eq!(engine.state(), SyncState::Unsynced);
        assert!(!engine.is_synced());
        assert_eq!(engine.last_update_id(), 0);
    }

    #[test]
    fn test_events_buffered_until_snapshot() {
        let mut engine = SyncEngine::new("BTCUSD_PERP");
        engine.start();
        assert_eq!(engine.state(), SyncState::Syncing);

        let outcome = engine.on_event(event(101, 101, 100, &[("10", "2")], &[]));
        assert_eq!(outcome, ApplyOutcome::Buffered);
        assert_eq!(engine.buffered_len(), 1);
        // Nothing applied yet
        assert_eq!(engine.last_update_id(), 0);
    }

    #[test]
    fn test_snapshot_then_replay_in_order() {
        let mut engine = SyncEngine::new("BTCUSD_PERP");
        engine.start();

        // Arrive before the snapshot resolves
        engine.on_event(event(101, 102, 100, &[("10", "5")], &[]));
        engine.on_event(event(103, 104, 102, &[("10", "7")], &[("11", "3")]));

        let outcome = engine.on_snapshot(snapshot(100, &[("10", "1")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::Synced);
        assert!(engine.is_synced());
        assert_eq!(engine.last_update_id(), 104);

        // Last write wins: replay preserved arrival order
        let view = engine.current_view(10);
        assert_eq!(view.bids, levels(&[("10", "7")]));
        assert_eq!(view.asks, levels(&[("11", "3")]));
        assert_eq!(engine.stats().applied, 2);
    }

    #[test]
    fn test_buffered_event_covered_by_snapshot_is_discarded() {
        let mut engine = SyncEngine::new("BTCUSD_PERP");
        engine.start();

        // u = 99 <= snapshot id 100: already reflected
        engine.on_event(event(95, 99, 90, &[("10", "500")], &[]));

        let outcome = engine.on_snapshot(snapshot(100, &[("10", "1")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::Synced);

        let view = engine.current_view(10);
        assert_eq!(view.bids, levels(&[("10", "1")]));
        assert_eq!(engine.stats().stale_discarded, 1);
        assert_eq!(engine.stats().applied, 0);
    }

    #[test]
    fn test_first_event_admission_window() {
        // U <= lastUpdateId + 1 <= u admits
        let mut engine = synced_engine();
        let outcome = engine.on_event(event(98, 103, 97, &[("10", "4")], &[]));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(engine.last_update_id(), 103);

        // U > lastUpdateId + 1 means events between snapshot and stream are lost
        let mut engine = synced_engine();
        let outcome = engine.on_event(event(105, 106, 104, &[("10", "4")], &[]));
        assert_eq!(
            outcome,
            ApplyOutcome::Gap {
                expected: 101,
                got: 105
            }
        );
        assert_eq!(engine.state(), SyncState::Syncing);
    }

    #[test]
    fn test_chained_events_apply() {
        let mut engine = synced_engine();

        assert_eq!(
            engine.on_event(event(101, 103, 100, &[("9.9", "2")], &[])),
            ApplyOutcome::Applied
        );
        assert_eq!(
            engine.on_event(event(104, 107, 103, &[], &[("11.1", "6")])),
            ApplyOutcome::Applied
        );

        assert_eq!(engine.last_update_id(), 107);
        let view = engine.current_view(10);
        assert_eq!(view.bids, levels(&[("10", "1"), ("9.9", "2")]));
        assert_eq!(view.asks, levels(&[("11", "1"), ("11.1", "6")]));
    }

    #[test]
    fn test_contiguous_chain_equals_fresh_map() {
        // Applying a gap-free chain must equal applying each change in order
        // to a fresh side: nothing reordered, nothing dropped.
        let events = vec![
            event(101, 102, 100, &[("10", "3"), ("9.5", "1")], &[]),
            event(103, 103, 102, &[("10", "0")], &[("11", "2")]),
            event(104, 106, 103, &[("9.5", "4")], &[("11", "0"), ("12", "8")]),
        ];

        let mut engine = synced_engine();
        for e in events.clone() {
            assert_eq!(engine.on_event(e), ApplyOutcome::Applied);
        }

        let mut bids = BookSide::new(Side::Bid);
        let mut asks = BookSide::new(Side::Ask);
        // Seed with the snapshot the engine started from
        bids.apply_level(dec("10"), dec("1"));
        asks.apply_level(dec("11"), dec("1"));
        for e in &events {
            for l in &e.bids {
                bids.apply_level(l.price(), l.quantity());
            }
            for l in &e.asks {
                asks.apply_level(l.price(), l.quantity());
            }
        }

        let view = engine.current_view(100);
        assert_eq!(view.bids, bids.top_n(100));
        assert_eq!(view.asks, asks.top_n(100));
        assert_eq!(view.last_update_id, 106);
    }

    #[test]
    fn test_stale_event_discarded_without_state_change() {
        let mut engine = synced_engine();
        engine.on_event(event(101, 105, 100, &[("10", "2")], &[]));

        let outcome = engine.on_event(event(90, 95, 89, &[("10", "999")], &[]));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(engine.is_synced());
        assert_eq!(engine.last_update_id(), 105);
        assert_eq!(engine.current_view(10).bids, levels(&[("10", "2")]));
    }

    #[test]
    fn test_gap_triggers_resync_without_applying() {
        let mut engine = synced_engine();
        assert_eq!(
            engine.on_event(event(101, 101, 100, &[("10", "2")], &[])),
            ApplyOutcome::Applied
        );

        // previousUpdateId = 101, but this event chains from 105
        let outcome = engine.on_event(event(106, 108, 105, &[("10", "999")], &[]));
        assert_eq!(
            outcome,
            ApplyOutcome::Gap {
                expected: 101,
                got: 105
            }
        );
        assert_eq!(engine.state(), SyncState::Syncing);
        assert_eq!(engine.stats().gaps_detected, 1);

        // Old state retained as last-known until a snapshot replaces it
        let view = engine.current_view(10);
        assert_eq!(view.last_update_id, 101);
        assert_eq!(view.bids, levels(&[("10", "2")]));
        assert_eq!(view.sync_state, SyncState::Syncing);

        // The gap event was buffered, not dropped; a snapshot past the gap
        // replays it.
        assert_eq!(engine.buffered_len(), 1);
        let outcome = engine.on_snapshot(snapshot(105, &[("10", "3")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::Synced);
        assert_eq!(engine.last_update_id(), 108);
        assert_eq!(engine.current_view(10).bids, levels(&[("10", "999")]));
    }

    #[test]
    fn test_replay_gap_requires_another_snapshot() {
        let mut engine = SyncEngine::new("BTCUSD_PERP");
        engine.start();

        engine.on_event(event(101, 102, 100, &[("10", "2")], &[]));
        // 103..=104 missing
        engine.on_event(event(105, 106, 104, &[("10", "9")], &[]));

        let outcome = engine.on_snapshot(snapshot(100, &[("10", "1")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::ResyncRequired);
        assert_eq!(engine.state(), SyncState::Syncing);
        // First event applied, gap event re-buffered
        assert_eq!(engine.last_update_id(), 102);
        assert_eq!(engine.buffered_len(), 1);

        // A snapshot covering the gap completes the sync
        let outcome = engine.on_snapshot(snapshot(104, &[("10", "5")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::Synced);
        assert_eq!(engine.last_update_id(), 106);
        assert_eq!(engine.current_view(10).bids, levels(&[("10", "9")]));
    }

    #[test]
    fn test_removal_scenario() {
        // snapshot {100, bids:[[10,1]], asks:[[11,1]]}, then event removing
        // the only bid
        let mut engine = synced_engine();
        let outcome = engine.on_event(event(101, 101, 100, &[("10", "0")], &[]));
        assert_eq!(outcome, ApplyOutcome::Applied);

        let view = engine.current_view(10);
        assert!(view.bids.is_empty());
        assert_eq!(view.asks, levels(&[("11", "1")]));
        assert_eq!(view.last_update_id, 101);
    }

    #[test]
    fn test_source_lost_drops_to_unsynced() {
        let mut engine = synced_engine();
        engine.on_event(event(101, 101, 100, &[("10", "2")], &[]));

        engine.on_source_lost();
        assert_eq!(engine.state(), SyncState::Unsynced);
        assert_eq!(engine.buffered_len(), 0);

        // Last-known book still readable, marked not synced
        let view = engine.current_view(10);
        assert_eq!(view.sync_state, SyncState::Unsynced);
        assert_eq!(view.bids, levels(&[("10", "2")]));

        // Events after the loss buffer until the next snapshot
        assert_eq!(
            engine.on_event(event(110, 111, 109, &[("10", "4")], &[])),
            ApplyOutcome::Buffered
        );
        engine.start();
        let outcome = engine.on_snapshot(snapshot(109, &[("10", "3")], &[("11", "1")]));
        assert_eq!(outcome, SnapshotOutcome::Synced);
        assert_eq!(engine.last_update_id(), 111);
    }

    #[test]
    fn test_view_helpers() {
        let mut engine = synced_engine();
        engine.on_event(event(
            101,
            101,
            100,
            &[("10.5", "1")],
            &[("11.5", "1"), ("11", "0")],
        ));

        let view = engine.current_view(10);
        assert_eq!(view.best_bid().unwrap().price(), dec("10.5"));
        assert_eq!(view.best_ask().unwrap().price(), dec("11.5"));
        assert_eq!(view.spread(), Some(dec("1")));
        assert_eq!(view.mid_price(), Some(dec("11")));
        assert!(!view.is_crossed());

        let truncated = view.truncated(1);
        assert_eq!(truncated.bids.len(), 1);
        assert_eq!(truncated.last_update_id, view.last_update_id);
    }

    #[test]
    fn test_view_limit_applies_per_side() {
        let mut engine = synced_engine();
        engine.on_event(event(
            101,
            101,
            100,
            &[("9.9", "1"), ("9.8", "1"), ("9.7", "1")],
            &[],
        ));

        let view = engine.current_view(2);
        assert_eq!(view.bids.len(), 2);
        // Best levels survive truncation
        assert_eq!(view.bids[0].price(), dec("10"));
        assert_eq!(view.bids[1].price(), dec("9.9"));
    }
}
