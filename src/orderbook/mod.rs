//! Local order book maintenance.
//!
//! This module contains the crate's core:
//!
//! - [`book`] - Ordered price level storage for one side
//! - [`sync`] - The snapshot + diff reconciliation state machine
//!
//! # Example
//!
//! ```rust
//! use binance_depth::orderbook::{SyncEngine, SyncState};
//!
//! let mut engine = SyncEngine::new("BTCUSD_PERP");
//! assert_eq!(engine.state(), SyncState::Unsynced);
//!
//! // Buffer events until a snapshot arrives
//! engine.start();
//! // engine.on_event(event);
//! // engine.on_snapshot(snapshot);
//! ```

pub mod book;
pub mod sync;

pub use book::{BookSide, Side};
pub use sync::{ApplyOutcome, BookView, SnapshotOutcome, SyncEngine, SyncState, SyncStats};
