//! # binance-depth
//!
//! A locally consistent limit order book for a single Binance coin-margined
//! futures instrument, maintained from the venue's diff depth stream and REST
//! snapshots.
//!
//! ## Features
//!
//! - **Sync engine** - Reconciles snapshot and stream into one
//!   monotonically-advancing book, detects sequence gaps, and resynchronizes
//!   automatically
//! - **Exact decimals** - Price levels keyed by `rust_decimal::Decimal`, never
//!   binary floats
//! - **Consistent reads** - Immutable views published by pointer swap; readers
//!   never observe a half-applied update
//! - **Async/Await** - Built on Tokio; one writer task, any number of readers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use binance_depth::{Config, DepthFeed};
//!
//! #[tokio::main]
//! async fn main() -> binance_depth::Result<()> {
//!     let feed = DepthFeed::new(Config::new("BTCUSD_PERP"))?;
//!     let reader = feed.reader();
//!
//!     tokio::spawn(feed.run());
//!
//!     loop {
//!         tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!         let view = reader.book(5);
//!         println!(
//!             "[{}] {:?} / {:?}",
//!             view.last_update_id,
//!             view.best_bid(),
//!             view.best_ask()
//!         );
//!     }
//! }
//! ```
//!
//! ## Synchronization
//!
//! The venue's diff stream is ordered as received but not gap-free. Each event
//! carries a first/final update id (`U`/`u`) and a back-link to the previous
//! event's final id (`pu`). The engine buffers events until a REST snapshot
//! lands, discards the ones the snapshot already reflects, replays the rest,
//! and then applies live events only while the `pu` chain is intact. A broken
//! chain means an event was lost: the book stops advancing and a fresh
//! snapshot is fetched rather than applying anything past the gap.
//!
//! ## Architecture
//!
//! - [`orderbook`] - Price level storage and the sync state machine
//! - [`client`] - REST snapshot client and the typed stream connection
//! - [`feed`] - Runtime wiring: single writer loop, published read views
//! - [`types`] - Wire types and decimal value types
//! - [`config`] - Instrument and endpoint configuration
//! - [`error`] - Error types for the crate

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod orderbook;
pub mod types;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use error::Error;
pub use feed::{BookReader, DepthFeed};
pub use orderbook::{BookView, SyncEngine, SyncState};

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
