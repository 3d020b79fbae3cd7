//! Core value types shared across the crate.
//!
//! - [`messages`] - Wire types for the REST snapshot and the diff depth stream
//!
//! Prices and quantities are exact decimals. Binance sends both as strings
//! precisely so clients do not round-trip them through binary floats; ordering
//! price levels by `f64` loses ties and corrupts the book.

pub mod messages;

pub use messages::{DepthSnapshot, DepthUpdateEvent, PriceLevel, StreamMessage};

/// Price of a level, exact decimal.
///
/// `Decimal` gives exact equality and total ordering, so it is safe to use
/// as a `BTreeMap` key. `f64` is not: "0.10" and "0.1000000000000001" must
/// never collapse into (or diverge from) the same level.
pub type Price = rust_decimal::Decimal;

/// Quantity at a level, exact decimal. Zero on the wire means "remove".
pub type Quantity = rust_decimal::Decimal;

/// Update id assigned by the venue to each book change.
pub type UpdateId = u64;

/// Timestamp in milliseconds since Unix epoch.
pub type TimestampMs = u64;
