//! Wire types for the Binance futures depth feed.
//!
//! This module contains the typed boundary of the crate: the REST depth
//! snapshot, the `<symbol>@depth` diff stream event, and the commands sent
//! over the stream connection. The sync engine never sees raw JSON; everything
//! past this module is already validated and decimal-typed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, Quantity, TimestampMs, UpdateId};

/// One price level on the wire: a `["price", "quantity"]` string pair.
///
/// Quantity `"0"` is a removal instruction, not a state - the book never
/// stores zero-quantity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel(
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
    #[serde(with = "rust_decimal::serde::str")] pub Decimal,
);

impl PriceLevel {
    /// Create a level from already-parsed decimals
    pub const fn new(price: Price, quantity: Quantity) -> Self {
        Self(price, quantity)
    }

    /// Price of this level
    #[must_use]
    pub const fn price(&self) -> Price {
        self.0
    }

    /// Quantity at this level (zero = remove)
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.1
    }
}

/// Full book snapshot from `GET /dapi/v1/depth`.
///
/// A wholesale replacement of both sides, valid through `last_update_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct DepthSnapshot {
    /// Id through which this snapshot reflects the book
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: UpdateId,
    /// Message output time
    #[serde(rename = "E")]
    pub event_time: TimestampMs,
    /// Transaction time
    #[serde(rename = "T")]
    pub transaction_time: TimestampMs,
    /// Contract symbol, e.g. `BTCUSD_PERP`
    pub symbol: String,
    /// Underlying pair, e.g. `BTCUSD`
    pub pair: String,
    /// Bid levels, best (highest) first
    pub bids: Vec<PriceLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<PriceLevel>,
}

/// Incremental diff event from the `<symbol>@depth` stream.
///
/// Carries every level change between `first_update_id` (`U`) and
/// `final_update_id` (`u`) inclusive. `prev_final_update_id` (`pu`) is the
/// `u` of the previous event and is how gaps are detected: if it does not
/// match the last applied `u`, a diff was missed.
#[derive(Debug, Clone, Deserialize)]
pub struct DepthUpdateEvent {
    /// Event type, always `depthUpdate`
    #[serde(rename = "e")]
    pub event_type: String,
    /// Event time
    #[serde(rename = "E")]
    pub event_time: TimestampMs,
    /// Transaction time
    #[serde(rename = "T")]
    pub transaction_time: TimestampMs,
    /// Contract symbol
    #[serde(rename = "s")]
    pub symbol: String,
    /// Underlying pair
    #[serde(rename = "ps")]
    pub pair: String,
    /// First update id in this event
    #[serde(rename = "U")]
    pub first_update_id: UpdateId,
    /// Final update id in this event
    #[serde(rename = "u")]
    pub final_update_id: UpdateId,
    /// Final update id of the previous event on this stream
    #[serde(rename = "pu")]
    pub prev_final_update_id: UpdateId,
    /// Bid level changes
    #[serde(rename = "b")]
    pub bids: Vec<PriceLevel>,
    /// Ask level changes
    #[serde(rename = "a")]
    pub asks: Vec<PriceLevel>,
}

/// Acknowledgement of a `SUBSCRIBE`/`UNSUBSCRIBE` command.
///
/// Arrives on the same stream as depth events and carries no book data;
/// the stream boundary swallows it.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandAck {
    /// Always null on success
    pub result: Option<serde_json::Value>,
    /// Id echoed from the command
    pub id: u64,
}

/// Any text frame the venue sends on a raw stream connection.
///
/// Binance does not tag stream payloads, so this is untagged: a frame either
/// has the depth event shape or it is a command ack.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamMessage {
    /// Diff depth event
    DepthUpdate(DepthUpdateEvent),
    /// Subscribe/unsubscribe acknowledgement
    Ack(CommandAck),
}

/// Command sent to the stream endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsCommand {
    /// Subscribe to streams
    Subscribe {
        /// Stream names, e.g. `btcusd_perp@depth@500ms`
        params: Vec<String>,
        /// Message id
        id: u64,
    },
    /// Unsubscribe from streams
    Unsubscribe {
        /// Stream names
        params: Vec<String>,
        /// Message id
        id: u64,
    },
}
