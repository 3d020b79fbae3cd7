//! Price level storage for one side of the book.
//!
//! This implementation uses `BTreeMap` keyed by exact [`Decimal`] prices:
//!
//! - O(log n) insertion, deletion, and lookup
//! - O(1) access to the best level (via `first_key_value` / `last_key_value`)
//! - Ordered iteration for depth-of-book queries
//!
//! Decimal keys make price comparison exact. Ordering levels through binary
//! floats merges distinct prices and misorders ties, which silently corrupts
//! the book.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::{Price, PriceLevel, Quantity};

/// Which side of the book a level belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Buy side: best bid = highest price
    Bid,
    /// Sell side: best ask = lowest price
    Ask,
}

/// Ordered price levels for one side of the book.
///
/// Levels are `price -> quantity` with no duplicates and no zero quantities;
/// a zero-quantity write is a removal instruction, applied immediately and
/// never stored.
///
/// # Thread Safety
///
/// `Send + Sync` but not internally synchronized. The sync engine is the
/// single writer; readers only ever see published immutable views.
#[derive(Debug, Clone)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, Quantity>,
}

impl BookSide {
    /// Create an empty side
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Which side this is
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Apply one level change.
    ///
    /// Zero quantity removes the level at `price` (no-op if absent); any other
    /// quantity inserts or overwrites. Not retroactive - the side always
    /// reflects the most recent write for a price.
    pub fn apply_level(&mut self, price: Price, quantity: Quantity) {
        if quantity.is_zero() {
            self.levels.remove(&price);
        } else {
            self.levels.insert(price, quantity);
        }
    }

    /// Quantity at a price, if the level exists
    #[must_use]
    pub fn quantity_at(&self, price: Price) -> Option<Quantity> {
        self.levels.get(&price).copied()
    }

    /// Get the best level: highest bid or lowest ask
    #[must_use]
    pub fn best(&self) -> Option<PriceLevel> {
        let entry = match self.side {
            Side::Bid => self.levels.last_key_value(),
            Side::Ask => self.levels.first_key_value(),
        };
        entry.map(|(&p, &q)| PriceLevel::new(p, q))
    }

    /// Iterate levels in priority order (bid: price descending; ask: ascending)
    pub fn iter(&self) -> Box<dyn Iterator<Item = PriceLevel> + '_> {
        match self.side {
            Side::Bid => Box::new(self.levels.iter().rev().map(|(&p, &q)| PriceLevel::new(p, q))),
            Side::Ask => Box::new(self.levels.iter().map(|(&p, &q)| PriceLevel::new(p, q))),
        }
    }

    /// Get up to `n` levels in priority order
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<PriceLevel> {
        self.iter().take(n).collect()
    }

    /// Total quantity resting on this side
    #[must_use]
    pub fn total_quantity(&self) -> Quantity {
        self.levels.values().copied().sum::<Decimal>()
    }

    /// Remove all levels
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    /// Number of levels
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if the side has no levels
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
