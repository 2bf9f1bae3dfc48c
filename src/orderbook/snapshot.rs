//! Order book snapshot for market data

use super::error::OrderBookError;
use super::order::{Price, Quantity};
use super::price_level::PriceLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Aggregate view of one price level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Price of the level
    pub price: Price,
    /// Total remaining quantity resting at this price
    pub quantity: Quantity,
    /// Number of resting orders at this price
    pub order_count: usize,
}

impl DepthLevel {
    pub(crate) fn from_level(level: &PriceLevel) -> Self {
        Self {
            price: level.price(),
            quantity: level.total_quantity(),
            order_count: level.order_count(),
        }
    }
}

/// Average of `bid` and `ask`, taken as `bid + (ask - bid) / 2` so it stays
/// representable whenever both prices are. `None` on overflow.
pub(crate) fn midpoint(bid: Price, ask: Price) -> Option<Price> {
    let half_spread = ask.checked_sub(bid)? / Decimal::TWO;
    bid.checked_add(half_spread)
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The symbol or identifier for this order book
    pub symbol: String,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Bid levels, best (highest) first
    pub bids: Vec<DepthLevel>,

    /// Ask levels, best (lowest) first
    pub asks: Vec<DepthLevel>,
}

impl OrderBookSnapshot {
    /// Get the best bid price and quantity
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        let bid = self
            .bids
            .iter()
            .map(|level| (level.price, level.quantity))
            .max_by_key(|&(price, _)| price);
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the best ask price and quantity
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        let ask = self
            .asks
            .iter()
            .map(|level| (level.price, level.quantity))
            .min_by_key(|&(price, _)| price);
        trace!("best_ask: {:?}", ask);
        ask
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<Price> {
        let mid_price = match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => midpoint(bid_price, ask_price),
            _ => None,
        };
        trace!("mid_price: {:?}", mid_price);
        mid_price
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<Price> {
        let spread = match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => ask_price.checked_sub(bid_price),
            _ => None,
        };
        trace!("spread: {:?}", spread);
        spread
    }

    /// Calculate the total volume on the bid side, saturating at `Decimal::MAX`
    pub fn total_bid_volume(&self) -> Quantity {
        self.bids
            .iter()
            .map(|level| level.quantity)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Calculate the total volume on the ask side, saturating at `Decimal::MAX`
    pub fn total_ask_volume(&self) -> Quantity {
        self.asks
            .iter()
            .map(|level| level.quantity)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Serializes the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        serde_json::to_string(self).map_err(|error| OrderBookError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes a snapshot from JSON.
    pub fn from_json(data: &str) -> Result<Self, OrderBookError> {
        serde_json::from_str(data).map_err(|error| OrderBookError::DeserializationError {
            message: error.to_string(),
        })
    }
}
