//! Trades, placement results and the trade listener hook.

use super::order::{Order, OrderId, OrderStatus, Price, Quantity, Side};
use crate::utils::current_time_millis;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// One match event between a resting (maker) order and an incoming (taker) order.
///
/// Immutable once created. `price` is always the maker's price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier, minted when the trade is created
    pub id: Uuid,
    /// ID of the buying order
    pub buy_order_id: OrderId,
    /// ID of the selling order
    pub sell_order_id: OrderId,
    /// Execution price (the resting order's price)
    pub price: Price,
    /// Executed quantity
    pub quantity: Quantity,
    /// Side of the incoming order that triggered the match
    pub taker_side: Side,
    /// Execution time in milliseconds since the UNIX epoch
    pub timestamp: u64,
}

impl Trade {
    /// Mints a trade. This is the only place trade IDs and timestamps are created.
    pub(crate) fn new(
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        taker_side: Side,
    ) -> Self {
        debug_assert!(quantity > Decimal::ZERO, "trade with non-positive quantity");
        Self {
            id: Uuid::new_v4(),
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            taker_side,
            timestamp: current_time_millis(),
        }
    }

    /// ID of the order that was resting in the book.
    pub fn maker_order_id(&self) -> &OrderId {
        match self.taker_side {
            Side::Bid => &self.sell_order_id,
            Side::Ask => &self.buy_order_id,
        }
    }

    /// ID of the incoming order.
    pub fn taker_order_id(&self) -> &OrderId {
        match self.taker_side {
            Side::Bid => &self.buy_order_id,
            Side::Ask => &self.sell_order_id,
        }
    }

    /// Price times quantity, or `None` when the product overflows.
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade[{} price={} qty={} buy={} sell={}]",
            self.id, self.price, self.quantity, self.buy_order_id, self.sell_order_id
        )
    }
}

/// Outcome of placing one order: the taker's final state and the trades it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// The submitted order after matching (status, filled quantity, timestamp)
    pub order: Order,
    /// Trades in execution order
    pub trades: Vec<Trade>,
}

impl MatchResult {
    /// Total quantity executed across all trades.
    pub fn executed_quantity(&self) -> Quantity {
        self.trades.iter().map(|trade| trade.quantity).sum()
    }

    /// Returns true when the order was completely filled.
    pub fn is_complete(&self) -> bool {
        self.order.status == OrderStatus::Filled
    }

    /// Returns true when the order remains in the book.
    pub fn is_resting(&self) -> bool {
        !self.order.status.is_terminal()
    }
}

/// Trades produced by a single placement, as delivered to a [`TradeListener`].
#[derive(Debug, Clone, Serialize)]
pub struct TradeResult {
    /// The symbol of the book that produced the trades
    pub symbol: String,
    /// The incoming order that triggered them
    pub order_id: OrderId,
    /// Position of the first of these trades in the book's trade log.
    /// Assigned under the book's lock, so it orders results of one book
    /// the same way the trade log does.
    pub sequence: u64,
    /// Trades in execution order
    pub trades: Vec<Trade>,
}

impl TradeResult {
    /// Creates a new `TradeResult`.
    pub fn new(symbol: String, order_id: OrderId, sequence: u64, trades: Vec<Trade>) -> Self {
        Self {
            symbol,
            order_id,
            sequence,
            trades,
        }
    }

    /// Total quantity executed.
    #[must_use]
    pub fn executed_quantity(&self) -> Quantity {
        self.trades.iter().map(|trade| trade.quantity).sum()
    }
}

/// Callback receiving the trades of each placement, shared through `Arc`.
///
/// Called on the placing thread after the book has released its lock, so a
/// listener may query the book but must not assume nothing changed since the
/// trades were made. Placements racing on several threads can deliver their
/// results out of trade-log order; sort by [`TradeResult::sequence`] to
/// restore it.
pub type TradeListener = Arc<dyn Fn(&TradeResult) + Send + Sync>;
