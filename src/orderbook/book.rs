//! Core OrderBook implementation for managing price levels and orders

use super::book_side::BookSide;
use super::error::OrderBookError;
use super::order::{Order, OrderId, Price, Quantity, Side};
use super::snapshot::{DepthLevel, OrderBookSnapshot, midpoint};
use super::trade::{Trade, TradeListener};
use crate::utils::current_time_millis;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Everything guarded by the book's lock.
#[derive(Debug)]
pub(super) struct BookState {
    /// Bid side price levels, highest price first
    pub(super) bids: BookSide,

    /// Ask side price levels, lowest price first
    pub(super) asks: BookSide,

    /// Resting orders by ID. The single owner of resting order state;
    /// price levels only hold IDs into this map.
    pub(super) orders: HashMap<OrderId, Order>,

    /// Append-only log of every trade this book produced
    pub(super) trades: Vec<Trade>,

    /// The last price at which a trade occurred
    pub(super) last_trade_price: Option<Price>,
}

impl BookState {
    fn new() -> Self {
        Self {
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            orders: HashMap::new(),
            trades: Vec::new(),
            last_trade_price: None,
        }
    }

    #[inline]
    pub(super) fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }
}

/// A limit order book for one symbol.
///
/// All state lives behind one reader-writer lock. Placement and cancellation
/// take it exclusively for their whole duration, so each is atomic and the
/// trade log follows the order in which writers acquired the lock. Queries
/// take it shared.
///
/// Share between threads with `Arc<OrderBook>`.
pub struct OrderBook {
    /// The symbol or identifier for this order book
    pub(super) symbol: String,

    /// Book state behind the concurrency boundary
    pub(super) state: RwLock<BookState>,

    /// Minimum price increment for orders. When set, limit prices must be
    /// exact multiples of this value. `None` disables validation (default).
    pub(super) tick_size: Option<Price>,

    /// Minimum quantity increment for orders. When set, order quantities must be
    /// exact multiples of this value. `None` disables validation (default).
    pub(super) lot_size: Option<Quantity>,

    /// Minimum order size. `None` disables validation (default).
    pub(super) min_order_size: Option<Quantity>,

    /// Maximum order size. `None` disables validation (default).
    pub(super) max_order_size: Option<Quantity>,

    /// listens to trades produced when an order is placed
    pub trade_listener: Option<TradeListener>,
}

impl fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("OrderBook")
            .field("symbol", &self.symbol)
            .field("bid_levels", &state.bids.len())
            .field("ask_levels", &state.asks.len())
            .field("resting_orders", &state.orders.len())
            .field("trades", &state.trades.len())
            .field("tick_size", &self.tick_size)
            .field("lot_size", &self.lot_size)
            .finish()
    }
}

impl OrderBook {
    /// Create a new order book for the given symbol
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            state: RwLock::new(BookState::new()),
            tick_size: None,
            lot_size: None,
            min_order_size: None,
            max_order_size: None,
            trade_listener: None,
        }
    }

    /// Create a new order book whose limit prices must be multiples of `tick_size`.
    pub fn with_tick_size(symbol: &str, tick_size: Price) -> Self {
        let mut book = Self::new(symbol);
        book.tick_size = Some(tick_size);
        book
    }

    /// Create a new order book whose quantities must be multiples of `lot_size`.
    pub fn with_lot_size(symbol: &str, lot_size: Quantity) -> Self {
        let mut book = Self::new(symbol);
        book.lot_size = Some(lot_size);
        book
    }

    /// Create a new order book that reports its trades to `trade_listener`.
    pub fn with_trade_listener(symbol: &str, trade_listener: TradeListener) -> Self {
        let mut book = Self::new(symbol);
        book.trade_listener = Some(trade_listener);
        book
    }

    /// Set the trade listener
    pub fn set_trade_listener(&mut self, trade_listener: TradeListener) {
        self.trade_listener = Some(trade_listener);
    }

    /// Remove the trade listener
    pub fn remove_trade_listener(&mut self) {
        self.trade_listener = None;
    }

    /// Set the tick size. Zero or negative values disable validation.
    pub fn set_tick_size(&mut self, tick_size: Price) {
        self.tick_size = Some(tick_size);
    }

    /// The configured tick size, if any.
    #[must_use]
    pub fn tick_size(&self) -> Option<Price> {
        self.tick_size
    }

    /// Set the lot size. Zero or negative values disable validation.
    pub fn set_lot_size(&mut self, lot_size: Quantity) {
        self.lot_size = Some(lot_size);
    }

    /// The configured lot size, if any.
    #[must_use]
    pub fn lot_size(&self) -> Option<Quantity> {
        self.lot_size
    }

    /// Set the minimum accepted order quantity.
    pub fn set_min_order_size(&mut self, size: Quantity) {
        self.min_order_size = Some(size);
    }

    /// Set the maximum accepted order quantity.
    pub fn set_max_order_size(&mut self, size: Quantity) {
        self.max_order_size = Some(size);
    }

    /// The configured minimum order size, if any.
    #[must_use]
    pub fn min_order_size(&self) -> Option<Quantity> {
        self.min_order_size
    }

    /// The configured maximum order size, if any.
    #[must_use]
    pub fn max_order_size(&self) -> Option<Quantity> {
        self.max_order_size
    }

    /// Get the symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Best bid and best ask, read under one shared lock so both come from
    /// the same book state. `None` marks an empty side.
    pub fn best_bid_ask(&self) -> (Option<Price>, Option<Price>) {
        let state = self.state.read();
        (state.bids.best_price(), state.asks.best_price())
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.state.read().bids.best_price()
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.state.read().asks.best_price()
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<Price> {
        match self.best_bid_ask() {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<Price> {
        match self.best_bid_ask() {
            (Some(bid), Some(ask)) => midpoint(bid, ask),
            _ => None,
        }
    }

    /// Get the last price at which a trade occurred
    pub fn last_trade_price(&self) -> Option<Price> {
        self.state.read().last_trade_price
    }

    /// Up to `levels` non-empty levels per side, best first: `(bids, asks)`.
    ///
    /// Stale levels are skipped and do not count towards `levels`. The book
    /// is not modified.
    pub fn depth(&self, levels: usize) -> (Vec<DepthLevel>, Vec<DepthLevel>) {
        let state = self.state.read();
        let collect = |side: &BookSide| -> Vec<DepthLevel> {
            side.levels_by_priority()
                .take(levels)
                .map(DepthLevel::from_level)
                .collect()
        };
        let depth = (collect(&state.bids), collect(&state.asks));
        trace!(
            "depth({}) for {}: {} bid levels, {} ask levels",
            levels,
            self.symbol,
            depth.0.len(),
            depth.1.len()
        );
        depth
    }

    /// A resting order by ID. Filled, cancelled and unknown orders give `None`.
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.state.read().orders.get(order_id).cloned()
    }

    /// All resting orders at one price, oldest first.
    pub fn get_orders_at_price(&self, price: Price, side: Side) -> Vec<Order> {
        let state = self.state.read();
        state
            .side(side)
            .level(price)
            .filter(|level| !level.is_empty())
            .map(|level| {
                level
                    .order_ids()
                    .filter_map(|id| state.orders.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of resting orders on both sides.
    pub fn order_count(&self) -> usize {
        self.state.read().orders.len()
    }

    /// Number of non-empty price levels on one side.
    pub fn level_count(&self, side: Side) -> usize {
        self.state.read().side(side).live_level_count()
    }

    /// Copy of the trade log in execution order.
    pub fn trades(&self) -> Vec<Trade> {
        self.state.read().trades.clone()
    }

    /// Number of trades this book has produced.
    pub fn trade_count(&self) -> usize {
        self.state.read().trades.len()
    }

    /// Create a snapshot of the top `depth` levels on each side
    pub fn create_snapshot(&self, depth: usize) -> OrderBookSnapshot {
        let (bids, asks) = self.depth(depth);
        OrderBookSnapshot {
            symbol: self.symbol.clone(),
            timestamp: current_time_millis(),
            bids,
            asks,
        }
    }

    /// Create a snapshot of the top `depth` levels and encode it as JSON
    pub fn snapshot_to_json(&self, depth: usize) -> Result<String, OrderBookError> {
        self.create_snapshot(depth).to_json()
    }
}
