//! # Concurrent Price-Time Priority Limit Order Book
//!
//! A thread-safe limit order book for a single trading symbol. Incoming orders
//! are matched against resting liquidity on the opposite side using strict
//! price-time priority, trades execute at the resting (maker) order's price,
//! and any unfilled limit quantity is added to the book.
//!
//! ## Key Features
//!
//! - **Price-Time Priority**: Better prices match first; at one price, the
//!   oldest order matches first.
//!
//! - **Maker-Price Execution**: Every trade executes at the price of the level
//!   it was matched against, never at the taker's limit.
//!
//! - **Limit and Market Orders**: Limit orders rest their remainder. Market
//!   orders sweep the opposite side with no price bound and have any unfilled
//!   remainder cancelled.
//!
//! - **Exact Fractional Quantities**: Prices and quantities are
//!   [`rust_decimal::Decimal`], so `0.5 - 0.3` is exactly `0.2`.
//!
//! - **Thread Safety**: One reader-writer lock per book. Placement and
//!   cancellation are atomic with respect to each other; queries read a
//!   consistent state concurrently.
//!
//! - **Market Data**: Best bid/ask, spread, mid price, aggregated depth and
//!   JSON snapshots.
//!
//! ## Design
//!
//! Each side keeps its price levels in a priority queue keyed by price, plus a
//! lookup map from price to level. A level stores the IDs of its resting
//! orders in arrival order, together with their cached total remaining
//! quantity. The orders themselves live in one index owned by the book, so a
//! fill or cancel is visible everywhere at once.
//!
//! Levels that become empty are retired from both the queue and the lookup.
//! Matching additionally discards any empty level it finds on top of the
//! queue before using it, so an emptied level is never a match target.
//!
//! ## Example
//!
//! ```rust
//! use lob_core::{OrderBook, OrderStatus, Side};
//! use rust_decimal_macros::dec;
//!
//! let book = OrderBook::new("BTCUSDT");
//!
//! book.add_limit_order("a1", Side::Ask, dec!(50100), dec!(0.5)).unwrap();
//! book.add_limit_order("a2", Side::Ask, dec!(50200), dec!(1.0)).unwrap();
//!
//! let result = book.add_limit_order("b1", Side::Bid, dec!(50150), dec!(0.3)).unwrap();
//! assert_eq!(result.trades.len(), 1);
//! assert_eq!(result.trades[0].price, dec!(50100));
//! assert_eq!(result.order.status, OrderStatus::Filled);
//!
//! assert_eq!(book.best_bid_ask(), (None, Some(dec!(50100))));
//! let (_, asks) = book.depth(5);
//! assert_eq!(asks[0].quantity, dec!(0.2));
//!
//! assert!(book.cancel_order("a1"));
//! assert!(!book.cancel_order("a1"));
//! ```
//!
//! ## Sharing a Book Between Threads
//!
//! ```rust
//! use lob_core::{OrderBook, Side};
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let book = Arc::new(OrderBook::new("ETHUSDT"));
//! let handles: Vec<_> = (0..4)
//!     .map(|i| {
//!         let book = Arc::clone(&book);
//!         thread::spawn(move || {
//!             book.add_limit_order(format!("b{i}"), Side::Bid, dec!(3000), dec!(1))
//!                 .unwrap();
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(book.order_count(), 4);
//! assert!(book.check_invariants().is_ok());
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `trace` for order entry, resting,
//! cancels and level retirement, `debug` for every trade and `warn` for
//! rejected orders. Install any subscriber to see them.

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::snapshot::{DepthLevel, OrderBookSnapshot};
pub use orderbook::trade::{MatchResult, Trade, TradeListener, TradeResult};
pub use orderbook::{
    Order, OrderBook, OrderBookError, OrderId, OrderStatus, OrderType, Price, Quantity, Side,
};
pub use utils::current_time_millis;
