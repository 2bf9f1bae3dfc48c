//! OrderBook implementation for managing price levels and order matching.

pub mod book;
mod book_side;
pub mod error;
pub mod matching;
pub mod operations;
pub mod order;
mod price_level;
mod private;
pub mod snapshot;
pub mod trade;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use order::{Order, OrderId, OrderStatus, OrderType, Price, Quantity, Side};
pub use snapshot::{DepthLevel, OrderBookSnapshot};
pub use trade::{MatchResult, Trade, TradeListener, TradeResult};
