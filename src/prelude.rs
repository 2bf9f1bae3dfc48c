//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use lob_core::prelude::*;
//! ```

// Core order book types
pub use crate::orderbook::OrderBook;
pub use crate::orderbook::OrderBookError;

// Order types
pub use crate::orderbook::order::{Order, OrderId, OrderStatus, OrderType, Price, Quantity, Side};

// Snapshot types
pub use crate::orderbook::snapshot::{DepthLevel, OrderBookSnapshot};

// Trade-related types
pub use crate::orderbook::trade::{MatchResult, Trade, TradeListener, TradeResult};

// Utility functions
pub use crate::utils::current_time_millis;
