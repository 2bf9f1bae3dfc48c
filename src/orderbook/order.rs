//! Orders and the enums that describe them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Price of an order or trade. Decimal so fractional ticks stay exact.
pub type Price = Decimal;

/// Quantity of an order or trade. Decimal so fractional lots stay exact.
pub type Quantity = Decimal;

/// Caller-assigned order identifier.
///
/// Borrowing as `str` lets the book look orders up by `&str` without
/// allocating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a random identifier for callers that do not assign their own.
    pub fn new_uuid() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for OrderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Side of the book an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side. Best price is the highest.
    Bid,
    /// Sell side. Best price is the lowest.
    Ask,
}

impl Side {
    /// The side an order of this side matches against.
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// How an order is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Carries a limit price and rests when not fully matched.
    Limit,
    /// Takes whatever the opposite side offers and never rests.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
        }
    }
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, nothing filled yet.
    Pending,
    /// Some quantity filled, some remaining.
    Partial,
    /// Fully filled. Terminal.
    Filled,
    /// Cancelled by request, or the unfilled rest of a market order. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Returns true once the order can no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Partial => write!(f, "PARTIAL"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// An order submitted to the book.
///
/// `filled_quantity` and `status` belong to the book once the order is
/// placed: the matching engine and cancellation are the only writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: OrderId,
    /// Symbol of the book this order targets
    pub symbol: String,
    /// Bid or ask
    pub side: Side,
    /// Limit or market
    pub order_type: OrderType,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Limit price. `None` for market orders.
    pub price: Option<Price>,
    /// Original quantity
    pub quantity: Quantity,
    /// Quantity executed so far
    pub filled_quantity: Quantity,
    /// Submission time in milliseconds since the UNIX epoch, stamped on placement
    pub timestamp: u64,
}

impl Order {
    /// Builds a limit order.
    pub fn limit(
        id: impl Into<OrderId>,
        symbol: &str,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            status: OrderStatus::Pending,
            price: Some(price),
            quantity,
            filled_quantity: Decimal::ZERO,
            timestamp: 0,
        }
    }

    /// Builds a market order.
    pub fn market(id: impl Into<OrderId>, symbol: &str, side: Side, quantity: Quantity) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            status: OrderStatus::Pending,
            price: None,
            quantity,
            filled_quantity: Decimal::ZERO,
            timestamp: 0,
        }
    }

    /// Quantity still open.
    #[inline]
    pub fn remaining(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    /// Returns true when nothing is left to fill.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled_quantity >= self.quantity
    }

    /// Executes `quantity` against this order and derives the new status.
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(!self.status.is_terminal(), "fill on terminal order {}", self.id);
        debug_assert!(
            quantity > Decimal::ZERO && quantity <= self.remaining(),
            "fill of {quantity} outside (0, {}] for order {}",
            self.remaining(),
            self.id
        );
        self.filled_quantity += quantity;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }

    /// Marks the order cancelled. The filled quantity is left as is.
    pub(crate) fn cancel(&mut self) {
        debug_assert!(!self.status.is_terminal(), "cancel on terminal order {}", self.id);
        self.status = OrderStatus::Cancelled;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.price {
            Some(price) => write!(
                f,
                "Order[{} {} {} price={} qty={} filled={} {}]",
                self.id,
                self.side,
                self.order_type,
                price,
                self.quantity,
                self.filled_quantity,
                self.status
            ),
            None => write!(
                f,
                "Order[{} {} {} qty={} filled={} {}]",
                self.id, self.side, self.order_type, self.quantity, self.filled_quantity, self.status
            ),
        }
    }
}
