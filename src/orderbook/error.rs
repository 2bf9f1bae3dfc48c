//! Order book error types

use super::order::{OrderId, Price, Quantity};
use thiserror::Error;

/// Errors that can occur within the OrderBook.
///
/// Only invalid input and snapshot encoding produce errors. A cancel that finds
/// nothing is reported through `bool`, and an under-filled market order through
/// its `Cancelled` status.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Order quantity is zero or negative
    #[error("invalid quantity: {quantity} must be positive")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: Quantity,
    },

    /// Limit price is zero or negative
    #[error("invalid price: {price} must be positive")]
    InvalidPrice {
        /// The rejected price
        price: Price,
    },

    /// A limit order was submitted without a limit price
    #[error("limit order {order_id} has no price")]
    MissingPrice {
        /// The order that was rejected
        order_id: OrderId,
    },

    /// The order targets a different symbol than this book
    #[error("symbol mismatch: book trades {expected}, order is for {actual}")]
    SymbolMismatch {
        /// Symbol of the book
        expected: String,
        /// Symbol carried by the order
        actual: String,
    },

    /// An order with the same ID is already resting in the book
    #[error("duplicate order id: {0} is already resting")]
    DuplicateOrderId(OrderId),

    /// Order price is not a multiple of the configured tick size
    #[error("invalid tick size: price {price} is not a multiple of tick size {tick_size}")]
    InvalidTickSize {
        /// The order price that failed validation
        price: Price,
        /// The configured tick size
        tick_size: Price,
    },

    /// Order quantity is not a multiple of the configured lot size
    #[error("invalid lot size: quantity {quantity} is not a multiple of lot size {lot_size}")]
    InvalidLotSize {
        /// The order quantity that failed validation
        quantity: Quantity,
        /// The configured lot size
        lot_size: Quantity,
    },

    /// Order quantity is outside the allowed min/max range
    #[error("order size out of range: quantity {quantity}, min {min:?}, max {max:?}")]
    OrderSizeOutOfRange {
        /// The order quantity that failed validation
        quantity: Quantity,
        /// The configured minimum order size, if any
        min: Option<Quantity>,
        /// The configured maximum order size, if any
        max: Option<Quantity>,
    },

    /// Resting the order would push a level's total quantity past what a
    /// `Decimal` can hold
    #[error("quantity overflow: adding {quantity} at price {price} exceeds the level capacity")]
    QuantityOverflow {
        /// Price of the level that cannot take the order
        price: Price,
        /// Quantity that was to be added
        quantity: Quantity,
    },

    /// Operation not permitted for the submitted order
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of the error
        message: String,
    },

    /// Book state broke one of its structural invariants. Always a bug.
    #[error("invariant violation: {message}")]
    InvariantViolation {
        /// What was found inconsistent
        message: String,
    },

    /// Error while serializing snapshot data
    #[error("serialization error: {message}")]
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing snapshot data
    #[error("deserialization error: {message}")]
    DeserializationError {
        /// Underlying error message
        message: String,
    },
}

impl OrderBookError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        OrderBookError::InvariantViolation {
            message: message.into(),
        }
    }
}
