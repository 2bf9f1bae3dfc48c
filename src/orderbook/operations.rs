//! Order book operations like placing and canceling orders

use super::book::OrderBook;
use super::error::OrderBookError;
use super::order::{Order, OrderId, OrderStatus, OrderType, Price, Quantity, Side};
use super::trade::{MatchResult, Trade, TradeResult};
use crate::utils::current_time_millis;
use rust_decimal::Decimal;
use tracing::{trace, warn};

impl OrderBook {
    /// Add a limit order to the book.
    ///
    /// Builds the order for this book's symbol and hands it to
    /// [`Self::place_order`].
    ///
    /// # Errors
    /// Same as [`Self::place_order`].
    pub fn add_limit_order(
        &self,
        id: impl Into<OrderId>,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<MatchResult, OrderBookError> {
        let order = Order::limit(id, &self.symbol, side, price, quantity);
        trace!(
            "Adding limit order {} {} {} {}",
            order.id, side, price, quantity
        );
        self.place_order(order)
    }

    /// Submit a market order to the book.
    ///
    /// # Errors
    /// Same as [`Self::place_order`].
    pub fn submit_market_order(
        &self,
        id: impl Into<OrderId>,
        side: Side,
        quantity: Quantity,
    ) -> Result<MatchResult, OrderBookError> {
        let order = Order::market(id, &self.symbol, side, quantity);
        trace!("Submitting market order {} {} {}", order.id, side, quantity);
        self.place_order(order)
    }

    /// Places an order: matches it against the opposite side and, for a limit
    /// order, rests whatever is left.
    ///
    /// The order is validated first, then stamped `Pending` with the current
    /// time. Matching and resting happen under one exclusive lock. A market
    /// order that exhausts the book comes back `Cancelled` with the filled
    /// part still recorded; that is not an error.
    ///
    /// When trades were produced and a trade listener is set, it is called
    /// once after the lock has been released. The [`TradeResult`] carries the
    /// trade-log position of its first trade, taken while the lock was held.
    ///
    /// # Errors
    /// Returns an error when [`Self::validate_order`] rejects the order, or
    /// [`OrderBookError::DuplicateOrderId`] when an order with the same ID is
    /// already resting. The book is unchanged in both cases.
    pub fn place_order(&self, mut order: Order) -> Result<MatchResult, OrderBookError> {
        self.validate_order(&order)?;
        order.status = OrderStatus::Pending;
        order.timestamp = current_time_millis();
        trace!("Order book {}: placing {}", self.symbol, order);

        let (sequence, trades) = {
            let mut state = self.state.write();
            if state.orders.contains_key(&order.id) {
                warn!(
                    "Order book {}: rejected {}, id already resting",
                    self.symbol, order.id
                );
                return Err(OrderBookError::DuplicateOrderId(order.id));
            }
            let sequence = state.trades.len() as u64;
            let trades = match order.order_type {
                OrderType::Limit => {
                    let limit = order.price.ok_or_else(|| OrderBookError::MissingPrice {
                        order_id: order.id.clone(),
                    })?;
                    state.process_limit_order(&mut order, limit)?
                }
                OrderType::Market => state.process_market_order(&mut order),
            };
            (sequence, trades)
        };

        trace!(
            "Order book {}: {} done with {} trades",
            self.symbol,
            order,
            trades.len()
        );
        if !trades.is_empty() {
            self.notify_trades(&order.id, sequence, &trades);
        }
        Ok(MatchResult { order, trades })
    }

    /// Cancels a resting order.
    ///
    /// Returns `false` when no order with this ID is resting, which includes
    /// orders already filled or cancelled. Cancelling twice therefore gives
    /// `true` then `false`.
    pub fn cancel_order(&self, order_id: &str) -> bool {
        let cancelled = self.state.write().cancel_resting(order_id);
        match cancelled {
            Some(order) => {
                trace!("Order book {}: cancelled {}", self.symbol, order);
                true
            }
            None => {
                trace!(
                    "Order book {}: cancel of {} found nothing resting",
                    self.symbol, order_id
                );
                false
            }
        }
    }

    /// Checks an order against this book without touching its state.
    ///
    /// # Errors
    /// - [`OrderBookError::SymbolMismatch`] when the order targets another book
    /// - [`OrderBookError::InvalidQuantity`] for a zero or negative quantity
    /// - [`OrderBookError::InvalidOperation`] for an order that was already filled
    /// - [`OrderBookError::MissingPrice`] / [`OrderBookError::InvalidPrice`]
    ///   for a limit order without a positive price
    /// - [`OrderBookError::InvalidTickSize`] / [`OrderBookError::InvalidLotSize`]
    ///   when a configured increment is not respected
    /// - [`OrderBookError::OrderSizeOutOfRange`] outside the configured size bounds
    pub fn validate_order(&self, order: &Order) -> Result<(), OrderBookError> {
        self.check_order(order).inspect_err(|error| {
            warn!(
                "Order book {}: rejected order {}: {}",
                self.symbol, order.id, error
            );
        })
    }

    fn check_order(&self, order: &Order) -> Result<(), OrderBookError> {
        if order.symbol != self.symbol {
            return Err(OrderBookError::SymbolMismatch {
                expected: self.symbol.clone(),
                actual: order.symbol.clone(),
            });
        }

        if order.quantity <= Decimal::ZERO {
            return Err(OrderBookError::InvalidQuantity {
                quantity: order.quantity,
            });
        }

        if order.filled_quantity != Decimal::ZERO {
            return Err(OrderBookError::InvalidOperation {
                message: format!(
                    "order {} already has {} filled",
                    order.id, order.filled_quantity
                ),
            });
        }

        if order.order_type == OrderType::Limit {
            let price = order.price.ok_or_else(|| OrderBookError::MissingPrice {
                order_id: order.id.clone(),
            })?;
            if price <= Decimal::ZERO {
                return Err(OrderBookError::InvalidPrice { price });
            }
            if let Some(tick_size) = self.tick_size
                && tick_size > Decimal::ZERO
                && price % tick_size != Decimal::ZERO
            {
                return Err(OrderBookError::InvalidTickSize { price, tick_size });
            }
        }

        if let Some(lot_size) = self.lot_size
            && lot_size > Decimal::ZERO
            && order.quantity % lot_size != Decimal::ZERO
        {
            return Err(OrderBookError::InvalidLotSize {
                quantity: order.quantity,
                lot_size,
            });
        }

        let too_small = self.min_order_size.is_some_and(|min| order.quantity < min);
        let too_large = self.max_order_size.is_some_and(|max| order.quantity > max);
        if too_small || too_large {
            return Err(OrderBookError::OrderSizeOutOfRange {
                quantity: order.quantity,
                min: self.min_order_size,
                max: self.max_order_size,
            });
        }

        Ok(())
    }

    fn notify_trades(&self, order_id: &OrderId, sequence: u64, trades: &[Trade]) {
        if let Some(ref listener) = self.trade_listener {
            let result = TradeResult::new(
                self.symbol.clone(),
                order_id.clone(),
                sequence,
                trades.to_vec(),
            );
            listener(&result);
        }
    }
}
