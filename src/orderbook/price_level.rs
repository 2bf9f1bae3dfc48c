//! A single price on one side of the book.

use super::error::OrderBookError;
use super::order::{Order, OrderId, Price, Quantity};
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};

/// Resting orders sharing one price, oldest first, plus their total remaining quantity.
///
/// The level stores order IDs only. The book's order index owns the orders,
/// so every recomputation reads state from that index.
#[derive(Debug, Clone)]
pub(crate) struct PriceLevel {
    price: Price,
    orders: VecDeque<OrderId>,
    quantity: Quantity,
}

impl PriceLevel {
    pub(crate) fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            quantity: Decimal::ZERO,
        }
    }

    #[inline]
    pub(crate) fn price(&self) -> Price {
        self.price
    }

    /// Cached sum of remaining quantity over the orders at this level.
    #[inline]
    pub(crate) fn total_quantity(&self) -> Quantity {
        self.quantity
    }

    #[inline]
    pub(crate) fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// The order with time priority at this price.
    #[inline]
    pub(crate) fn front(&self) -> Option<&OrderId> {
        self.orders.front()
    }

    pub(crate) fn order_ids(&self) -> impl Iterator<Item = &OrderId> {
        self.orders.iter()
    }

    /// Appends an order to the back of the queue. O(1).
    ///
    /// The level is left untouched when the new total would overflow.
    pub(crate) fn add_order(&mut self, order: &Order) -> Result<(), OrderBookError> {
        debug_assert_eq!(order.price, Some(self.price));
        let quantity = self.quantity.checked_add(order.remaining()).ok_or(
            OrderBookError::QuantityOverflow {
                price: self.price,
                quantity: order.remaining(),
            },
        )?;
        self.orders.push_back(order.id.clone());
        self.quantity = quantity;
        Ok(())
    }

    /// Drops every order that is no longer live in `index` and recomputes the
    /// cached quantity from scratch.
    ///
    /// An order is live when it is still in the index, non-terminal and has
    /// quantity left. Relative order of the survivors is preserved. The
    /// survivors are a subset of what `add_order` admitted, so their sum
    /// cannot exceed the old total.
    pub(crate) fn remove_filled_orders(&mut self, index: &HashMap<OrderId, Order>) {
        let mut quantity = Decimal::ZERO;
        self.orders.retain(|id| match index.get(id) {
            Some(order) if !order.status.is_terminal() && order.remaining() > Decimal::ZERO => {
                quantity = quantity.saturating_add(order.remaining());
                true
            }
            _ => false,
        });
        self.quantity = quantity;
    }

    /// Removes one order by ID, then recomputes the cached quantity.
    pub(crate) fn remove_order(&mut self, order_id: &OrderId, index: &HashMap<OrderId, Order>) {
        self.orders.retain(|id| id != order_id);
        self.remove_filled_orders(index);
    }

    /// A level with no orders or no quantity must not stay reachable.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.orders.is_empty() || self.quantity <= Decimal::ZERO
    }
}
