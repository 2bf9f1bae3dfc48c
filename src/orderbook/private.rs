use super::book::{BookState, OrderBook};
use super::book_side::BookSide;
use super::error::OrderBookError;
use super::order::{Order, Side};
use tracing::trace;

impl BookState {
    #[inline]
    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Places the unfilled part of a limit order on its own side and records
    /// it in the index.
    pub(super) fn rest_order(&mut self, order: &Order) -> Result<(), OrderBookError> {
        self.side_mut(order.side).insert_order(order)?;
        self.orders.insert(order.id.clone(), order.clone());
        trace!(
            "Order {} resting: {} {} @ {:?}",
            order.id,
            order.remaining(),
            order.side,
            order.price
        );
        Ok(())
    }

    /// Cancels a resting order. Returns `None` when `order_id` is not resting.
    pub(super) fn cancel_resting(&mut self, order_id: &str) -> Option<Order> {
        let mut order = self.orders.remove(order_id)?;
        order.cancel();

        let price = order.price?;
        let orders = &self.orders;
        let side = match order.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        if let Some(level) = side.level_mut(price) {
            level.remove_order(&order.id, orders);
        }
        side.retire_if_empty(price);
        Some(order)
    }

    /// Audits the whole book state. See [`OrderBook::check_invariants`].
    pub(super) fn check_invariants(&self) -> Result<(), OrderBookError> {
        let resting_bids = self.bids.check_invariants(&self.orders)?;
        let resting_asks = self.asks.check_invariants(&self.orders)?;

        if resting_bids + resting_asks != self.orders.len() {
            return Err(OrderBookError::invariant(format!(
                "{} orders indexed but {} bids and {} asks resting in levels",
                self.orders.len(),
                resting_bids,
                resting_asks
            )));
        }

        for (id, order) in &self.orders {
            let found = order
                .price
                .and_then(|price| self.side(order.side).level(price))
                .is_some_and(|level| level.order_ids().filter(|&queued| queued == id).count() == 1);
            if !found {
                return Err(OrderBookError::invariant(format!(
                    "indexed order {order} is not queued exactly once at its level"
                )));
            }
        }

        if let (Some(bid), Some(ask)) = (self.bids.best_price(), self.asks.best_price())
            && bid >= ask
        {
            return Err(OrderBookError::invariant(format!(
                "book is crossed: best bid {bid} >= best ask {ask}"
            )));
        }
        Ok(())
    }
}

impl OrderBook {
    /// Checks every structural invariant of the book under the shared lock.
    ///
    /// - queue and lookup hold the same prices on each side, and no reachable
    ///   level is empty;
    /// - each level's cached quantity equals the sum of its orders' remaining
    ///   quantities;
    /// - every indexed order sits in exactly one level, on its own side and at
    ///   its own price, and every queued order is indexed;
    /// - resting orders are neither filled nor cancelled;
    /// - the book is not crossed.
    ///
    /// Cheap enough for tests to call after every operation.
    pub fn check_invariants(&self) -> Result<(), OrderBookError> {
        self.state.read().check_invariants()
    }
}
