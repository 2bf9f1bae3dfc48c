//! Contains the core matching engine logic for the order book.
//!
//! Limit and market orders share one loop. Each iteration peeks the best
//! opposite level (discarding stale ones), checks the crossing rule when the
//! taker has a limit, matches against the oldest order at that level at the
//! level's price, then cleans the level up and retires it once empty.

use super::book::BookState;
use super::error::OrderBookError;
use super::order::{Order, OrderId, Price, Side};
use super::trade::Trade;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, error, trace};

/// Returns true when a taker limited at `limit` may trade at `level_price`.
#[inline]
pub(super) fn crosses(taker_side: Side, limit: Price, level_price: Price) -> bool {
    match taker_side {
        Side::Bid => limit >= level_price,
        Side::Ask => limit <= level_price,
    }
}

impl BookState {
    /// Matches a limit order and rests whatever is left on its own side.
    pub(super) fn process_limit_order(
        &mut self,
        order: &mut Order,
        limit: Price,
    ) -> Result<Vec<Trade>, OrderBookError> {
        let trades = self.match_against_book(order, Some(limit));

        // An own-side level at `limit` means the order could not cross, so a
        // rest that fails on overflow never follows trades.
        if order.remaining() > Decimal::ZERO {
            self.rest_order(order)?;
        }
        Ok(trades)
    }

    /// Matches a market order; an unfilled remainder is cancelled, never rested.
    pub(super) fn process_market_order(&mut self, order: &mut Order) -> Vec<Trade> {
        let trades = self.match_against_book(order, None);

        if order.remaining() > Decimal::ZERO {
            trace!(
                "Market order {} exhausted the book with {} unfilled, cancelling remainder",
                order.id,
                order.remaining()
            );
            order.cancel();
        }
        trades
    }

    /// Runs the matching loop for `taker` against the opposite side.
    ///
    /// `limit` of `None` disables the crossing check (market orders).
    fn match_against_book(&mut self, taker: &mut Order, limit: Option<Price>) -> Vec<Trade> {
        let mut trades = Vec::new();
        let BookState {
            bids,
            asks,
            orders,
            trades: trade_log,
            last_trade_price,
        } = self;
        let opposite = match taker.side {
            Side::Bid => asks,
            Side::Ask => bids,
        };

        while taker.remaining() > Decimal::ZERO && !opposite.is_empty() {
            let Some(level_price) = opposite.peek_best() else {
                break;
            };

            if let Some(limit) = limit
                && !crosses(taker.side, limit, level_price)
            {
                break;
            }

            let Some(level) = opposite.level_mut(level_price) else {
                error!("level {} in queue but missing from lookup", level_price);
                debug_assert!(false, "level {level_price} in queue but missing from lookup");
                opposite.retire(level_price);
                continue;
            };
            let Some(maker_id) = level.front().cloned() else {
                opposite.retire(level_price);
                continue;
            };

            match execute_match(orders, taker, &maker_id, level_price) {
                Some(trade) => {
                    debug!(
                        "Trade {}: {} {} @ {} (taker {}, maker {})",
                        trade.id, trade.quantity, taker.side, trade.price, taker.id, maker_id
                    );
                    *last_trade_price = Some(trade.price);
                    trade_log.push(trade.clone());
                    trades.push(trade);
                }
                None => {
                    error!("level {} references unknown order {}", level_price, maker_id);
                    debug_assert!(false, "level {level_price} references unknown order {maker_id}");
                }
            }

            level.remove_filled_orders(orders);
            opposite.retire_if_empty(level_price);
        }

        trades
    }
}

/// Matches `taker` against the resting order `maker_id` at the maker's `price`.
///
/// Fills `min(taker.remaining, maker.remaining)` on both orders, drops the
/// maker from the index once it is filled, and mints exactly one trade.
/// Returns `None` only when `maker_id` is not in the index.
fn execute_match(
    orders: &mut HashMap<OrderId, Order>,
    taker: &mut Order,
    maker_id: &OrderId,
    price: Price,
) -> Option<Trade> {
    let maker = orders.get_mut(maker_id)?;
    let quantity = taker.remaining().min(maker.remaining());

    taker.fill(quantity);
    maker.fill(quantity);

    let (buy_order_id, sell_order_id) = match taker.side {
        Side::Bid => (taker.id.clone(), maker.id.clone()),
        Side::Ask => (maker.id.clone(), taker.id.clone()),
    };
    let trade = Trade::new(buy_order_id, sell_order_id, price, quantity, taker.side);

    if maker.is_filled() {
        orders.remove(maker_id);
    }
    Some(trade)
}
