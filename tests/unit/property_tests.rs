use lob_core::{Order, OrderBook, OrderStatus, Quantity, Side};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Action {
    Limit { bid: bool, tick: u32, lots: u32 },
    Market { bid: bool, lots: u32 },
    Cancel { target: usize },
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (any::<bool>(), 0u32..12, 1u32..40)
            .prop_map(|(bid, tick, lots)| Action::Limit { bid, tick, lots }),
        2 => (any::<bool>(), 1u32..60).prop_map(|(bid, lots)| Action::Market { bid, lots }),
        2 => (0usize..200).prop_map(|target| Action::Cancel { target }),
    ]
}

fn side(bid: bool) -> Side {
    if bid { Side::Bid } else { Side::Ask }
}

/// Lots of 0.1 so fractional arithmetic is exercised.
fn lots(n: u32) -> Quantity {
    Decimal::new(i64::from(n), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_book_stays_consistent(actions in prop::collection::vec(action(), 1..120)) {
            let book = OrderBook::new("PROP");
            let mut submitted: HashMap<String, Order> = HashMap::new();
            let mut ids = Vec::new();

            for (n, action) in actions.into_iter().enumerate() {
                let id = format!("o{n}");
                match action {
                    Action::Limit { bid, tick, lots: count } => {
                        let price = Decimal::from(100 + tick);
                        let result = book
                            .add_limit_order(id.clone(), side(bid), price, lots(count))
                            .unwrap();

                        for trade in &result.trades {
                            // Maker price, never better than the taker's limit
                            match side(bid) {
                                Side::Bid => {
                                    prop_assert!(trade.price <= price);
                                }
                                Side::Ask => {
                                    prop_assert!(trade.price >= price);
                                }
                            }
                        }
                        prop_assert_eq!(result.executed_quantity(), result.order.filled_quantity);
                        submitted.insert(id.clone(), result.order);
                        ids.push(id);
                    }
                    Action::Market { bid, lots: count } => {
                        let result = book.submit_market_order(id, side(bid), lots(count)).unwrap();
                        prop_assert_eq!(result.executed_quantity(), result.order.filled_quantity);
                        prop_assert!(matches!(
                            result.order.status,
                            OrderStatus::Filled | OrderStatus::Cancelled
                        ));
                        prop_assert!(!result.is_resting());
                    }
                    Action::Cancel { target } => {
                        if let Some(id) = ids.get(target) {
                            let was_resting = book.get_order(id).is_some();
                            prop_assert_eq!(book.cancel_order(id), was_resting);
                            prop_assert!(!book.cancel_order(id));
                        }
                    }
                }

                prop_assert!(book.check_invariants().is_ok(), "{:?}", book.check_invariants());

                let (bid, ask) = book.best_bid_ask();
                if let (Some(bid), Some(ask)) = (bid, ask) {
                    prop_assert!(bid < ask);
                }
            }

            // Every resting order is one we placed, at its own price, with the
            // remaining quantity conserved against the trade log.
            let trades = book.trades();
            for (id, placed) in &submitted {
                if let Some(resting) = book.get_order(id) {
                    prop_assert_eq!(resting.price, placed.price);
                    let traded: Decimal = trades
                        .iter()
                        .filter(|trade| {
                            trade.buy_order_id.as_str() == id.as_str()
                                || trade.sell_order_id.as_str() == id.as_str()
                        })
                        .map(|trade| trade.quantity)
                        .sum();
                    prop_assert_eq!(resting.filled_quantity, traded);
                    prop_assert_eq!(resting.remaining() + traded, placed.quantity);
                }
            }
        }

        #[test]
        fn prop_depth_matches_resting_orders(orders in prop::collection::vec((any::<bool>(), 0u32..20, 1u32..10), 1..80)) {
            let book = OrderBook::new("PROP");
            for (n, (bid, tick, count)) in orders.into_iter().enumerate() {
                // Bids at or below 100, asks above, so nothing trades
                let price = if bid {
                    Decimal::from(100 - tick)
                } else {
                    Decimal::from(101 + tick)
                };
                book.add_limit_order(format!("o{n}"), side(bid), price, lots(count)).unwrap();
            }

            let (bids, asks) = book.depth(usize::MAX);
            prop_assert!(bids.windows(2).all(|w| w[0].price > w[1].price));
            prop_assert!(asks.windows(2).all(|w| w[0].price < w[1].price));
            prop_assert_eq!(bids.len(), book.level_count(Side::Bid));
            prop_assert_eq!(asks.len(), book.level_count(Side::Ask));

            let counted: usize = bids.iter().chain(asks.iter()).map(|level| level.order_count).sum();
            prop_assert_eq!(counted, book.order_count());
            for level in bids.iter().chain(asks.iter()) {
                prop_assert!(level.quantity > Decimal::ZERO);
                prop_assert!(level.order_count > 0);
            }
        }
    }
}
