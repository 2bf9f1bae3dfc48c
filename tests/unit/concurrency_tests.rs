use lob_core::{OrderBook, OrderStatus, Side, TradeResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[cfg(test)]
mod tests {
    use super::*;

    const THREADS: usize = 8;
    const ORDERS_PER_THREAD: usize = 200;

    #[test]
    fn test_concurrent_resting_orders_all_land() {
        let book = Arc::new(OrderBook::new("TEST"));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let book = Arc::clone(&book);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..ORDERS_PER_THREAD {
                        // Bids below 1000, asks above, so nothing crosses
                        let (side, price) = if t % 2 == 0 {
                            (Side::Bid, Decimal::from(900 + i % 50))
                        } else {
                            (Side::Ask, Decimal::from(1100 + i % 50))
                        };
                        book.add_limit_order(format!("t{t}-{i}"), side, price, dec!(1))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        book.check_invariants().unwrap();
        assert_eq!(book.order_count(), THREADS * ORDERS_PER_THREAD);
        assert_eq!(book.trade_count(), 0);
        assert_eq!(book.best_bid_ask(), (Some(dec!(949)), Some(dec!(1100))));
    }

    #[test]
    fn test_concurrent_crossing_flow_conserves_quantity() {
        let book = Arc::new(OrderBook::new("TEST"));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let book = Arc::clone(&book);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut submitted = Decimal::ZERO;
                    for i in 0..ORDERS_PER_THREAD {
                        let side = if (t + i) % 2 == 0 { Side::Bid } else { Side::Ask };
                        let price = Decimal::from(100 + (i % 5));
                        let quantity = Decimal::new(((i % 7) + 1) as i64, 1);
                        submitted += quantity;
                        book.add_limit_order(format!("t{t}-{i}"), side, price, quantity)
                            .unwrap();
                    }
                    submitted
                })
            })
            .collect();

        let submitted: Decimal = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .sum();

        book.check_invariants().unwrap();

        // Every unit submitted is either resting or was executed on both sides of a trade
        let executed: Decimal = book.trades().iter().map(|trade| trade.quantity).sum();
        let (bids, asks) = book.depth(usize::MAX);
        let resting: Decimal = bids
            .iter()
            .chain(asks.iter())
            .map(|level| level.quantity)
            .sum();
        assert_eq!(resting + executed * Decimal::TWO, submitted);
    }

    #[test]
    fn test_readers_see_uncrossed_book_during_writes() {
        let book = Arc::new(OrderBook::new("TEST"));
        for i in 0..50 {
            book.add_limit_order(format!("a{i}"), Side::Ask, Decimal::from(200 + i), dec!(1))
                .unwrap();
            book.add_limit_order(format!("b{i}"), Side::Bid, Decimal::from(100 - i), dec!(1))
                .unwrap();
        }

        let writer = {
            let book = Arc::clone(&book);
            thread::spawn(move || {
                for i in 0..50 {
                    let result = book
                        .submit_market_order(format!("m{i}"), Side::Bid, dec!(0.5))
                        .unwrap();
                    assert_eq!(result.order.status, OrderStatus::Filled);
                    book.cancel_order(&format!("b{i}"));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let book = Arc::clone(&book);
                thread::spawn(move || {
                    for _ in 0..500 {
                        if let (Some(bid), Some(ask)) = book.best_bid_ask() {
                            assert!(bid < ask, "crossed book: {bid} >= {ask}");
                        }
                        let (bids, asks) = book.depth(5);
                        assert!(bids.windows(2).all(|w| w[0].price > w[1].price));
                        assert!(asks.windows(2).all(|w| w[0].price < w[1].price));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        book.check_invariants().unwrap();
        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), Some(dec!(225)));
    }

    #[test]
    fn test_concurrent_cancel_succeeds_exactly_once() {
        let book = Arc::new(OrderBook::new("TEST"));
        for i in 0..100 {
            book.add_limit_order(format!("o{i}"), Side::Bid, dec!(10), dec!(1))
                .unwrap();
        }
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let book = Arc::clone(&book);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    (0..100)
                        .filter(|i| book.cancel_order(&format!("o{i}")))
                        .count()
                })
            })
            .collect();

        let cancelled: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(cancelled, 100);
        assert_eq!(book.order_count(), 0);
        assert_eq!(book.level_count(Side::Bid), 0);
        book.check_invariants().unwrap();
    }

    #[test]
    fn test_listener_sequences_restore_trade_log_order() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let book = Arc::new(OrderBook::with_trade_listener(
            "TEST",
            Arc::new(move |result: &TradeResult| {
                sink.lock().unwrap().push(result.clone());
            }),
        ));
        for i in 0..THREADS * ORDERS_PER_THREAD {
            let price = Decimal::from(100 + i % 20);
            book.add_limit_order(format!("a{i}"), Side::Ask, price, dec!(1))
                .unwrap();
        }
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let book = Arc::clone(&book);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..ORDERS_PER_THREAD {
                        book.add_limit_order(format!("t{t}-{i}"), Side::Bid, dec!(120), dec!(1))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut received = received.lock().unwrap().clone();
        assert_eq!(received.len(), THREADS * ORDERS_PER_THREAD);
        received.sort_by_key(|result| result.sequence);

        let mut next = 0;
        for result in &received {
            assert_eq!(result.sequence, next);
            next += result.trades.len() as u64;
        }
        let delivered: Vec<_> = received
            .iter()
            .flat_map(|result| result.trades.iter().map(|trade| trade.id))
            .collect();
        let logged: Vec<_> = book.trades().iter().map(|trade| trade.id).collect();
        assert_eq!(delivered, logged);
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_independent_books_in_parallel() {
        let books: Vec<_> = ["BTCUSDT", "ETHUSDT", "SOLUSDT"]
            .into_iter()
            .map(|symbol| Arc::new(OrderBook::new(symbol)))
            .collect();

        let handles: Vec<_> = books
            .iter()
            .map(|book| {
                let book = Arc::clone(book);
                thread::spawn(move || {
                    book.add_limit_order("a1", Side::Ask, dec!(10), dec!(2)).unwrap();
                    book.add_limit_order("b1", Side::Bid, dec!(10), dec!(1)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for book in &books {
            assert_eq!(book.trade_count(), 1);
            assert_eq!(book.get_order("a1").unwrap().remaining(), dec!(1));
        }
    }
}
