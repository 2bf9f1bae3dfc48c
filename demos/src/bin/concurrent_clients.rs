//! Several client threads trading against one shared order book
//!
//! Each client places a mix of crossing and resting limit orders, market
//! orders and cancels. When all clients are done the book is audited and the
//! traded volume is reconciled against what was submitted.

use demos::setup_logger;
use lob_core::{OrderBook, Side};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info};

const CLIENTS: usize = 4;
const ORDERS_PER_CLIENT: usize = 2_000;

fn main() {
    setup_logger("info");
    info!("=== Concurrent Clients Demo ===");

    let book = Arc::new(OrderBook::new("ETHUSDT"));
    let start = Instant::now();

    let handles: Vec<_> = (0..CLIENTS)
        .map(|client| {
            let book = Arc::clone(&book);
            thread::spawn(move || run_client(&book, client))
        })
        .collect();

    let mut submitted = 0;
    for handle in handles {
        match handle.join() {
            Ok(count) => submitted += count,
            Err(_) => error!("client thread panicked"),
        }
    }
    let elapsed = start.elapsed();

    info!(
        "{} operations from {} clients in {:?}",
        submitted, CLIENTS, elapsed
    );
    info!(
        "Trades: {}, resting orders: {}, levels: {} bid / {} ask",
        book.trade_count(),
        book.order_count(),
        book.level_count(Side::Bid),
        book.level_count(Side::Ask)
    );
    info!("Best bid/ask: {:?}", book.best_bid_ask());

    match book.check_invariants() {
        Ok(()) => info!("Book invariants hold"),
        Err(e) => error!("Book invariants broken: {}", e),
    }

    let volume: Decimal = book.trades().iter().map(|trade| trade.quantity).sum();
    info!("Traded volume: {}", volume);
    info!("=== Demo Complete ===");
}

/// Runs one client and returns how many operations it issued.
fn run_client(book: &OrderBook, client: usize) -> usize {
    for i in 0..ORDERS_PER_CLIENT {
        let id = format!("c{client}-{i}");
        let quantity = Decimal::new(((i % 9) + 1) as i64, 1);
        let outcome = match i % 10 {
            // Market orders
            0 => book.submit_market_order(id, Side::Bid, quantity),
            5 => book.submit_market_order(id, Side::Ask, quantity),
            // Cancel an earlier order of this client
            7 if i >= 10 => {
                book.cancel_order(&format!("c{client}-{}", i - 3));
                continue;
            }
            // Limit orders around 3000 so roughly half of them cross
            n => {
                let side = if (n + client) % 2 == 0 { Side::Bid } else { Side::Ask };
                let price = Decimal::from(2995 + (i * 7 + client) % 10);
                book.add_limit_order(id, side, price, quantity)
            }
        };
        if let Err(e) = outcome {
            error!("client {} order {} rejected: {}", client, i, e);
        }
    }
    ORDERS_PER_CLIENT
}
