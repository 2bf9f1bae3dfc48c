//! Walks through the basic lifecycle of a single order book
//!
//! This example shows how to:
//! 1. Rest a limit order on an empty book
//! 2. Partially fill it with a crossing limit order at the maker's price
//! 3. Send a market order into an empty side and see it cancelled
//! 4. Rest a bid that does not cross
//! 5. Listen to trades and print a JSON snapshot

use demos::setup_logger;
use lob_core::{MatchResult, OrderBook, OrderBookError, Side, TradeListener, TradeResult};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;

fn main() -> Result<(), OrderBookError> {
    setup_logger("info");
    info!("=== Basic Matching Demo ===");

    let trade_listener: TradeListener = Arc::new(|result: &TradeResult| {
        for trade in &result.trades {
            info!(
                "  [listener] {} trade {} @ {} (buy {}, sell {})",
                result.symbol, trade.quantity, trade.price, trade.buy_order_id, trade.sell_order_id
            );
        }
    });
    let book = OrderBook::with_trade_listener("BTCUSDT", trade_listener);

    info!("Step 1: limit ask a1 0.5 @ 50100 on an empty book");
    let result = book.add_limit_order("a1", Side::Ask, dec!(50100), dec!(0.5))?;
    report(&result);
    display_depth(&book);

    info!("Step 2: limit bid b1 0.3 @ 50100 crosses a1");
    let result = book.add_limit_order("b1", Side::Bid, dec!(50100), dec!(0.3))?;
    report(&result);
    display_depth(&book);

    info!("Step 3: market bid m1 1.0 on a book with 0.2 offered");
    let result = book.submit_market_order("m1", Side::Bid, dec!(1.0))?;
    report(&result);

    info!("Step 4: market bid m2 1.0 on an empty ask side");
    let result = book.submit_market_order("m2", Side::Bid, dec!(1.0))?;
    report(&result);

    info!("Step 5: ask a2 1.0 @ 100, then bid b2 1.0 @ 90 does not cross");
    book.add_limit_order("a2", Side::Ask, dec!(100), dec!(1.0))?;
    let result = book.add_limit_order("b2", Side::Bid, dec!(90), dec!(1.0))?;
    report(&result);
    display_depth(&book);

    info!("Step 6: cancel b2 twice");
    info!("  first cancel: {}", book.cancel_order("b2"));
    info!("  second cancel: {}", book.cancel_order("b2"));

    book.check_invariants()?;
    info!("Snapshot: {}", book.snapshot_to_json(5)?);
    info!(
        "Trades: {}, last price: {:?}",
        book.trade_count(),
        book.last_trade_price()
    );
    info!("=== Demo Complete ===");
    Ok(())
}

fn report(result: &MatchResult) {
    info!(
        "  {} -> {} trades, executed {}",
        result.order,
        result.trades.len(),
        result.executed_quantity()
    );
}

fn display_depth(book: &OrderBook) {
    let (bids, asks) = book.depth(5);
    info!("  --- {} ---", book.symbol());
    for level in asks.iter().rev() {
        info!(
            "  ASK {:>10} | {:>6} ({} orders)",
            level.price, level.quantity, level.order_count
        );
    }
    for level in &bids {
        info!(
            "  BID {:>10} | {:>6} ({} orders)",
            level.price, level.quantity, level.order_count
        );
    }
}
