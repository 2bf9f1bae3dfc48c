use lob_core::{Order, OrderBook, OrderBookError, Side};
use rust_decimal_macros::dec;

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(err: &OrderBookError) -> &'static str {
        match err {
            OrderBookError::InvalidTickSize { .. } => "tick",
            OrderBookError::InvalidLotSize { .. } => "lot",
            OrderBookError::OrderSizeOutOfRange { .. } => "size",
            OrderBookError::SymbolMismatch { .. } => "symbol",
            OrderBookError::InvalidQuantity { .. } => "quantity",
            OrderBookError::DuplicateOrderId(_) => "duplicate",
            _ => "other",
        }
    }

    fn configured_book() -> OrderBook {
        let mut book = OrderBook::with_tick_size("BTCUSDT", dec!(0.5));
        book.set_lot_size(dec!(0.001));
        book.set_min_order_size(dec!(0.001));
        book.set_max_order_size(dec!(10));
        book
    }

    #[test]
    fn test_rejections_leave_book_untouched() {
        let book = configured_book();
        book.add_limit_order("a1", Side::Ask, dec!(50100), dec!(0.5))
            .unwrap();
        let before = book.depth(10);

        let rejected = [
            (
                Order::limit("b1", "BTCUSDT", Side::Bid, dec!(50100.25), dec!(0.1)),
                "tick",
            ),
            (
                Order::limit("b2", "BTCUSDT", Side::Bid, dec!(50100), dec!(0.0005)),
                "lot",
            ),
            (
                Order::limit("b3", "BTCUSDT", Side::Bid, dec!(50100), dec!(11)),
                "size",
            ),
            (
                Order::limit("b4", "ETHUSDT", Side::Bid, dec!(50100), dec!(0.1)),
                "symbol",
            ),
            (
                Order::market("m1", "BTCUSDT", Side::Bid, dec!(-0.1)),
                "quantity",
            ),
            (
                Order::limit("a1", "BTCUSDT", Side::Bid, dec!(50100), dec!(0.1)),
                "duplicate",
            ),
        ];

        for (order, expected) in rejected {
            let id = order.id.clone();
            let err = book.place_order(order).unwrap_err();
            assert_eq!(kind(&err), expected, "order {id} rejected with {err:?}");
        }

        assert_eq!(book.depth(10), before);
        assert_eq!(book.trade_count(), 0);
        assert_eq!(book.order_count(), 1);
        book.check_invariants().unwrap();
    }

    #[test]
    fn test_validate_order_does_not_place() {
        let book = configured_book();
        let order = Order::limit("b1", "BTCUSDT", Side::Bid, dec!(50000), dec!(0.25));

        assert!(book.validate_order(&order).is_ok());
        assert_eq!(book.order_count(), 0);
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let book = configured_book();
        let err = book
            .add_limit_order("b1", Side::Bid, dec!(100.2), dec!(1))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid tick size: price 100.2 is not a multiple of tick size 0.5"
        );

        let err = book
            .add_limit_order("b1", Side::Bid, dec!(-1), dec!(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid price: -1 must be positive");
    }

    #[test]
    fn test_valid_orders_pass_every_constraint() {
        let book = configured_book();
        let result = book
            .add_limit_order("b1", Side::Bid, dec!(50000.5), dec!(9.999))
            .unwrap();
        assert!(result.is_resting());
        book.check_invariants().unwrap();
    }
}
