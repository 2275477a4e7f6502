//! Matching engine core
//!
//! Main coordinator for the per-symbol order books and the matching pass.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::book::OrderBook;
use crate::matching::{crossing, executor::MatchExecutor};

/// Main matching engine
///
/// Keeps one book per symbol, so orders of different symbols can never be
/// compared against each other.
#[derive(Debug)]
pub struct MatchingEngine {
    /// Order books per symbol, visited in symbol order by a pass
    books: BTreeMap<Symbol, OrderBook>,
    /// Which book each resting order lives in
    order_index: HashMap<OrderId, Symbol>,
    /// Trade executor with sequence generation
    executor: MatchExecutor,
}

impl MatchingEngine {
    /// Create a new matching engine with starting trade sequence
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            books: BTreeMap::new(),
            order_index: HashMap::new(),
            executor: MatchExecutor::new(starting_sequence),
        }
    }

    /// Add an order to its symbol's book
    ///
    /// Order ids must be unique; the caller issues them.
    pub fn insert(&mut self, order: Order) {
        debug_assert!(
            !self.order_index.contains_key(&order.order_id),
            "duplicate order id {}",
            order.order_id
        );
        debug!(
            order_id = %order.order_id,
            trader_id = %order.trader_id,
            side = %order.side,
            symbol = %order.symbol,
            quantity = order.quantity.value(),
            price = %order.price,
            "Order resting"
        );

        self.order_index.insert(order.order_id, order.symbol.clone());
        self.books
            .entry(order.symbol.clone())
            .or_insert_with(|| OrderBook::new(order.symbol.clone()))
            .insert(order);
    }

    /// Cancel an order, returning it marked as canceled
    ///
    /// No account is touched: nothing was reserved at submission.
    pub fn cancel(&mut self, order_id: &OrderId) -> Option<Order> {
        let symbol = self.order_index.remove(order_id)?;
        let book = self.books.get_mut(&symbol)?;
        let mut order = book.cancel(order_id)?;
        if book.is_empty() {
            self.books.remove(&symbol);
        }

        order.cancel();
        debug!(order_id = %order_id, symbol = %symbol, "Order canceled");
        Some(order)
    }

    /// Cancel an order; returns whether it was found
    pub fn cancel_order(&mut self, order_id: &OrderId) -> bool {
        self.cancel(order_id).is_some()
    }

    /// Look up a resting order by id
    pub fn lookup(&self, order_id: &OrderId) -> Option<&Order> {
        let symbol = self.order_index.get(order_id)?;
        self.books.get(symbol)?.lookup(order_id)
    }

    /// Highest-priority buy order for `symbol`
    pub fn best_buy(&self, symbol: &Symbol) -> Option<&Order> {
        self.books.get(symbol)?.best_buy()
    }

    /// Highest-priority sell order for `symbol`
    pub fn best_sell(&self, symbol: &Symbol) -> Option<&Order> {
        self.books.get(symbol)?.best_sell()
    }

    /// Run one matching pass over every book
    ///
    /// Returns trades in generation order. Books are visited in symbol
    /// order, so the output is fully determined by the resting orders.
    pub fn run_matching_pass(&mut self) -> Vec<Trade> {
        let mut trades = Vec::new();

        for book in self.books.values_mut() {
            let filled = Self::match_book_impl(book, &mut self.executor, &mut trades);
            for order_id in filled {
                self.order_index.remove(&order_id);
            }
        }
        self.books.retain(|_, book| !book.is_empty());

        info!(
            trade_count = trades.len(),
            resting_orders = self.order_index.len(),
            "Matching pass complete"
        );
        trades
    }

    /// Match one book until it is empty on a side or no longer crosses
    ///
    /// Appends trades to `trades` and returns the ids of fully filled orders.
    fn match_book_impl(
        book: &mut OrderBook,
        executor: &mut MatchExecutor,
        trades: &mut Vec<Trade>,
    ) -> Vec<OrderId> {
        let mut filled = Vec::new();

        loop {
            let Some((bid_price, bid_level)) = book.bids.best_bid_level_mut() else {
                break;
            };
            let Some((ask_price, ask_level)) = book.asks.best_ask_level_mut() else {
                break;
            };

            // No crossing: orders stay resting
            if !crossing::can_match(bid_price, ask_price) {
                break;
            }

            let (Some(buy), Some(sell)) = (bid_level.peek_front(), ask_level.peek_front()) else {
                break;
            };

            let match_qty = buy.quantity.min(sell.quantity);
            let price = crossing::execution_price(bid_price, ask_price);
            let trade = executor.execute_trade(buy, sell, price, match_qty);

            debug!(
                sequence = trade.sequence,
                symbol = %trade.symbol,
                buyer_id = %trade.buyer_id,
                seller_id = %trade.seller_id,
                quantity = match_qty.value(),
                price = %price,
                "Trade executed"
            );
            trades.push(trade);

            if let Some(order) = bid_level.fill_front(match_qty) {
                filled.push(order.order_id);
            }
            if let Some(order) = ask_level.fill_front(match_qty) {
                filled.push(order.order_id);
            }
            book.bids.prune_level(bid_price);
            book.asks.prune_level(ask_price);
        }

        for order_id in &filled {
            book.forget(order_id);
        }
        filled
    }

    /// Get order book snapshot
    pub fn get_order_book(&self, symbol: &Symbol, depth: usize) -> Option<OrderBookSnapshot> {
        self.books.get(symbol).map(|book| {
            let (bids, asks) = book.depth(depth);
            OrderBookSnapshot {
                symbol: symbol.clone(),
                bids,
                asks,
            }
        })
    }

    /// Resting orders of one side of `symbol`'s book, best first
    pub fn open_orders(&self, symbol: &Symbol, side: Side) -> Vec<&Order> {
        self.books
            .get(symbol)
            .map(|book| book.orders(side))
            .unwrap_or_default()
    }

    /// Direct read access to one symbol's book
    pub fn book(&self, symbol: &Symbol) -> Option<&OrderBook> {
        self.books.get(symbol)
    }

    /// Symbols with at least one resting order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.books.keys()
    }

    /// Total resting orders across all books
    pub fn order_count(&self) -> usize {
        self.order_index.len()
    }

    /// Sequence number the next trade will carry
    pub fn next_trade_sequence(&self) -> u64 {
        self.executor.peek_sequence()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Order book snapshot for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::TraderId;
    use types::order::OrderStatus;

    fn create_order(id: u64, trader: u64, side: Side, symbol: &str, price: u64, qty: u64) -> Order {
        Order::new(
            OrderId::new(id),
            TraderId::new(trader),
            side,
            Symbol::new(symbol),
            Quantity::new(qty),
            Price::from_u64(price),
        )
    }

    #[test]
    fn test_engine_resting_order() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::BUY, "X", 50, 5));

        let trades = engine.run_matching_pass();

        assert!(trades.is_empty());
        assert_eq!(engine.order_count(), 1);
        assert_eq!(engine.best_buy(&Symbol::new("X")).unwrap().order_id, OrderId::new(1));
    }

    #[test]
    fn test_engine_full_match_uses_sell_price() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::BUY, "X", 50, 5));
        engine.insert(create_order(2, 2, Side::SELL, "X", 48, 5));

        let trades = engine.run_matching_pass();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buyer_id, TraderId::new(1));
        assert_eq!(trades[0].seller_id, TraderId::new(2));
        assert_eq!(trades[0].quantity, Quantity::new(5));
        assert_eq!(trades[0].price, Price::from_u64(48));
        assert_eq!(engine.order_count(), 0);
        assert!(engine.book(&Symbol::new("X")).is_none());
    }

    #[test]
    fn test_engine_partial_match() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::SELL, "X", 48, 3));
        engine.insert(create_order(2, 2, Side::BUY, "X", 50, 10));

        let trades = engine.run_matching_pass();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Quantity::new(3));

        let remaining = engine.lookup(&OrderId::new(2)).unwrap();
        assert_eq!(remaining.quantity, Quantity::new(7));
        assert_eq!(remaining.status, OrderStatus::Partial);
        assert!(engine.lookup(&OrderId::new(1)).is_none());
    }

    #[test]
    fn test_engine_no_cross() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 2, Side::SELL, "X", 48, 5));
        engine.insert(create_order(2, 1, Side::BUY, "X", 40, 5));

        let trades = engine.run_matching_pass();

        assert!(trades.is_empty());
        assert_eq!(engine.lookup(&OrderId::new(1)).unwrap().quantity, Quantity::new(5));
        assert_eq!(engine.lookup(&OrderId::new(2)).unwrap().quantity, Quantity::new(5));
    }

    #[test]
    fn test_engine_walks_multiple_levels() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::SELL, "X", 48, 2));
        engine.insert(create_order(2, 2, Side::SELL, "X", 49, 2));
        engine.insert(create_order(3, 3, Side::SELL, "X", 55, 2));
        engine.insert(create_order(4, 4, Side::BUY, "X", 50, 5));

        let trades = engine.run_matching_pass();

        let fills: Vec<(u64, Price)> = trades.iter().map(|t| (t.quantity.value(), t.price)).collect();
        assert_eq!(fills, vec![(2, Price::from_u64(48)), (2, Price::from_u64(49))]);
        assert_eq!(engine.lookup(&OrderId::new(4)).unwrap().quantity, Quantity::new(1));
        assert_eq!(engine.best_sell(&Symbol::new("X")).unwrap().order_id, OrderId::new(3));
    }

    #[test]
    fn test_engine_time_priority_at_same_price() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(2, 2, Side::SELL, "X", 48, 5));
        engine.insert(create_order(1, 1, Side::SELL, "X", 48, 5));
        engine.insert(create_order(3, 3, Side::BUY, "X", 48, 5));

        let trades = engine.run_matching_pass();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].sell_order_id, OrderId::new(1));
        assert!(engine.lookup(&OrderId::new(2)).is_some());
    }

    #[test]
    fn test_engine_symbols_never_cross() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::BUY, "X", 100, 5));
        engine.insert(create_order(2, 2, Side::SELL, "Y", 10, 5));

        assert!(engine.run_matching_pass().is_empty());
        assert_eq!(engine.order_count(), 2);
    }

    #[test]
    fn test_engine_trades_ordered_by_symbol_then_sequence() {
        let mut engine = MatchingEngine::new(100);
        engine.insert(create_order(1, 1, Side::BUY, "Y", 10, 1));
        engine.insert(create_order(2, 2, Side::SELL, "Y", 10, 1));
        engine.insert(create_order(3, 1, Side::BUY, "X", 10, 2));
        engine.insert(create_order(4, 2, Side::SELL, "X", 10, 1));
        engine.insert(create_order(5, 3, Side::SELL, "X", 10, 1));

        let trades = engine.run_matching_pass();

        let symbols: Vec<&str> = trades.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["X", "X", "Y"]);
        let sequences: Vec<u64> = trades.iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![100, 101, 102]);
        assert_eq!(engine.next_trade_sequence(), 103);
    }

    #[test]
    fn test_engine_cancel() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::BUY, "X", 50, 5));

        let canceled = engine.cancel(&OrderId::new(1)).unwrap();
        assert_eq!(canceled.status, OrderStatus::Canceled);
        assert!(!engine.cancel_order(&OrderId::new(1)));
        assert!(engine.lookup(&OrderId::new(1)).is_none());
        assert_eq!(engine.symbols().count(), 0);
    }

    #[test]
    fn test_engine_snapshot() {
        let mut engine = MatchingEngine::new(1);
        engine.insert(create_order(1, 1, Side::BUY, "X", 47, 5));
        engine.insert(create_order(2, 1, Side::BUY, "X", 47, 3));
        engine.insert(create_order(3, 2, Side::SELL, "X", 48, 4));

        let snapshot = engine.get_order_book(&Symbol::new("X"), 5).unwrap();
        assert_eq!(snapshot.bids, vec![(Price::from_u64(47), Quantity::new(8))]);
        assert_eq!(snapshot.asks, vec![(Price::from_u64(48), Quantity::new(4))]);
        assert!(engine.get_order_book(&Symbol::new("Z"), 5).is_none());

        let buys = engine.open_orders(&Symbol::new("X"), Side::BUY);
        assert_eq!(buys.len(), 2);
        assert_eq!(buys[0].order_id, OrderId::new(1));
    }
}
