//! Order book for a single symbol
//!
//! Pairs a bid book and an ask book with an id index so orders can be
//! cancelled or looked up by id alone.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

use super::{AskBook, BidBook};

/// Both sides of the book for one symbol
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: Symbol,
    pub(crate) bids: BidBook,
    pub(crate) asks: AskBook,
    /// Where each resting order lives
    index: HashMap<OrderId, (Side, Price)>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            index: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Add an order to the side named by `order.side`
    ///
    /// No validation happens here; it was done when the order was created.
    pub fn insert(&mut self, order: Order) {
        debug_assert_eq!(order.symbol, self.symbol, "order routed to wrong book");
        self.index.insert(order.order_id, (order.side, order.price));
        match order.side {
            Side::BUY => self.bids.insert(order),
            Side::SELL => self.asks.insert(order),
        }
    }

    /// Remove an order from whichever side holds it
    pub fn cancel(&mut self, order_id: &OrderId) -> Option<Order> {
        let (side, price) = self.index.remove(order_id)?;
        match side {
            Side::BUY => self.bids.remove(order_id, price),
            Side::SELL => self.asks.remove(order_id, price),
        }
    }

    pub fn lookup(&self, order_id: &OrderId) -> Option<&Order> {
        let (side, price) = self.index.get(order_id)?;
        match side {
            Side::BUY => self.bids.get(order_id, *price),
            Side::SELL => self.asks.get(order_id, *price),
        }
    }

    /// Highest-priority buy order
    pub fn best_buy(&self) -> Option<&Order> {
        self.bids.best_bid()
    }

    /// Highest-priority sell order
    pub fn best_sell(&self) -> Option<&Order> {
        self.asks.best_ask()
    }

    /// Best ask minus best bid, if both sides are present
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.bids.best_bid_price()?;
        let ask = self.asks.best_ask_price()?;
        Some(ask.as_decimal() - bid.as_decimal())
    }

    /// Resting orders of one side in priority order
    pub fn orders(&self, side: Side) -> Vec<&Order> {
        match side {
            Side::BUY => self.bids.orders().collect(),
            Side::SELL => self.asks.orders().collect(),
        }
    }

    /// Aggregated (price, quantity) levels of both sides, best first
    pub fn depth(&self, depth: usize) -> (Vec<(Price, Quantity)>, Vec<(Price, Quantity)>) {
        (self.bids.depth_snapshot(depth), self.asks.depth_snapshot(depth))
    }

    /// Forget an order that left the book through a fill
    pub(crate) fn forget(&mut self, order_id: &OrderId) {
        self.index.remove(order_id);
    }

    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
