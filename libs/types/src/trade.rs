//! Trade records
//!
//! Produced only by the matching engine, immutable afterwards, and consumed
//! once by clearing in generation order.

use crate::ids::{OrderId, Symbol, TraderId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single match between a buy order and a sell order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Generation order within the engine, strictly increasing
    pub sequence: u64,
    pub symbol: Symbol,

    // Order references
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,

    // Counterparties
    pub buyer_id: TraderId,
    pub seller_id: TraderId,

    pub quantity: Quantity,
    /// Execution price (the sell order's limit price)
    pub price: Price,
}

impl Trade {
    /// Calculate trade value (price × quantity), None if out of range
    pub fn trade_value(&self) -> Option<Decimal> {
        self.quantity.notional(self.price)
    }

    /// Buyer and seller are the same trader
    pub fn is_self_trade(&self) -> bool {
        self.buyer_id == self.seller_id
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10}{:<10}{:<10}{:<10}{:<10}",
            self.buyer_id.to_string(),
            self.seller_id.to_string(),
            self.symbol.as_str(),
            self.quantity.to_string(),
            self.price.to_string()
        )
    }
}
