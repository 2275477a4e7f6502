//! Limit order types
//!
//! Orders are created through `Order::create`, which checks that the
//! submitting trader can cover the order at submission time. The check is
//! advisory: nothing is reserved, and clearing re-checks at settlement.

use crate::account::TraderAccount;
use crate::errors::OrderError;
use crate::ids::{OrderId, Symbol, TraderId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => write!(f, "buy"),
            Side::SELL => write!(f, "sell"),
        }
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Resting, nothing filled yet
    Pending,
    /// Partially matched
    Partial,
    /// Completely matched (terminal)
    Filled,
    /// Removed by cancel (terminal)
    Canceled,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Canceled)
    }
}

/// A simple limit order
///
/// `quantity` is the open (unfilled) amount and shrinks as the order fills.
/// The limit price never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub trader_id: TraderId,
    pub side: Side,
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    pub original_quantity: Quantity,
    pub filled_quantity: Quantity,
    pub status: OrderStatus,
}

impl Order {
    /// Create a pending order without consulting any account
    pub fn new(
        order_id: OrderId,
        trader_id: TraderId,
        side: Side,
        symbol: Symbol,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self {
            order_id,
            trader_id,
            side,
            symbol,
            price,
            quantity,
            original_quantity: quantity,
            filled_quantity: Quantity::zero(),
            status: OrderStatus::Pending,
        }
    }

    /// Validating constructor
    ///
    /// Rejects a zero quantity, a non-positive price, a buy the trader's cash
    /// cannot cover, and a sell the trader's holdings cannot cover.
    pub fn create(
        order_id: OrderId,
        trader: &TraderAccount,
        side: Side,
        symbol: Symbol,
        quantity: u64,
        price: Decimal,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity(
                "quantity must be greater than zero".to_string(),
            ));
        }
        let price = Price::try_new(price).ok_or_else(|| {
            OrderError::InvalidPrice(format!("price must be positive, got {price}"))
        })?;
        let quantity = Quantity::new(quantity);

        let required = quantity.notional(price).ok_or_else(|| {
            OrderError::InvalidQuantity(format!(
                "order value of {quantity} shares at {price} is out of range"
            ))
        })?;

        match side {
            Side::BUY => {
                if trader.cash() < required {
                    return Err(OrderError::InsufficientFunds {
                        trader_id: trader.trader_id,
                        required,
                        available: trader.cash(),
                    });
                }
            }
            Side::SELL => {
                if !trader.can_cover_sell(&symbol, quantity) {
                    return Err(OrderError::InsufficientShares {
                        trader_id: trader.trader_id,
                        held: trader.shares_of(&symbol),
                        symbol,
                        required: quantity.value(),
                    });
                }
            }
        }

        Ok(Self::new(order_id, trader.trader_id, side, symbol, quantity, price))
    }

    /// Check quantity invariant: filled + open = original
    pub fn check_invariant(&self) -> bool {
        self.filled_quantity.checked_add(self.quantity) == Some(self.original_quantity)
    }

    /// Check if order is completely filled
    pub fn is_filled(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Check if order has any fills
    pub fn has_fills(&self) -> bool {
        !self.filled_quantity.is_zero()
    }

    /// Value of the open quantity at the limit price
    pub fn notional(&self) -> Option<Decimal> {
        self.quantity.notional(self.price)
    }

    /// Apply a fill and adjust status
    ///
    /// # Panics
    /// Panics if the fill would exceed the open quantity
    pub fn fill(&mut self, fill_quantity: Quantity) {
        let remaining = self
            .quantity
            .checked_sub(fill_quantity)
            .expect("Fill would exceed order quantity");

        self.quantity = remaining;
        self.filled_quantity = self.filled_quantity.saturating_add(fill_quantity);

        if self.is_filled() {
            self.status = OrderStatus::Filled;
        } else if self.has_fills() {
            self.status = OrderStatus::Partial;
        }

        assert!(self.check_invariant(), "Invariant violated after fill");
    }

    /// Cancel the order
    ///
    /// # Panics
    /// Panics if order is already in terminal state
    pub fn cancel(&mut self) {
        assert!(!self.status.is_terminal(), "Cannot cancel terminal order");
        self.status = OrderStatus::Canceled;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OrderID: {} | Trader: {} | {} {} shares of {} @ ${}",
            self.order_id, self.trader_id, self.side, self.quantity, self.symbol, self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buyer(cash: i64) -> TraderAccount {
        TraderAccount::new(TraderId::new(1), Decimal::from(cash)).unwrap()
    }

    fn seller(shares: u64) -> TraderAccount {
        TraderAccount::new(TraderId::new(2), Decimal::ZERO)
            .unwrap()
            .with_holding(Symbol::new("X"), shares)
            .unwrap()
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::BUY.opposite(), Side::SELL);
        assert_eq!(Side::SELL.opposite(), Side::BUY);
    }

    #[test]
    fn test_order_creation() {
        let order = Order::create(
            OrderId::new(1),
            &buyer(1000),
            Side::BUY,
            Symbol::new("X"),
            5,
            Decimal::from(50),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.trader_id, TraderId::new(1));
        assert_eq!(order.notional(), Some(Decimal::from(250)));
        assert!(order.check_invariant());
        assert!(!order.has_fills());
    }

    #[test]
    fn test_buy_requires_cash() {
        let err = Order::create(
            OrderId::new(1),
            &buyer(200),
            Side::BUY,
            Symbol::new("X"),
            5,
            Decimal::from(50),
        )
        .unwrap_err();

        assert_eq!(
            err,
            OrderError::InsufficientFunds {
                trader_id: TraderId::new(1),
                required: Decimal::from(250),
                available: Decimal::from(200),
            }
        );
    }

    #[test]
    fn test_sell_requires_shares() {
        let ok = Order::create(OrderId::new(1), &seller(10), Side::SELL, Symbol::new("X"), 10, Decimal::from(48));
        assert!(ok.is_ok());

        let err = Order::create(OrderId::new(2), &seller(4), Side::SELL, Symbol::new("X"), 5, Decimal::from(48))
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientShares { required: 5, held: 4, .. }));
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let account = buyer(1000);
        let zero_qty = Order::create(OrderId::new(1), &account, Side::BUY, Symbol::new("X"), 0, Decimal::from(10));
        assert!(matches!(zero_qty, Err(OrderError::InvalidQuantity(_))));

        let zero_price = Order::create(OrderId::new(1), &account, Side::BUY, Symbol::new("X"), 1, Decimal::ZERO);
        assert!(matches!(zero_price, Err(OrderError::InvalidPrice(_))));

        let negative = Order::create(OrderId::new(1), &account, Side::SELL, Symbol::new("X"), 1, Decimal::from(-5));
        assert!(matches!(negative, Err(OrderError::InvalidPrice(_))));
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        for side in [Side::BUY, Side::SELL] {
            let err = Order::create(
                OrderId::new(1),
                &buyer(1000),
                side,
                Symbol::new("X"),
                u64::MAX,
                Decimal::from(10_000_000_000u64),
            )
            .unwrap_err();
            assert!(matches!(err, OrderError::InvalidQuantity(_)));
        }
    }

    #[test]
    fn test_order_fill() {
        let mut order = Order::new(
            OrderId::new(1),
            TraderId::new(1),
            Side::BUY,
            Symbol::new("X"),
            Quantity::new(10),
            Price::from_u64(50),
        );

        // Partial fill
        order.fill(Quantity::new(3));
        assert_eq!(order.status, OrderStatus::Partial);
        assert_eq!(order.quantity, Quantity::new(7));
        assert!(order.has_fills());
        assert!(!order.is_filled());
        assert!(order.check_invariant());

        // Complete fill
        order.fill(Quantity::new(7));
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.is_filled());
        assert!(order.check_invariant());
    }

    #[test]
    #[should_panic(expected = "Fill would exceed order quantity")]
    fn test_order_overfill_panics() {
        let mut order = Order::new(
            OrderId::new(1),
            TraderId::new(1),
            Side::SELL,
            Symbol::new("X"),
            Quantity::new(2),
            Price::from_u64(50),
        );
        order.fill(Quantity::new(3));
    }

    #[test]
    #[should_panic(expected = "Cannot cancel terminal order")]
    fn test_cancel_terminal_panics() {
        let mut order = Order::new(
            OrderId::new(1),
            TraderId::new(1),
            Side::BUY,
            Symbol::new("X"),
            Quantity::new(1),
            Price::from_u64(50),
        );
        order.fill(Quantity::new(1));
        order.cancel();
    }

    #[test]
    fn test_order_display() {
        let order = Order::new(
            OrderId::new(3),
            TraderId::new(9),
            Side::SELL,
            Symbol::new("X"),
            Quantity::new(5),
            Price::from_u64(48),
        );
        assert_eq!(order.to_string(), "OrderID: O-3 | Trader: 9 | sell 5 shares of X @ $48.00");
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::new(
            OrderId::new(3),
            TraderId::new(9),
            Side::SELL,
            Symbol::new("X"),
            Quantity::new(5),
            Price::from_str("48.50").unwrap(),
        );

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"side\":\"sell\""));
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
