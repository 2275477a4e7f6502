//! Mark prices
//!
//! A reference price per symbol, nudged toward each executed trade. Marks
//! value trader portfolios; they play no part in matching or settlement.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;
use types::ids::Symbol;
use types::trade::Trade;

/// Reference prices for portfolio valuation
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPrices {
    prices: BTreeMap<Symbol, Decimal>,
    /// Fraction of the gap to the trade price closed per trade
    weight: Decimal,
    floor: Decimal,
}

impl MarkPrices {
    pub fn new(weight: Decimal, floor: Decimal) -> Self {
        Self {
            prices: BTreeMap::new(),
            weight,
            floor,
        }
    }

    pub fn with_prices(mut self, prices: BTreeMap<Symbol, Decimal>) -> Self {
        self.prices = prices;
        self
    }

    pub fn get(&self, symbol: &Symbol) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }

    /// Set a mark directly, clamped to the floor
    pub fn set(&mut self, symbol: Symbol, price: Decimal) {
        self.prices.insert(symbol, price.max(self.floor));
    }

    pub fn as_map(&self) -> &BTreeMap<Symbol, Decimal> {
        &self.prices
    }

    /// Move marks toward each trade's price, in trade order
    ///
    /// Symbols without a mark are left unpriced.
    pub fn apply_trades(&mut self, trades: &[Trade]) {
        for trade in trades {
            let Some(current) = self.prices.get_mut(&trade.symbol) else {
                continue;
            };

            let target = trade.price.as_decimal();
            let moved = *current + (target - *current) * self.weight;
            *current = moved.max(self.floor);

            debug!(
                symbol = %trade.symbol,
                trade_price = %target,
                mark = %current,
                "Mark price updated"
            );
        }
    }
}

impl Default for MarkPrices {
    fn default() -> Self {
        Self::new(Decimal::new(1, 1), Decimal::ONE)
    }
}
