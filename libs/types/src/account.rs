//! Trader account: cash balance and share holdings
//!
//! All mutation goes through the validated operations below.
//!
//! Invariants:
//! - cash >= 0 after every committed operation
//! - holdings never map a symbol to zero (the entry is removed instead)

use crate::ids::{Symbol, TraderId};
use crate::numeric::{Price, Quantity};
use crate::errors::AccountError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A simulated trader's cash and portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderAccount {
    pub trader_id: TraderId,
    cash: Decimal,
    holdings: BTreeMap<Symbol, u64>,
    /// Bumped on every committed mutation
    version: u64,
}

impl TraderAccount {
    /// Create an account with an opening cash balance
    pub fn new(trader_id: TraderId, initial_cash: Decimal) -> Result<Self, AccountError> {
        if initial_cash < Decimal::ZERO {
            return Err(AccountError::InvalidAmount(format!(
                "initial cash must be non-negative, got {initial_cash}"
            )));
        }

        Ok(Self {
            trader_id,
            cash: initial_cash,
            holdings: BTreeMap::new(),
            version: 0,
        })
    }

    /// Seed a holding at creation time
    pub fn with_holding(mut self, symbol: Symbol, shares: u64) -> Result<Self, AccountError> {
        self.add_shares(&symbol, shares)?;
        Ok(self)
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn holdings(&self) -> &BTreeMap<Symbol, u64> {
        &self.holdings
    }

    /// Shares held of `symbol` (absence = zero)
    pub fn shares_of(&self, symbol: &Symbol) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Whether the cash balance covers `quantity` shares at `price`
    pub fn can_cover_buy(&self, quantity: Quantity, price: Price) -> bool {
        quantity.notional(price).is_some_and(|required| self.cash >= required)
    }

    /// Whether the holdings cover selling `quantity` shares of `symbol`
    pub fn can_cover_sell(&self, symbol: &Symbol, quantity: Quantity) -> bool {
        self.shares_of(symbol) >= quantity.value()
    }

    /// Add cash
    pub fn credit_cash(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount < Decimal::ZERO {
            return Err(AccountError::InvalidAmount(format!(
                "credit must be non-negative, got {amount}"
            )));
        }

        self.cash = self.cash.checked_add(amount).ok_or_else(|| {
            AccountError::InvalidAmount(format!("credit of {amount} overflows the cash balance"))
        })?;
        self.version += 1;
        Ok(())
    }

    /// Remove cash, failing without mutation if the balance is short
    pub fn debit_cash(&mut self, amount: Decimal) -> Result<(), AccountError> {
        if amount < Decimal::ZERO {
            return Err(AccountError::InvalidAmount(format!(
                "debit must be non-negative, got {amount}"
            )));
        }
        if self.cash < amount {
            return Err(AccountError::InsufficientFunds {
                trader_id: self.trader_id,
                required: amount,
                available: self.cash,
            });
        }

        self.cash -= amount;
        self.version += 1;
        Ok(())
    }

    /// Add shares of `symbol`
    pub fn add_shares(&mut self, symbol: &Symbol, shares: u64) -> Result<(), AccountError> {
        if shares == 0 {
            return Err(AccountError::InvalidAmount(
                "share quantity to add must be greater than zero".to_string(),
            ));
        }

        let held = self.shares_of(symbol);
        let total = held.checked_add(shares).ok_or_else(|| {
            AccountError::InvalidAmount(format!(
                "holding {held} of {symbol} cannot take {shares} more shares"
            ))
        })?;
        self.holdings.insert(symbol.clone(), total);
        self.version += 1;
        Ok(())
    }

    /// Remove shares of `symbol`, dropping the entry when it reaches zero
    pub fn remove_shares(&mut self, symbol: &Symbol, shares: u64) -> Result<(), AccountError> {
        if shares == 0 {
            return Err(AccountError::InvalidAmount(
                "share quantity to remove must be greater than zero".to_string(),
            ));
        }

        let held = self.shares_of(symbol);
        if held < shares {
            return Err(AccountError::InsufficientShares {
                trader_id: self.trader_id,
                symbol: symbol.clone(),
                required: shares,
                held,
            });
        }

        if held == shares {
            self.holdings.remove(symbol);
        } else {
            self.holdings.insert(symbol.clone(), held - shares);
        }
        self.version += 1;
        Ok(())
    }

    /// Check account invariants
    pub fn check_invariant(&self) -> bool {
        self.cash >= Decimal::ZERO && self.holdings.values().all(|&shares| shares > 0)
    }

    /// Market value of all holdings at `prices`
    ///
    /// Every held symbol must be priced.
    pub fn portfolio_value(&self, prices: &BTreeMap<Symbol, Decimal>) -> Result<Decimal, AccountError> {
        self.holdings.iter().try_fold(Decimal::ZERO, |total, (symbol, &shares)| {
            let price = prices
                .get(symbol)
                .ok_or_else(|| AccountError::MissingPrice { symbol: symbol.clone() })?;
            price
                .checked_mul(Decimal::from(shares))
                .and_then(|value| total.checked_add(value))
                .ok_or_else(|| {
                    AccountError::InvalidAmount(format!("portfolio value of {symbol} overflows"))
                })
        })
    }

    /// Cash, portfolio value and net worth at `prices`
    pub fn summary(&self, prices: &BTreeMap<Symbol, Decimal>) -> Result<TraderSummary, AccountError> {
        let portfolio_value = self.portfolio_value(prices)?;
        let net_worth = self
            .cash
            .checked_add(portfolio_value)
            .ok_or_else(|| AccountError::InvalidAmount("net worth overflows".to_string()))?;
        Ok(TraderSummary {
            trader_id: self.trader_id,
            cash: self.cash,
            portfolio_value,
            net_worth,
            holdings: self.holdings.clone(),
        })
    }

    /// Read-only copy for display and export
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            trader_id: self.trader_id,
            cash: self.cash,
            holdings: self.holdings.clone(),
        }
    }
}

/// Profit and loss between two valuations
pub fn pnl(initial_value: Decimal, current_value: Decimal) -> Decimal {
    current_value - initial_value
}

/// Point-in-time view of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub trader_id: TraderId,
    pub cash: Decimal,
    pub holdings: BTreeMap<Symbol, u64>,
}

/// Valuation of an account at a set of mark prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderSummary {
    pub trader_id: TraderId,
    pub cash: Decimal,
    pub portfolio_value: Decimal,
    pub net_worth: Decimal,
    pub holdings: BTreeMap<Symbol, u64>,
}
