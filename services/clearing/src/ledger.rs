//! Account ledger
//!
//! Registry of every trader account in a run. Accounts are opened once and
//! never closed; all balance changes go through `TraderAccount`'s validated
//! operations.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;
use types::account::{AccountSnapshot, TraderAccount};
use types::errors::AccountError;
use types::ids::{Symbol, TraderId};

/// All trader accounts, keyed by trader id
#[derive(Debug, Clone, Default)]
pub struct AccountLedger {
    accounts: BTreeMap<TraderId, TraderAccount>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Trader ids are unique.
    pub fn open_account(&mut self, account: TraderAccount) -> Result<(), AccountError> {
        if self.accounts.contains_key(&account.trader_id) {
            return Err(AccountError::DuplicateTrader {
                trader_id: account.trader_id,
            });
        }

        debug!(
            trader_id = %account.trader_id,
            cash = %account.cash(),
            holdings = account.holdings().len(),
            "Account opened"
        );
        self.accounts.insert(account.trader_id, account);
        Ok(())
    }

    pub fn get(&self, trader_id: &TraderId) -> Option<&TraderAccount> {
        self.accounts.get(trader_id)
    }

    pub fn get_mut(&mut self, trader_id: &TraderId) -> Option<&mut TraderAccount> {
        self.accounts.get_mut(trader_id)
    }

    pub fn contains(&self, trader_id: &TraderId) -> bool {
        self.accounts.contains_key(trader_id)
    }

    /// Swap in an updated copy of an existing account
    pub(crate) fn commit(&mut self, account: TraderAccount) {
        self.accounts.insert(account.trader_id, account);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraderAccount> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of cash across all accounts
    pub fn total_cash(&self) -> Decimal {
        self.accounts.values().map(TraderAccount::cash).sum()
    }

    /// Sum of shares of `symbol` across all accounts
    pub fn total_shares(&self, symbol: &Symbol) -> u64 {
        self.accounts.values().map(|account| account.shares_of(symbol)).sum()
    }

    /// Read-only copies of every account, in trader id order
    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        self.accounts.values().map(TraderAccount::snapshot).collect()
    }
}
