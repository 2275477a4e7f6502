//! Clearing & Settlement Service
//!
//! Applies matched trades to trader accounts: the principal moves
//! atomically between buyer and seller, then each party pays the
//! transaction fee from its post-trade cash.
//!
//! **Key Invariants:**
//! - A trade either fully settles or leaves every account untouched
//! - Cash and share balances never go negative
//! - Shares are conserved; total cash only falls by the fees collected
//! - A failed trade or fee never stops the rest of a batch

pub mod ledger;
pub mod settlement;

pub use ledger::AccountLedger;
pub use settlement::{BatchReport, ClearingHouse, FeeOutcome, SettlementFailure, SettlementReceipt};
