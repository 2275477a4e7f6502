//! Error types for the market core
//!
//! Comprehensive error taxonomy using thiserror. None of these are fatal:
//! each one is local to a single order, trade or account operation.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ids::{Symbol, TraderId};

/// Top-level error for callers that want a single type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Settlement error: {0}")]
    Settlement(#[from] SettlementError),

    #[error("Account error: {0}")]
    Account(#[from] AccountError),
}

/// Submission-time validation failures
///
/// An order rejected with one of these never enters the book.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Trader {trader_id} cannot cover buy: required {required}, available {available}")]
    InsufficientFunds {
        trader_id: TraderId,
        required: Decimal,
        available: Decimal,
    },

    #[error("Trader {trader_id} cannot cover sell of {symbol}: required {required}, held {held}")]
    InsufficientShares {
        trader_id: TraderId,
        symbol: Symbol,
        required: u64,
        held: u64,
    },

    #[error("Unknown trader: {trader_id}")]
    UnknownTrader { trader_id: TraderId },
}

/// Settlement-time precondition failures
///
/// The trade is skipped as a whole; the batch carries on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettlementError {
    #[error("Buyer {trader_id} has insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        trader_id: TraderId,
        required: Decimal,
        available: Decimal,
    },

    #[error("Seller {trader_id} has insufficient shares of {symbol}: required {required}, held {held}")]
    InsufficientShares {
        trader_id: TraderId,
        symbol: Symbol,
        required: u64,
        held: u64,
    },

    #[error("Unknown trader: {trader_id}")]
    UnknownTrader { trader_id: TraderId },

    #[error("Invalid trade: {0}")]
    InvalidTrade(String),
}

/// Account mutation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccountError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient cash for trader {trader_id}: required {required}, available {available}")]
    InsufficientFunds {
        trader_id: TraderId,
        required: Decimal,
        available: Decimal,
    },

    #[error("Insufficient shares of {symbol} for trader {trader_id}: required {required}, held {held}")]
    InsufficientShares {
        trader_id: TraderId,
        symbol: Symbol,
        required: u64,
        held: u64,
    },

    #[error("No price available for {symbol}")]
    MissingPrice { symbol: Symbol },

    #[error("Trader already registered: {trader_id}")]
    DuplicateTrader { trader_id: TraderId },

    #[error("Unknown trader: {trader_id}")]
    UnknownTrader { trader_id: TraderId },
}
