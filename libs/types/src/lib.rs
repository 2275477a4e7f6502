//! Types library for the equities market simulator
//!
//! Core type definitions shared by the order book, the matching engine and
//! clearing. Everything here is deterministic: identifiers are plain integers
//! and all money uses fixed-point decimals.
//!
//! # Modules
//! - `ids`: Identifiers (TraderId, OrderId, Symbol)
//! - `numeric`: Fixed-point price and integer share quantity
//! - `order`: Limit orders and their validating constructor
//! - `trade`: Trade records produced by matching
//! - `account`: Trader cash and share holdings
//! - `fee`: Proportional transaction fee schedule
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod account;
pub mod fee;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::account::*;
    pub use crate::fee::*;
    pub use crate::errors::*;
}
