//! Matching Engine Service
//!
//! Order books and the price-time priority matching pass for the equities
//! market simulator.
//!
//! A pass repeatedly crosses the best buy against the best sell of each
//! symbol's book, emitting one trade per match at the sell order's price,
//! until a side is empty or the best prices no longer cross.
//!
//! **Key Invariants:**
//! - Price-time priority strictly enforced (price, then order id)
//! - Deterministic matching (same inputs → same outputs)
//! - One book per symbol; symbols never cross
//! - Conservation of quantity
//! - No account mutation; trades are handed to clearing

pub mod book;
pub mod matching;
pub mod engine;

pub use book::OrderBook;
pub use engine::{MatchingEngine, OrderBookSnapshot};
