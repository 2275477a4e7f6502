//! Exchange Service
//!
//! Single-threaded facade over the order books, the matching pass and
//! clearing, for a simulation driver to call once per step:
//!
//! 1. `submit_order` / `cancel_order` any number of times
//! 2. `run_matching_pass` to cross the books
//! 3. `settle_batch` on the returned trades
//!
//! `step` runs 2 and 3 back to back and then moves the mark prices.
//! Nothing here draws random numbers; the same submissions always give
//! the same trades and balances.

pub mod config;
pub mod exchange;
pub mod id_generator;
pub mod logging;
pub mod marks;
pub mod stats;

pub use config::{ConfigError, ExchangeConfig};
pub use exchange::{Exchange, MarketSnapshot, StepReport};
pub use marks::MarkPrices;
