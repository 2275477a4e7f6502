//! Crossing detection logic
//!
//! Determines when a bid and ask can match and at what price

use types::numeric::Price;

/// Check if a bid and ask can match at given prices
///
/// For a buy order to match with a sell order the buy price must be >= the
/// sell price. Anything else halts the pass.
pub fn can_match(bid_price: Price, ask_price: Price) -> bool {
    bid_price >= ask_price
}

/// Execution price of a crossed pair
///
/// Always the sell order's limit price (maker-price convention), never a
/// mid-price.
pub fn execution_price(_bid_price: Price, ask_price: Price) -> Price {
    ask_price
}
