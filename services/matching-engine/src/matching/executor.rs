//! Trade execution logic
//!
//! Turns a crossed buy/sell pair into a sequenced trade record. Fees and
//! account movements belong to clearing, not here.

use types::numeric::{Price, Quantity};
use types::order::Order;
use types::trade::Trade;

/// Match executor for handling trade generation
#[derive(Debug, Clone)]
pub struct MatchExecutor {
    sequence_counter: u64,
}

impl MatchExecutor {
    /// Create a new match executor with starting sequence number
    pub fn new(starting_sequence: u64) -> Self {
        Self {
            sequence_counter: starting_sequence,
        }
    }

    /// Get next sequence number (monotonically increasing)
    fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence_counter;
        self.sequence_counter += 1;
        seq
    }

    /// Sequence number the next trade will carry
    pub fn peek_sequence(&self) -> u64 {
        self.sequence_counter
    }

    /// Build the trade for `quantity` shares between `buy` and `sell`
    ///
    /// The symbol is taken from the buy order; both orders come from the
    /// same per-symbol book.
    pub fn execute_trade(&mut self, buy: &Order, sell: &Order, price: Price, quantity: Quantity) -> Trade {
        debug_assert_eq!(buy.symbol, sell.symbol, "cross-symbol match");
        debug_assert!(!quantity.is_zero(), "zero-quantity trade");

        Trade {
            sequence: self.next_sequence(),
            symbol: buy.symbol.clone(),
            buy_order_id: buy.order_id,
            sell_order_id: sell.order_id,
            buyer_id: buy.trader_id,
            seller_id: sell.trader_id,
            quantity,
            price,
        }
    }
}

impl Default for MatchExecutor {
    fn default() -> Self {
        Self::new(1)
    }
}
