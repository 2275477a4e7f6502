//! Order id generator
//!
//! Ids are issued from one strictly increasing counter, so a smaller id
//! always means an earlier submission. The book relies on this for time
//! priority among orders at the same price.

use types::ids::OrderId;

/// Monotonic source of order ids
#[derive(Debug, Clone)]
pub struct OrderIdGenerator {
    next: u64,
}

impl OrderIdGenerator {
    /// Start issuing at `first`
    pub fn new(first: u64) -> Self {
        Self { next: first }
    }

    /// Issue the next id
    pub fn next_id(&mut self) -> OrderId {
        let id = OrderId::new(self.next);
        self.next += 1;
        id
    }

    /// Id the next call to `next_id` will return
    pub fn peek(&self) -> OrderId {
        OrderId::new(self.next)
    }
}

impl Default for OrderIdGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
