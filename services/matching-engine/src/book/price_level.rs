//! Price level holding every resting order at one price
//!
//! Orders at a level are kept ordered by order id. Ids are issued in
//! submission order, so this is time priority, and it stays a total order
//! even if a caller inserts ids out of sequence.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::Order;

/// A price level containing orders at a specific price
///
/// Owns its orders for as long as they rest in the book.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Orders keyed by id (lowest id = highest priority)
    orders: BTreeMap<OrderId, Order>,
    /// Total open quantity at this level
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Insert an order at its priority position
    ///
    /// The level total saturates at `u64::MAX`; it is a display aggregate.
    pub fn insert(&mut self, order: Order) {
        self.total_quantity = self.total_quantity.saturating_add(order.quantity);
        self.orders.insert(order.order_id, order);
    }

    /// Remove an order by OrderId
    ///
    /// Returns the removed order, or None if not found
    pub fn remove(&mut self, order_id: &OrderId) -> Option<Order> {
        let order = self.orders.remove(order_id)?;
        self.total_quantity = self
            .total_quantity
            .checked_sub(order.quantity)
            .unwrap_or(Quantity::zero());
        Some(order)
    }

    /// Look up an order by id
    pub fn get(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Peek at the highest-priority order without removing it
    pub fn peek_front(&self) -> Option<&Order> {
        self.orders.values().next()
    }

    /// Fill the front order by `quantity`
    ///
    /// If the order's open quantity reaches zero it is removed and returned.
    pub fn fill_front(&mut self, quantity: Quantity) -> Option<Order> {
        let mut entry = self.orders.first_entry()?;
        entry.get_mut().fill(quantity);
        self.total_quantity = self
            .total_quantity
            .checked_sub(quantity)
            .unwrap_or(Quantity::zero());

        if entry.get().is_filled() {
            Some(entry.remove())
        } else {
            None
        }
    }

    /// Orders in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Check if the price level is empty
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the total quantity at this price level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{Symbol, TraderId};
    use types::numeric::Price;
    use types::order::{OrderStatus, Side};

    fn order(id: u64, qty: u64) -> Order {
        Order::new(
            OrderId::new(id),
            TraderId::new(1),
            Side::BUY,
            Symbol::new("X"),
            Quantity::new(qty),
            Price::from_u64(50),
        )
    }

    #[test]
    fn test_price_level_insert() {
        let mut level = PriceLevel::new();
        level.insert(order(1, 15));

        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(15));
        assert!(!level.is_empty());
    }

    #[test]
    fn test_price_level_id_order() {
        let mut level = PriceLevel::new();
        level.insert(order(3, 3));
        level.insert(order(1, 1));
        level.insert(order(2, 2));

        // Lowest id is at the front regardless of insertion order
        let front = level.peek_front().unwrap();
        assert_eq!(front.order_id, OrderId::new(1));

        let ids: Vec<u64> = level.iter().map(|o| o.order_id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_price_level_remove() {
        let mut level = PriceLevel::new();
        level.insert(order(1, 10));
        level.insert(order(2, 20));

        let removed = level.remove(&OrderId::new(1)).unwrap();
        assert_eq!(removed.quantity, Quantity::new(10));
        assert_eq!(level.order_count(), 1);
        assert_eq!(level.total_quantity(), Quantity::new(20));
        assert!(level.remove(&OrderId::new(1)).is_none());
    }

    #[test]
    fn test_price_level_fill_front() {
        let mut level = PriceLevel::new();
        level.insert(order(1, 5));

        // Partial fill keeps the order resting
        assert!(level.fill_front(Quantity::new(3)).is_none());
        assert_eq!(level.total_quantity(), Quantity::new(2));
        let front = level.peek_front().unwrap();
        assert_eq!(front.quantity, Quantity::new(2));
        assert_eq!(front.status, OrderStatus::Partial);

        // Complete fill removes it
        let filled = level.fill_front(Quantity::new(2)).unwrap();
        assert_eq!(filled.status, OrderStatus::Filled);
        assert!(level.is_empty());
        assert_eq!(level.total_quantity(), Quantity::zero());
    }

    #[test]
    fn test_price_level_total_quantity_invariant() {
        let mut level = PriceLevel::new();
        level.insert(order(1, 15));
        level.insert(order(2, 25));
        level.insert(order(3, 30));

        let sum: u64 = level.iter().map(|o| o.quantity.value()).sum();
        assert_eq!(level.total_quantity(), Quantity::new(sum));
        assert_eq!(level.total_quantity(), Quantity::new(70));
    }

    #[test]
    fn test_price_level_total_saturates() {
        let mut level = PriceLevel::new();
        level.insert(order(1, u64::MAX));
        level.insert(order(2, 5));

        assert_eq!(level.total_quantity(), Quantity::new(u64::MAX));
        assert_eq!(level.order_count(), 2);
        assert_eq!(level.peek_front().unwrap().order_id, OrderId::new(1));
    }
}
