//! Per-symbol trade statistics

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use types::ids::Symbol;
use types::trade::Trade;

/// Volume and volume-weighted average price of one symbol's trades
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolTradeStats {
    pub trade_count: usize,
    pub total_volume: u64,
    pub total_value: Decimal,
    pub average_price: Decimal,
}

/// Shares traded across all symbols
pub fn total_trade_volume(trades: &[Trade]) -> u64 {
    trades
        .iter()
        .fold(0u64, |total, t| total.saturating_add(t.quantity.value()))
}

/// Volume-weighted average price of `symbol`, or None if it never traded
pub fn average_trade_price(trades: &[Trade], symbol: &Symbol) -> Option<Decimal> {
    summarize_trades(trades).remove(symbol).map(|s| s.average_price)
}

/// Group trades by symbol
///
/// Values saturate at `Decimal::MAX` rather than overflow.
pub fn summarize_trades(trades: &[Trade]) -> BTreeMap<Symbol, SymbolTradeStats> {
    let mut summary: BTreeMap<Symbol, SymbolTradeStats> = BTreeMap::new();

    for trade in trades {
        let stats = summary
            .entry(trade.symbol.clone())
            .or_insert_with(|| SymbolTradeStats {
                trade_count: 0,
                total_volume: 0,
                total_value: Decimal::ZERO,
                average_price: Decimal::ZERO,
            });
        stats.trade_count += 1;
        stats.total_volume = stats.total_volume.saturating_add(trade.quantity.value());
        let value = trade.trade_value().unwrap_or(Decimal::MAX);
        stats.total_value = stats.total_value.saturating_add(value);
    }

    for stats in summary.values_mut() {
        if stats.total_volume > 0 {
            stats.average_price = stats.total_value / Decimal::from(stats.total_volume);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{OrderId, TraderId};
    use types::numeric::{Price, Quantity};

    fn trade(symbol: &str, qty: u64, price: u64) -> Trade {
        Trade {
            sequence: 1,
            symbol: Symbol::new(symbol),
            buy_order_id: OrderId::new(1),
            sell_order_id: OrderId::new(2),
            buyer_id: TraderId::new(1),
            seller_id: TraderId::new(2),
            quantity: Quantity::new(qty),
            price: Price::from_u64(price),
        }
    }

    #[test]
    fn test_summary() {
        let trades = vec![trade("X", 1, 10), trade("Y", 4, 5), trade("X", 3, 14)];
        let summary = summarize_trades(&trades);

        let x = &summary[&Symbol::new("X")];
        assert_eq!(x.trade_count, 2);
        assert_eq!(x.total_volume, 4);
        assert_eq!(x.total_value, Decimal::from(52));
        assert_eq!(x.average_price, Decimal::from(13));

        assert_eq!(total_trade_volume(&trades), 8);
        assert_eq!(average_trade_price(&trades, &Symbol::new("Y")), Some(Decimal::from(5)));
        assert_eq!(average_trade_price(&trades, &Symbol::new("Z")), None);
    }

    #[test]
    fn test_empty() {
        assert!(summarize_trades(&[]).is_empty());
        assert_eq!(total_trade_volume(&[]), 0);
    }
}
