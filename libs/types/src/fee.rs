//! Transaction fee schedule
//!
//! Both sides of a trade pay the same proportional fee on the trade value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default fee in percent of trade value (0.1%)
pub const DEFAULT_FEE_PERCENT: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Proportional fee charged to each party of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee in percent, e.g. 0.1 means 0.1% of trade value
    pub fee_percent: Decimal,
}

impl FeeSchedule {
    /// Create a schedule, returning None outside [0, 100]
    pub fn new(fee_percent: Decimal) -> Option<Self> {
        if fee_percent < Decimal::ZERO || fee_percent > Decimal::ONE_HUNDRED {
            None
        } else {
            Some(Self { fee_percent })
        }
    }

    /// Fraction of trade value charged (percent / 100)
    pub fn rate(&self) -> Decimal {
        self.fee_percent / Decimal::ONE_HUNDRED
    }

    /// Fee owed by one party on a trade of `trade_value`
    pub fn fee_for(&self, trade_value: Decimal) -> Decimal {
        trade_value * self.rate()
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fee_percent: DEFAULT_FEE_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee_percent() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.fee_percent, Decimal::new(1, 1));
        assert_eq!(schedule.rate(), Decimal::new(1, 3));
    }

    #[test]
    fn test_fee_calculation() {
        let schedule = FeeSchedule::default();
        // 240 * 0.001 = 0.24
        assert_eq!(schedule.fee_for(Decimal::from(240)), Decimal::new(24, 2));
    }

    #[test]
    fn test_zero_fee() {
        let schedule = FeeSchedule::new(Decimal::ZERO).unwrap();
        assert_eq!(schedule.fee_for(Decimal::from(1_000_000)), Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(FeeSchedule::new(Decimal::from(-1)).is_none());
        assert!(FeeSchedule::new(Decimal::from(101)).is_none());
        assert!(FeeSchedule::new(Decimal::ONE_HUNDRED).is_some());
    }

    #[test]
    fn test_schedule_deserialization() {
        let schedule: FeeSchedule = serde_json::from_str(r#"{"fee_percent":"0.25"}"#).unwrap();
        assert_eq!(schedule.fee_percent, Decimal::new(25, 2));
    }
}
