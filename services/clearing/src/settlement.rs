//! Clearing and settlement of trades
//!
//! A trade settles in two steps:
//! 1. Principal: buyer pays `quantity × price` and receives the shares,
//!    seller receives the cash and gives up the shares. Preconditions are
//!    re-checked here (submission-time checks were advisory), and the
//!    transfer is all-or-nothing.
//! 2. Fees: each party is charged `trade_value × fee_percent / 100` from its
//!    post-trade cash. A party that cannot pay is skipped; the principal is
//!    never reversed.
//!
//! Collected fees leave the system. No fee account is modeled.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use types::errors::{AccountError, SettlementError};
use types::fee::FeeSchedule;
use types::ids::TraderId;
use types::trade::Trade;

use crate::ledger::AccountLedger;

/// Result of charging one party's fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeOutcome {
    /// Fee debited from the trader's cash
    Collected { amount: Decimal },
    /// Post-trade cash did not cover the fee; nothing was charged
    Skipped { required: Decimal, available: Decimal },
}

impl FeeOutcome {
    /// Amount actually collected (zero when skipped)
    pub fn collected(&self) -> Decimal {
        match self {
            FeeOutcome::Collected { amount } => *amount,
            FeeOutcome::Skipped { .. } => Decimal::ZERO,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FeeOutcome::Skipped { .. })
    }
}

/// Outcome of one successfully settled trade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementReceipt {
    pub sequence: u64,
    pub trade_value: Decimal,
    pub buyer_fee: FeeOutcome,
    pub seller_fee: FeeOutcome,
}

impl SettlementReceipt {
    /// Buyer fee plus seller fee actually collected
    pub fn fees_collected(&self) -> Decimal {
        self.buyer_fee.collected() + self.seller_fee.collected()
    }
}

/// A trade that could not be settled
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementFailure {
    pub sequence: u64,
    pub error: SettlementError,
}

/// Outcome of settling a batch of trades
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    /// Sum of every fee collected in the batch
    pub total_fees_collected: Decimal,
    /// Settled trades, in input order
    pub receipts: Vec<SettlementReceipt>,
    /// Skipped trades, in input order
    pub failures: Vec<SettlementFailure>,
}

impl BatchReport {
    pub fn settled_count(&self) -> usize {
        self.receipts.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of individual fees that were skipped
    pub fn skipped_fee_count(&self) -> usize {
        self.receipts
            .iter()
            .flat_map(|r| [r.buyer_fee, r.seller_fee])
            .filter(FeeOutcome::is_skipped)
            .count()
    }
}

/// Settles trades against an account ledger
#[derive(Debug, Clone, Default)]
pub struct ClearingHouse {
    fees: FeeSchedule,
}

impl ClearingHouse {
    pub fn new(fees: FeeSchedule) -> Self {
        Self { fees }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }

    /// Settle a single trade
    ///
    /// On error nothing in the ledger has changed.
    pub fn settle(
        &self,
        ledger: &mut AccountLedger,
        trade: &Trade,
    ) -> Result<SettlementReceipt, SettlementError> {
        if trade.quantity.is_zero() {
            return Err(SettlementError::InvalidTrade(format!(
                "trade {} has zero quantity",
                trade.sequence
            )));
        }

        let trade_value = trade.trade_value().ok_or_else(|| {
            SettlementError::InvalidTrade(format!(
                "trade {} value of {} shares at {} is out of range",
                trade.sequence, trade.quantity, trade.price
            ))
        })?;
        Self::transfer_principal(ledger, trade, trade_value)?;

        let fee = self.fees.fee_for(trade_value);
        let buyer_fee = Self::collect_fee(ledger, trade.buyer_id, fee);
        let seller_fee = Self::collect_fee(ledger, trade.seller_id, fee);

        debug!(
            sequence = trade.sequence,
            symbol = %trade.symbol,
            trade_value = %trade_value,
            buyer_fee = %buyer_fee.collected(),
            seller_fee = %seller_fee.collected(),
            "Trade settled"
        );

        Ok(SettlementReceipt {
            sequence: trade.sequence,
            trade_value,
            buyer_fee,
            seller_fee,
        })
    }

    /// Settle every trade in order
    ///
    /// A failed trade is recorded and skipped; it never stops the batch.
    pub fn settle_batch(&self, ledger: &mut AccountLedger, trades: &[Trade]) -> BatchReport {
        let mut report = BatchReport::default();

        for trade in trades {
            match self.settle(ledger, trade) {
                Ok(receipt) => {
                    report.total_fees_collected += receipt.fees_collected();
                    report.receipts.push(receipt);
                }
                Err(error) => {
                    warn!(
                        sequence = trade.sequence,
                        symbol = %trade.symbol,
                        buyer_id = %trade.buyer_id,
                        seller_id = %trade.seller_id,
                        error = %error,
                        "Settlement skipped"
                    );
                    report.failures.push(SettlementFailure {
                        sequence: trade.sequence,
                        error,
                    });
                }
            }
        }

        info!(
            trades = trades.len(),
            settled = report.settled_count(),
            failed = report.failed_count(),
            total_fees = %report.total_fees_collected,
            "Settlement batch complete"
        );
        report
    }

    /// Check both parties, then move cash and shares in one commit
    fn transfer_principal(
        ledger: &mut AccountLedger,
        trade: &Trade,
        trade_value: Decimal,
    ) -> Result<(), SettlementError> {
        let buyer = ledger
            .get(&trade.buyer_id)
            .ok_or(SettlementError::UnknownTrader { trader_id: trade.buyer_id })?;
        let seller = ledger
            .get(&trade.seller_id)
            .ok_or(SettlementError::UnknownTrader { trader_id: trade.seller_id })?;

        if buyer.cash() < trade_value {
            return Err(SettlementError::InsufficientFunds {
                trader_id: trade.buyer_id,
                required: trade_value,
                available: buyer.cash(),
            });
        }
        let held = seller.shares_of(&trade.symbol);
        if held < trade.quantity.value() {
            return Err(SettlementError::InsufficientShares {
                trader_id: trade.seller_id,
                symbol: trade.symbol.clone(),
                required: trade.quantity.value(),
                held,
            });
        }

        let shares = trade.quantity.value();
        if trade.is_self_trade() {
            // Same account on both sides: debit then credit, remove then add.
            let mut account = buyer.clone();
            account.debit_cash(trade_value).map_err(settlement_error)?;
            account.credit_cash(trade_value).map_err(settlement_error)?;
            account.remove_shares(&trade.symbol, shares).map_err(settlement_error)?;
            account.add_shares(&trade.symbol, shares).map_err(settlement_error)?;
            ledger.commit(account);
            return Ok(());
        }

        let mut buyer = buyer.clone();
        let mut seller = seller.clone();
        buyer.debit_cash(trade_value).map_err(settlement_error)?;
        buyer.add_shares(&trade.symbol, shares).map_err(settlement_error)?;
        seller.credit_cash(trade_value).map_err(settlement_error)?;
        seller.remove_shares(&trade.symbol, shares).map_err(settlement_error)?;

        ledger.commit(buyer);
        ledger.commit(seller);
        Ok(())
    }

    /// Debit `fee` from the trader's post-trade cash, or skip it
    fn collect_fee(ledger: &mut AccountLedger, trader_id: TraderId, fee: Decimal) -> FeeOutcome {
        let Some(account) = ledger.get_mut(&trader_id) else {
            return FeeOutcome::Skipped {
                required: fee,
                available: Decimal::ZERO,
            };
        };

        let available = account.cash();
        match account.debit_cash(fee) {
            Ok(()) => FeeOutcome::Collected { amount: fee },
            Err(error) => {
                warn!(
                    trader_id = %trader_id,
                    fee = %fee,
                    available = %available,
                    error = %error,
                    "Transaction fee skipped"
                );
                FeeOutcome::Skipped {
                    required: fee,
                    available,
                }
            }
        }
    }
}

/// Map an account mutation failure onto the settlement taxonomy
fn settlement_error(error: AccountError) -> SettlementError {
    match error {
        AccountError::InsufficientFunds {
            trader_id,
            required,
            available,
        } => SettlementError::InsufficientFunds {
            trader_id,
            required,
            available,
        },
        AccountError::InsufficientShares {
            trader_id,
            symbol,
            required,
            held,
        } => SettlementError::InsufficientShares {
            trader_id,
            symbol,
            required,
            held,
        },
        AccountError::UnknownTrader { trader_id } => SettlementError::UnknownTrader { trader_id },
        other => SettlementError::InvalidTrade(other.to_string()),
    }
}
