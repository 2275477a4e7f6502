//! Exchange facade
//!
//! Wires the matching engine, the account ledger and the clearing house
//! into the three strictly sequential phases of a simulation step:
//! order submission, one matching pass, then settlement of its trades.

use clearing::{AccountLedger, BatchReport, ClearingHouse};
use matching_engine::{MatchingEngine, OrderBookSnapshot};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use types::account::{AccountSnapshot, TraderAccount, TraderSummary};
use types::errors::{AccountError, OrderError};
use types::ids::{OrderId, Symbol, TraderId};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::config::{ConfigError, ExchangeConfig};
use crate::id_generator::OrderIdGenerator;
use crate::marks::MarkPrices;

/// Outcome of one simulation step
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Trades produced by the matching pass, in generation order
    pub trades: Vec<Trade>,
    pub settlement: BatchReport,
}

impl StepReport {
    pub fn total_fees_collected(&self) -> Decimal {
        self.settlement.total_fees_collected
    }
}

/// Resting orders plus trader balances, for display
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub books: Vec<OrderBookSnapshot>,
    pub accounts: Vec<AccountSnapshot>,
}

/// The market core behind a single-threaded simulation driver
#[derive(Debug)]
pub struct Exchange {
    engine: MatchingEngine,
    ledger: AccountLedger,
    clearing: ClearingHouse,
    order_ids: OrderIdGenerator,
    marks: MarkPrices,
}

impl Exchange {
    pub fn new(config: ExchangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let marks = MarkPrices::new(config.mark_price_weight, config.mark_price_floor)
            .with_prices(config.initial_marks()?);

        info!(
            fee_percent = %config.fee_percent,
            first_order_id = config.first_order_id,
            priced_symbols = marks.as_map().len(),
            "Exchange initialized"
        );

        Ok(Self {
            engine: MatchingEngine::new(1),
            ledger: AccountLedger::new(),
            clearing: ClearingHouse::new(config.fee_schedule()?),
            order_ids: OrderIdGenerator::new(config.first_order_id),
            marks,
        })
    }

    pub fn register_trader(&mut self, account: TraderAccount) -> Result<(), AccountError> {
        self.ledger.open_account(account)
    }

    /// Validate and rest a limit order
    ///
    /// The affordability check is advisory: nothing is reserved, and
    /// settlement checks again. A rejected order consumes no id.
    pub fn submit_order(
        &mut self,
        trader_id: TraderId,
        side: Side,
        symbol: &str,
        quantity: u64,
        price: Decimal,
    ) -> Result<OrderId, OrderError> {
        let result = self.validate_order(trader_id, side, symbol, quantity, price);

        match result {
            Ok(order) => {
                let order_id = self.order_ids.next_id();
                debug_assert_eq!(order.order_id, order_id);
                self.engine.insert(order);
                Ok(order_id)
            }
            Err(error) => {
                debug!(
                    trader_id = %trader_id,
                    side = %side,
                    symbol = symbol,
                    quantity = quantity,
                    price = %price,
                    error = %error,
                    "Order rejected"
                );
                Err(error)
            }
        }
    }

    fn validate_order(
        &self,
        trader_id: TraderId,
        side: Side,
        symbol: &str,
        quantity: u64,
        price: Decimal,
    ) -> Result<Order, OrderError> {
        let trader = self
            .ledger
            .get(&trader_id)
            .ok_or(OrderError::UnknownTrader { trader_id })?;
        let symbol =
            Symbol::try_new(symbol).ok_or_else(|| OrderError::InvalidSymbol(symbol.to_string()))?;

        Order::create(self.order_ids.peek(), trader, side, symbol, quantity, price)
    }

    /// Remove a resting order; false if no such order is resting
    pub fn cancel_order(&mut self, order_id: &OrderId) -> bool {
        self.engine.cancel_order(order_id)
    }

    pub fn run_matching_pass(&mut self) -> Vec<Trade> {
        self.engine.run_matching_pass()
    }

    /// Settle trades in order; failures are reported, not fatal
    pub fn settle_batch(&mut self, trades: &[Trade]) -> BatchReport {
        self.clearing.settle_batch(&mut self.ledger, trades)
    }

    /// Match, settle what matched, then move the marks
    pub fn step(&mut self) -> StepReport {
        let trades = self.run_matching_pass();
        let settlement = self.settle_batch(&trades);
        self.marks.apply_trades(&trades);

        info!(
            trades = trades.len(),
            settled = settlement.settled_count(),
            failed = settlement.failed_count(),
            fees = %settlement.total_fees_collected,
            resting_orders = self.engine.order_count(),
            "Step complete"
        );

        StepReport { trades, settlement }
    }

    pub fn order_book(&self, symbol: &Symbol, depth: usize) -> Option<OrderBookSnapshot> {
        self.engine.get_order_book(symbol, depth)
    }

    pub fn open_orders(&self, symbol: &Symbol, side: Side) -> Vec<&Order> {
        self.engine.open_orders(symbol, side)
    }

    pub fn lookup_order(&self, order_id: &OrderId) -> Option<&Order> {
        self.engine.lookup(order_id)
    }

    pub fn account(&self, trader_id: &TraderId) -> Option<&TraderAccount> {
        self.ledger.get(trader_id)
    }

    pub fn accounts(&self) -> Vec<AccountSnapshot> {
        self.ledger.snapshot()
    }

    /// Cash across all accounts; falls by exactly the fees collected
    pub fn total_cash(&self) -> Decimal {
        self.ledger.total_cash()
    }

    pub fn mark_price(&self, symbol: &Symbol) -> Option<Decimal> {
        self.marks.get(symbol)
    }

    pub fn set_mark_price(&mut self, symbol: Symbol, price: Decimal) {
        self.marks.set(symbol, price);
    }

    pub fn marks(&self) -> &MarkPrices {
        &self.marks
    }

    /// Cash, holdings and net worth at current marks
    pub fn trader_summary(&self, trader_id: &TraderId) -> Result<TraderSummary, AccountError> {
        self.ledger
            .get(trader_id)
            .ok_or(AccountError::UnknownTrader { trader_id: *trader_id })?
            .summary(self.marks.as_map())
    }

    /// Full depth of every book plus all balances
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            books: self
                .engine
                .symbols()
                .filter_map(|symbol| self.engine.get_order_book(symbol, usize::MAX))
                .collect(),
            accounts: self.accounts(),
        }
    }

    pub fn fee_percent(&self) -> Decimal {
        self.clearing.fee_schedule().fee_percent
    }
}
