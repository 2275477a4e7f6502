//! Exchange configuration
//!
//! Every field has a default, so `{}` is a complete config. Decimals are
//! written as strings, e.g. `{"fee_percent": "0.25"}`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use types::fee::{FeeSchedule, DEFAULT_FEE_PERCENT};
use types::ids::Symbol;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("fee_percent must be within [0, 100], got {0}")]
    InvalidFeePercent(Decimal),

    #[error("first_order_id must be greater than zero")]
    InvalidFirstOrderId,

    #[error("mark_price_weight must be within [0, 1], got {0}")]
    InvalidMarkPriceWeight(Decimal),

    #[error("mark_price_floor must be non-negative, got {0}")]
    InvalidMarkPriceFloor(Decimal),

    #[error("Invalid symbol in initial_prices: {0:?}")]
    InvalidSymbol(String),

    #[error("Initial price for {symbol} must be positive, got {price}")]
    InvalidInitialPrice { symbol: String, price: Decimal },
}

fn default_first_order_id() -> u64 {
    1
}

fn default_mark_price_weight() -> Decimal {
    Decimal::new(1, 1)
}

fn default_mark_price_floor() -> Decimal {
    Decimal::ONE
}

/// Exchange configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Fee charged to each side, in percent of trade value
    pub fee_percent: Decimal,

    /// First order id issued
    pub first_order_id: u64,

    /// Fraction of the gap to the trade price a mark moves per trade
    pub mark_price_weight: Decimal,

    /// Marks never drop below this
    pub mark_price_floor: Decimal,

    /// Starting mark price per ticker
    pub initial_prices: BTreeMap<String, Decimal>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            fee_percent: DEFAULT_FEE_PERCENT,
            first_order_id: default_first_order_id(),
            mark_price_weight: default_mark_price_weight(),
            mark_price_floor: default_mark_price_floor(),
            initial_prices: BTreeMap::new(),
        }
    }
}

impl ExchangeConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn with_initial_price(mut self, ticker: &str, price: Decimal) -> Self {
        self.initial_prices.insert(ticker.to_string(), price);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fee_schedule()?;

        if self.first_order_id == 0 {
            return Err(ConfigError::InvalidFirstOrderId);
        }
        if self.mark_price_weight < Decimal::ZERO || self.mark_price_weight > Decimal::ONE {
            return Err(ConfigError::InvalidMarkPriceWeight(self.mark_price_weight));
        }
        if self.mark_price_floor < Decimal::ZERO {
            return Err(ConfigError::InvalidMarkPriceFloor(self.mark_price_floor));
        }

        self.initial_marks().map(|_| ())
    }

    pub fn fee_schedule(&self) -> Result<FeeSchedule, ConfigError> {
        FeeSchedule::new(self.fee_percent).ok_or(ConfigError::InvalidFeePercent(self.fee_percent))
    }

    /// Initial prices keyed by parsed symbol
    pub fn initial_marks(&self) -> Result<BTreeMap<Symbol, Decimal>, ConfigError> {
        self.initial_prices
            .iter()
            .map(|(ticker, &price)| {
                let symbol = Symbol::try_new(ticker.as_str())
                    .ok_or_else(|| ConfigError::InvalidSymbol(ticker.clone()))?;
                if price <= Decimal::ZERO {
                    return Err(ConfigError::InvalidInitialPrice {
                        symbol: ticker.clone(),
                        price,
                    });
                }
                Ok((symbol, price))
            })
            .collect()
    }
}
