//! Identifier types for market entities
//!
//! Order ids are plain integers issued in submission order, so comparing two
//! ids is the deterministic time-priority tie-break used by the book.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order
///
/// Ordering is numeric. The facade issues ids monotonically, so a smaller id
/// always means an earlier submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Create from a raw sequence value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw sequence value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O-{}", self.0)
    }
}

/// Unique identifier for a trader account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraderId(u64);

impl TraderId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TraderId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Stock ticker symbol (e.g. "AAPL", "MSFT")
///
/// Stored uppercase. Must be non-empty and contain no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol from a string
    ///
    /// # Panics
    /// Panics if the ticker is empty or contains whitespace
    pub fn new(ticker: impl Into<String>) -> Self {
        Self::try_new(ticker).expect("Symbol must be a non-empty ticker without whitespace")
    }

    /// Try to create a Symbol, returning None if invalid
    pub fn try_new(ticker: impl Into<String>) -> Option<Self> {
        let s = ticker.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            None
        } else {
            Some(Self(s.to_uppercase()))
        }
    }

    /// Get the ticker string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
