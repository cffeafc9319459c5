//! Rate — one bid/ask quote for a currency pair.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CurrencyPair;
use crate::error::{EngineError, EngineResult};

/// A single quote. Immutable; a new `Rate` is produced per tick.
///
/// `ask >= bid` is expected but not enforced by the type. Use
/// [`Rate::validate`] at the feed boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    pub pair: Arc<CurrencyPair>,
    pub ask: i64,
    pub bid: i64,
    pub timestamp: DateTime<Utc>,
}

impl Rate {
    pub fn new(pair: Arc<CurrencyPair>, ask: i64, bid: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            pair,
            ask,
            bid,
            timestamp,
        }
    }

    pub fn spread(&self) -> i64 {
        self.ask - self.bid
    }

    pub fn mid(&self) -> i64 {
        (self.ask + self.bid) / 2
    }

    /// True while the spread is no wider than the pair's threshold.
    pub fn is_tradable_spread(&self) -> bool {
        self.spread() <= self.pair.min_spread
    }

    /// Basic quote sanity: positive prices, not crossed.
    pub fn validate(&self) -> EngineResult<()> {
        if self.ask <= 0 || self.bid <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "{} quote at {} has non-positive price (ask {}, bid {})",
                self.pair.name, self.timestamp, self.ask, self.bid
            )));
        }
        if self.ask < self.bid {
            return Err(EngineError::InvalidInput(format!(
                "{} quote at {} is crossed (ask {} < bid {})",
                self.pair.name, self.timestamp, self.ask, self.bid
            )));
        }
        Ok(())
    }

    /// Value equality on prices and time, ignoring pair identity.
    pub fn same_quote(&self, other: &Rate) -> bool {
        self.ask == other.ask && self.bid == other.bid && self.timestamp == other.timestamp
    }
}
