//! Pair registry — one owned trader per currency pair.
//!
//! An explicit map handed to whoever drives the loops. There is no global
//! lookup: each pair's state is reachable only through the registry that
//! owns it.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{DecisionConfig, PairTrader};
use crate::domain::CurrencyPair;
use crate::error::{EngineError, EngineResult};
use crate::sizing::LotSizing;

#[derive(Debug, Clone, Default)]
pub struct PairRegistry {
    traders: BTreeMap<String, PairTrader>,
}

impl PairRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pair with its own config and sizing policies.
    pub fn register(
        &mut self,
        pair: CurrencyPair,
        config: DecisionConfig,
        sizing: LotSizing,
    ) -> EngineResult<&mut PairTrader> {
        if self.traders.contains_key(&pair.name) {
            return Err(EngineError::Configuration(format!(
                "pair {} registered twice",
                pair.name
            )));
        }
        let name = pair.name.clone();
        let trader = PairTrader::new(Arc::new(pair), config, sizing)?;
        Ok(self.traders.entry(name).or_insert(trader))
    }

    pub fn get(&self, pair: &str) -> Option<&PairTrader> {
        self.traders.get(pair)
    }

    pub fn get_mut(&mut self, pair: &str) -> Option<&mut PairTrader> {
        self.traders.get_mut(pair)
    }

    pub fn contains(&self, pair: &str) -> bool {
        self.traders.contains_key(pair)
    }

    pub fn pair_names(&self) -> Vec<&str> {
        self.traders.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.traders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traders.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PairTrader)> {
        self.traders.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Reset one pair's range cycle. Returns false for an unknown pair.
    pub fn reset(&mut self, pair: &str) -> bool {
        match self.traders.get_mut(pair) {
            Some(trader) => {
                trader.reset();
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        for trader in self.traders.values_mut() {
            trader.reset();
        }
    }

    /// Hand out the traders by value, e.g. to run each on its own thread.
    pub fn into_traders(self) -> impl Iterator<Item = PairTrader> {
        self.traders.into_values()
    }
}
