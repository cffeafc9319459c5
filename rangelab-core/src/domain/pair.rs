use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Currency pair metadata carried by every rate.
///
/// Prices are integer pip-scaled units, so `min_spread` is the widest spread
/// (in the same units) at which the pair is still worth trading.
///
/// Deserialization runs the same checks as [`CurrencyPair::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCurrencyPair")]
pub struct CurrencyPair {
    pub name: String,
    pub min_spread: i64,
    /// Margin needed to hold one lot.
    pub margin_requirement: i64,
}

#[derive(Deserialize)]
struct RawCurrencyPair {
    name: String,
    min_spread: i64,
    margin_requirement: i64,
}

impl TryFrom<RawCurrencyPair> for CurrencyPair {
    type Error = EngineError;

    fn try_from(raw: RawCurrencyPair) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.min_spread, raw.margin_requirement)
    }
}

impl CurrencyPair {
    pub fn new(
        name: impl Into<String>,
        min_spread: i64,
        margin_requirement: i64,
    ) -> EngineResult<Self> {
        let pair = Self {
            name: name.into(),
            min_spread,
            margin_requirement,
        };
        pair.validate()?;
        Ok(pair)
    }

    /// Reject metadata that would make lot limits meaningless.
    pub fn validate(&self) -> EngineResult<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Configuration("pair name is empty".into()));
        }
        if self.margin_requirement <= 0 {
            return Err(EngineError::Configuration(format!(
                "{}: margin_requirement must be > 0, got {}",
                self.name, self.margin_requirement
            )));
        }
        if self.min_spread < 0 {
            return Err(EngineError::Configuration(format!(
                "{}: min_spread must be >= 0, got {}",
                self.name, self.min_spread
            )));
        }
        Ok(())
    }
}
