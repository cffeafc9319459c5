//! Lot sizing — pure functions from a snapshot to an integer.
//!
//! Four independently configurable policies:
//! - [`ProfitTarget`]: profit at which the whole position is closed
//! - [`InitialLot`]: lot for the first entry when flat
//! - [`NextLot`]: lot for a counter-trend add
//! - [`MinimumProfit`]: smallest profit worth closing for
//!
//! Policies are serde-tagged enums so strategy tuning happens in configuration,
//! not code. They never decide *whether* to trade; that is the decision loop's job.

pub mod lot;
pub mod profit;

pub use lot::{InitialLot, NextLot};
pub use profit::{MinimumProfit, ProfitTarget};

use serde::{Deserialize, Serialize};

use crate::domain::Snapshot;
use crate::error::{EngineError, EngineResult};

/// A policy evaluated against one snapshot.
pub trait SizingPolicy: Send + Sync {
    fn evaluate(&self, snapshot: &Snapshot) -> i64;

    /// Policy name for logging.
    fn name(&self) -> &str;
}

/// Strictly positive divisor for margin-scaled policies.
///
/// Construction (and deserialization) fails with a configuration error for
/// zero or negative values, so evaluation never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Denominator(i64);

impl Denominator {
    pub fn new(value: i64) -> EngineResult<Self> {
        if value <= 0 {
            return Err(EngineError::Configuration(format!(
                "denominator must be > 0, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// `value / denominator`, truncated toward zero.
    pub fn divide(self, value: i64) -> i64 {
        value / self.0
    }
}

impl TryFrom<i64> for Denominator {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Denominator> for i64 {
    fn from(d: Denominator) -> Self {
        d.0
    }
}

/// The four policies used by a pair's decision loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotSizing {
    pub profit: ProfitTarget,
    pub initial_lot: InitialLot,
    pub next_lot: NextLot,
    pub minimum_profit: MinimumProfit,
}

impl LotSizing {
    pub fn validate(&self) -> EngineResult<()> {
        self.profit.validate()?;
        self.initial_lot.validate()?;
        self.next_lot.validate()?;
        Ok(())
    }

    pub fn to_profit(&self, snapshot: &Snapshot) -> i64 {
        self.profit.evaluate(snapshot)
    }

    pub fn to_initial_lot(&self, snapshot: &Snapshot) -> i64 {
        self.initial_lot.evaluate(snapshot)
    }

    pub fn to_next_lot(&self, snapshot: &Snapshot) -> i64 {
        self.next_lot.evaluate(snapshot)
    }

    pub fn to_minimum_profit(&self, snapshot: &Snapshot) -> i64 {
        self.minimum_profit.evaluate(snapshot)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::domain::{AccountFacts, CurrencyPair, PositionFacts, Rate, Snapshot};

    pub fn snapshot(margin: i64, ask_lot: i64, bid_lot: i64) -> Snapshot {
        let pair = Arc::new(CurrencyPair::new("USDJPY", 3, 50_000).unwrap());
        let rate = Rate::new(
            pair,
            14_503,
            14_500,
            Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
        );
        Snapshot::new(
            rate,
            PositionFacts {
                ask_lot,
                bid_lot,
                ..Default::default()
            },
            AccountFacts {
                margin,
                effective_margin: margin,
                todays_profit: 0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::snapshot;
    use super::*;

    #[test]
    fn denominator_rejects_zero_and_negative() {
        assert!(matches!(
            Denominator::new(0),
            Err(EngineError::Configuration(_))
        ));
        assert!(Denominator::new(-5).is_err());
        assert_eq!(Denominator::new(7).unwrap().get(), 7);
    }

    #[test]
    fn margin_ratio_truncates_toward_zero() {
        let d = Denominator::new(3_000).unwrap();
        assert_eq!(d.divide(3_000_000), 1_000);
        assert_eq!(d.divide(4_500), 1);
        assert_eq!(d.divide(-4_500), -1);
        assert_eq!(ProfitTarget::default().evaluate(&snapshot(-4_500, 0, 0)), -1);
    }

    #[test]
    fn denominator_deserialization_is_validated() {
        let ok: Denominator = serde_json::from_str("250").unwrap();
        assert_eq!(ok.get(), 250);
        let err = serde_json::from_str::<Denominator>("0").unwrap_err();
        assert!(err.to_string().contains("denominator must be > 0"));
    }

    #[test]
    fn default_bundle_is_valid() {
        let sizing = LotSizing::default();
        sizing.validate().unwrap();
        let snap = snapshot(3_000_000, 0, 0);
        assert_eq!(sizing.to_profit(&snap), 1_000);
        assert_eq!(sizing.to_initial_lot(&snap), 3);
        assert_eq!(sizing.to_next_lot(&snap), 4);
        assert_eq!(sizing.to_minimum_profit(&snap), 1);
    }

    #[test]
    fn bundle_parses_from_toml() {
        let sizing: LotSizing = toml::from_str(
            r#"
            [profit]
            type = "MARGIN_RATIO"
            denominator = 1000

            [next_lot]
            type = "FIXED"
            lot = 2
            "#,
        )
        .unwrap();
        let snap = snapshot(3_000_000, 0, 0);
        assert_eq!(sizing.to_profit(&snap), 3_000);
        assert_eq!(sizing.to_next_lot(&snap), 2);
        // Unspecified policies keep their defaults.
        assert_eq!(sizing.initial_lot, InitialLot::default());
    }

    #[test]
    fn bundle_rejects_zero_denominator_in_toml() {
        let result: Result<LotSizing, _> = toml::from_str(
            r#"
            [initial_lot]
            type = "MARGIN_RATIO"
            denominator = 0
            "#,
        );
        assert!(result.is_err());
    }
}
