//! Profit thresholds: when a close is due, and when it is worth it.

use serde::{Deserialize, Serialize};

use super::{Denominator, SizingPolicy};
use crate::domain::Snapshot;
use crate::error::{EngineError, EngineResult};

/// Target profit at which the whole position is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfitTarget {
    /// `margin / denominator`: scales with account size.
    MarginRatio { denominator: Denominator },

    /// Constant target.
    Fixed { amount: i64 },
}

impl ProfitTarget {
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::MarginRatio { .. } => Ok(()),
            Self::Fixed { amount } if *amount > 0 => Ok(()),
            Self::Fixed { amount } => Err(EngineError::Configuration(format!(
                "fixed profit target must be > 0, got {amount}"
            ))),
        }
    }
}

impl Default for ProfitTarget {
    fn default() -> Self {
        Self::MarginRatio {
            denominator: Denominator(3_000),
        }
    }
}

impl SizingPolicy for ProfitTarget {
    fn evaluate(&self, snapshot: &Snapshot) -> i64 {
        match self {
            Self::MarginRatio { denominator } => denominator.divide(snapshot.margin),
            Self::Fixed { amount } => *amount,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::MarginRatio { .. } => "ProfitMarginRatio",
            Self::Fixed { .. } => "ProfitFixed",
        }
    }
}

/// Smallest profit worth closing for; covers transaction-cost noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MinimumProfit {
    Constant { amount: i64 },
}

impl Default for MinimumProfit {
    fn default() -> Self {
        Self::Constant { amount: 1 }
    }
}

impl SizingPolicy for MinimumProfit {
    fn evaluate(&self, _snapshot: &Snapshot) -> i64 {
        match self {
            Self::Constant { amount } => *amount,
        }
    }

    fn name(&self) -> &str {
        "MinimumProfitConstant"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::test_support::snapshot;

    #[test]
    fn margin_ratio_scales_with_margin() {
        let target = ProfitTarget::MarginRatio {
            denominator: Denominator::new(1_000).unwrap(),
        };
        assert_eq!(target.evaluate(&snapshot(3_000_000, 0, 0)), 3_000);
        assert_eq!(target.evaluate(&snapshot(500_000, 0, 0)), 500);
    }

    #[test]
    fn margin_ratio_floors() {
        let target = ProfitTarget::MarginRatio {
            denominator: Denominator::new(7).unwrap(),
        };
        assert_eq!(target.evaluate(&snapshot(20, 0, 0)), 2);
    }

    #[test]
    fn fixed_target_ignores_margin() {
        let target = ProfitTarget::Fixed { amount: 250 };
        assert_eq!(target.evaluate(&snapshot(3_000_000, 0, 0)), 250);
        assert_eq!(target.name(), "ProfitFixed");
    }

    #[test]
    fn fixed_target_must_be_positive() {
        assert!(ProfitTarget::Fixed { amount: 0 }.validate().is_err());
    }

    #[test]
    fn minimum_profit_default_is_one() {
        assert_eq!(MinimumProfit::default().evaluate(&snapshot(0, 0, 0)), 1);
    }
}
