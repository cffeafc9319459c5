//! Entry and add-on lot sizing.

use serde::{Deserialize, Serialize};

use super::{Denominator, SizingPolicy};
use crate::domain::Snapshot;
use crate::error::{EngineError, EngineResult};

/// Lot for the first entry when flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InitialLot {
    /// `max(1, margin / denominator)`: small accounts still trade one lot.
    MarginRatio { denominator: Denominator },

    Fixed { lot: i64 },
}

impl InitialLot {
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::MarginRatio { .. } => Ok(()),
            Self::Fixed { lot } => positive_lot("initial", *lot),
        }
    }
}

impl Default for InitialLot {
    fn default() -> Self {
        Self::MarginRatio {
            denominator: Denominator(1_000_000),
        }
    }
}

impl SizingPolicy for InitialLot {
    fn evaluate(&self, snapshot: &Snapshot) -> i64 {
        match self {
            Self::MarginRatio { denominator } => denominator.divide(snapshot.margin).max(1),
            Self::Fixed { lot } => *lot,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::MarginRatio { .. } => "InitialLotMarginRatio",
            Self::Fixed { .. } => "InitialLotFixed",
        }
    }
}

/// Lot for a counter-trend add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextLot {
    /// `early_lot` until the heavier side reaches `late_stage_percent` of the
    /// lot limit, `late_lot` from then on. The threshold is not rounded.
    Tapered {
        early_lot: i64,
        late_lot: i64,
        late_stage_percent: i64,
    },

    Fixed { lot: i64 },
}

impl NextLot {
    pub fn validate(&self) -> EngineResult<()> {
        match *self {
            Self::Tapered {
                early_lot,
                late_lot,
                late_stage_percent,
            } => {
                positive_lot("early", early_lot)?;
                positive_lot("late", late_lot)?;
                if !(0..=100).contains(&late_stage_percent) {
                    return Err(EngineError::Configuration(format!(
                        "late_stage_percent must be within 0..=100, got {late_stage_percent}"
                    )));
                }
                Ok(())
            }
            Self::Fixed { lot } => positive_lot("next", lot),
        }
    }
}

impl Default for NextLot {
    fn default() -> Self {
        Self::Tapered {
            early_lot: 4,
            late_lot: 1,
            late_stage_percent: 10,
        }
    }
}

impl SizingPolicy for NextLot {
    fn evaluate(&self, snapshot: &Snapshot) -> i64 {
        match *self {
            Self::Tapered {
                early_lot,
                late_lot,
                late_stage_percent,
            } => {
                if snapshot.more_lot() * 100 >= snapshot.limit_lot() * late_stage_percent {
                    late_lot
                } else {
                    early_lot
                }
            }
            Self::Fixed { lot } => lot,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Tapered { .. } => "NextLotTapered",
            Self::Fixed { .. } => "NextLotFixed",
        }
    }
}

fn positive_lot(which: &str, lot: i64) -> EngineResult<()> {
    if lot <= 0 {
        return Err(EngineError::Configuration(format!(
            "{which} lot must be > 0, got {lot}"
        )));
    }
    Ok(())
}
