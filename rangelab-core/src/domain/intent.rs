//! Order intent — the single per-tick output of a pair's decision loop.
//!
//! Intents are requests, not fills. The surrounding orchestration decides
//! how (and whether) to execute them against the account.

use serde::{Deserialize, Serialize};

/// What the decision loop wants to do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentAction {
    Hold,
    /// Buy at the ask (open or add to the long side).
    OpenAsk,
    /// Sell at the bid (open or add to the short side).
    OpenBid,
    /// Flatten both sides.
    CloseAll,
}

/// Why the action was chosen. Kept for the decision log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionReason {
    /// Not enough history, or no committed range yet.
    Warmup,
    SpreadTooWide,
    /// Flat and the rate sits closer to the upper edge.
    NearUpperEdge,
    /// Flat and the rate sits closer to the lower edge.
    NearLowerEdge,
    /// Long-heavy position and price broke below the range.
    AdverseBreakDown,
    /// Short-heavy position and price broke above the range.
    AdverseBreakUp,
    ProfitTarget,
    LotLimitReached,
    /// Nothing to do.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub action: IntentAction,
    /// Zero for `Hold`.
    pub lot: i64,
    pub reason: DecisionReason,
}

impl OrderIntent {
    pub fn hold(reason: DecisionReason) -> Self {
        Self {
            action: IntentAction::Hold,
            lot: 0,
            reason,
        }
    }

    pub fn open_ask(lot: i64, reason: DecisionReason) -> Self {
        Self {
            action: IntentAction::OpenAsk,
            lot,
            reason,
        }
    }

    pub fn open_bid(lot: i64, reason: DecisionReason) -> Self {
        Self {
            action: IntentAction::OpenBid,
            lot,
            reason,
        }
    }

    pub fn close_all(lot: i64) -> Self {
        Self {
            action: IntentAction::CloseAll,
            lot,
            reason: DecisionReason::ProfitTarget,
        }
    }

    pub fn is_hold(&self) -> bool {
        self.action == IntentAction::Hold
    }
}
