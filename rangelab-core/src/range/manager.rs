//! Range manager — two-phase range tracking with extension detection.
//!
//! Rates are folded into a *pending* range by [`RangeManager::save`]. The
//! pending range only ever widens. [`RangeManager::apply`] commits it, and
//! records whether the commit grew the previously committed range. Queries
//! about where price sits (within, above, near an edge) always read the
//! *committed* range.
//!
//! Lifecycle: `Empty -> Pending -> Applied`, and `reset()` returns to `Empty`
//! from anywhere.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::{Rate, Snapshot};
use crate::error::{EngineError, EngineResult};

/// Where the manager is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeState {
    /// No committed or pending bounds.
    Empty,
    /// Bounds are being accumulated; nothing committed yet.
    Pending,
    /// A range has been committed.
    Applied,
}

/// An upper bound (read by its ask) and a lower bound (read by its bid).
///
/// Both are set together, which keeps the "both or neither" invariant in the
/// type rather than in runtime checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bounds {
    pub upper: Rate,
    pub lower: Rate,
}

impl Bounds {
    fn point(rate: Rate) -> Self {
        Self {
            upper: rate.clone(),
            lower: rate,
        }
    }

    pub fn range(&self) -> i64 {
        self.upper.ask - self.lower.bid
    }

    pub fn middle(&self) -> i64 {
        (self.upper.ask + self.lower.bid) / 2
    }
}

#[derive(Debug, Clone)]
pub struct RangeManager {
    pair: String,
    committed: Option<Bounds>,
    pending: Option<Bounds>,
    is_extended: bool,
    saves_since_commit: u32,
}

impl RangeManager {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            committed: None,
            pending: None,
            is_extended: false,
            saves_since_commit: 0,
        }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn state(&self) -> RangeState {
        match (&self.committed, &self.pending) {
            (Some(_), _) => RangeState::Applied,
            (None, Some(_)) => RangeState::Pending,
            (None, None) => RangeState::Empty,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Fold the snapshot's rate into the pending range (widen only).
    pub fn save(&mut self, snapshot: &Snapshot) {
        let rate = &snapshot.rate;
        self.saves_since_commit = self.saves_since_commit.saturating_add(1);

        match self.pending.as_mut() {
            None => self.pending = Some(Bounds::point(rate.clone())),
            Some(pending) => {
                if rate.ask > pending.upper.ask {
                    pending.upper = rate.clone();
                }
                if rate.bid < pending.lower.bid {
                    pending.lower = rate.clone();
                }
            }
        }
    }

    /// Commit the pending range. Pending bounds are kept, so later saves keep
    /// widening from them until `reset()`.
    ///
    /// Does nothing while no rate has been saved.
    pub fn apply(&mut self) {
        let Some(pending) = self.pending.clone() else {
            return;
        };
        self.is_extended = self.is_save_extended();
        debug!(
            "{}: apply range [{}, {}] extended={}",
            self.pair, pending.lower.bid, pending.upper.ask, self.is_extended
        );
        self.committed = Some(pending);
        self.saves_since_commit = 0;
    }

    /// Clear all bounds and start a new cycle.
    pub fn reset(&mut self) {
        debug!("{}: reset range", self.pair);
        self.committed = None;
        self.pending = None;
        self.is_extended = false;
        self.saves_since_commit = 0;
    }

    /// Widen the pending bounds out to absolute prices, keeping each bound's
    /// spread. A bound already beyond the requested price is left alone.
    ///
    /// Returns whether either bound moved.
    pub fn adjust_termination(&mut self, lower: i64, upper: i64) -> EngineResult<bool> {
        let pending = self
            .pending
            .as_mut()
            .ok_or(EngineError::UnsetState("pending"))?;
        let mut moved = false;

        if pending.upper.ask < upper {
            let spread = pending.upper.spread();
            pending.upper.ask = upper;
            pending.upper.bid = upper - spread;
            moved = true;
        }
        if pending.lower.bid > lower {
            let spread = pending.lower.spread();
            pending.lower.bid = lower;
            pending.lower.ask = lower + spread;
            moved = true;
        }
        if moved {
            debug!(
                "{}: pending range widened to [{}, {}]",
                self.pair, pending.lower.bid, pending.upper.ask
            );
        }
        Ok(moved)
    }

    // ── Cycle queries ────────────────────────────────────────────────

    pub fn is_before_save(&self) -> bool {
        self.pending.is_none()
    }

    pub fn is_before_apply(&self) -> bool {
        self.committed.is_none()
    }

    /// Exactly one save since the last reset or apply.
    pub fn is_first_save(&self) -> bool {
        self.saves_since_commit == 1
    }

    /// Whether the last apply grew the committed range.
    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// Whether the pending range reaches past the committed one.
    /// True while nothing has been committed yet.
    pub fn is_save_extended(&self) -> bool {
        match (&self.committed, &self.pending) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(committed), Some(pending)) => {
                pending.upper.ask > committed.upper.ask || pending.lower.bid < committed.lower.bid
            }
        }
    }

    /// Price has been range-bound rather than trending.
    pub fn is_range(&self) -> bool {
        !self.is_extended && !self.is_save_extended()
    }

    /// The most recently pushed pending bound was the upper one.
    pub fn is_upward(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.upper.timestamp > p.lower.timestamp)
    }

    /// The most recently pushed pending bound was the lower one.
    pub fn is_downward(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| p.lower.timestamp > p.upper.timestamp)
    }

    // ── Position of price against the committed range ───────────────

    pub fn is_within_range(&self, snapshot: &Snapshot) -> bool {
        self.committed.as_ref().is_some_and(|c| {
            snapshot.rate.ask > c.lower.bid && snapshot.rate.bid < c.upper.ask
        })
    }

    pub fn is_above_range(&self, snapshot: &Snapshot) -> bool {
        self.committed
            .as_ref()
            .is_some_and(|c| snapshot.rate.ask > c.upper.ask)
    }

    pub fn is_below_range(&self, snapshot: &Snapshot) -> bool {
        self.committed
            .as_ref()
            .is_some_and(|c| snapshot.rate.bid < c.lower.bid)
    }

    /// Closer to the upper edge than the lower one. Ties are not near either.
    pub fn is_near_upper_limit(&self, snapshot: &Snapshot) -> bool {
        self.edge_distances(snapshot)
            .is_some_and(|(to_upper, to_lower)| to_upper < to_lower)
    }

    /// Closer to the lower edge than the upper one. Ties are not near either.
    pub fn is_near_lower_limit(&self, snapshot: &Snapshot) -> bool {
        self.edge_distances(snapshot)
            .is_some_and(|(to_upper, to_lower)| to_upper > to_lower)
    }

    fn edge_distances(&self, snapshot: &Snapshot) -> Option<(i64, i64)> {
        self.committed.as_ref().map(|c| {
            (
                c.upper.ask - snapshot.rate.ask,
                snapshot.rate.bid - c.lower.bid,
            )
        })
    }

    // ── Arithmetic ───────────────────────────────────────────────────

    pub fn committed(&self) -> Option<&Bounds> {
        self.committed.as_ref()
    }

    pub fn pending(&self) -> Option<&Bounds> {
        self.pending.as_ref()
    }

    pub fn upper_limit(&self) -> EngineResult<&Rate> {
        self.committed_bounds().map(|b| &b.upper)
    }

    pub fn lower_limit(&self) -> EngineResult<&Rate> {
        self.committed_bounds().map(|b| &b.lower)
    }

    pub fn upper_limit_save(&self) -> EngineResult<&Rate> {
        self.pending_bounds().map(|b| &b.upper)
    }

    pub fn lower_limit_save(&self) -> EngineResult<&Rate> {
        self.pending_bounds().map(|b| &b.lower)
    }

    pub fn range(&self) -> EngineResult<i64> {
        self.committed_bounds().map(Bounds::range)
    }

    pub fn middle(&self) -> EngineResult<i64> {
        self.committed_bounds().map(Bounds::middle)
    }

    pub fn save_range(&self) -> EngineResult<i64> {
        self.pending_bounds().map(Bounds::range)
    }

    pub fn save_middle(&self) -> EngineResult<i64> {
        self.pending_bounds().map(Bounds::middle)
    }

    fn committed_bounds(&self) -> EngineResult<&Bounds> {
        self.committed
            .as_ref()
            .ok_or(EngineError::UnsetState("committed"))
    }

    fn pending_bounds(&self) -> EngineResult<&Bounds> {
        self.pending.as_ref().ok_or(EngineError::UnsetState("pending"))
    }
}
