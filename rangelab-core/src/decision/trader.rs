//! Per-pair decision loop.
//!
//! A [`PairTrader`] exclusively owns one pair's [`RangeManager`] and
//! [`RateAnalyzer`]. Each call to [`PairTrader::on_tick`] processes one quote
//! to completion:
//!
//! 1. Validate the quote and record it in the analyzer (rejects out-of-order)
//! 2. Reset the range on a UTC date rollover (when enabled)
//! 3. Save the rate into the pending range; commit it on the apply cadence
//! 4. Evaluate close / entry / add rules against the snapshot
//!
//! No I/O happens here. The caller supplies account and position facts and
//! executes the returned intent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::DecisionConfig;
use crate::analyzer::RateAnalyzer;
use crate::domain::{
    AccountFacts, CurrencyPair, DecisionReason, IntentAction, OrderIntent, PositionFacts,
    PositionStatus, Rate, Snapshot,
};
use crate::error::{EngineError, EngineResult};
use crate::range::RangeManager;
use crate::sizing::LotSizing;

#[derive(Debug, Clone)]
pub struct PairTrader {
    pair: Arc<CurrencyPair>,
    config: DecisionConfig,
    sizing: LotSizing,
    range: RangeManager,
    analyzer: RateAnalyzer,
    /// Start of the current apply cadence window.
    cycle_started: Option<DateTime<Utc>>,
    /// A counter-trend add already happened since the last apply.
    added_this_cycle: bool,
}

impl PairTrader {
    pub fn new(
        pair: Arc<CurrencyPair>,
        config: DecisionConfig,
        sizing: LotSizing,
    ) -> EngineResult<Self> {
        pair.validate()?;
        config.validate()?;
        sizing.validate()?;
        let analyzer = RateAnalyzer::new(config.window_minutes)?;
        Ok(Self {
            range: RangeManager::new(pair.name.clone()),
            pair,
            config,
            sizing,
            analyzer,
            cycle_started: None,
            added_this_cycle: false,
        })
    }

    pub fn pair(&self) -> &Arc<CurrencyPair> {
        &self.pair
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    pub fn sizing(&self) -> &LotSizing {
        &self.sizing
    }

    pub fn range(&self) -> &RangeManager {
        &self.range
    }

    pub fn analyzer(&self) -> &RateAnalyzer {
        &self.analyzer
    }

    /// Abort the current range cycle (manual flatten, external rollover).
    /// The analyzer history is kept.
    pub fn reset(&mut self) {
        self.range.reset();
        self.cycle_started = None;
        self.added_this_cycle = false;
    }

    /// Process one quote and return this tick's intent.
    ///
    /// A rejected quote (crossed, wrong pair, out of order) leaves all state
    /// untouched.
    pub fn on_tick(
        &mut self,
        rate: Rate,
        position: PositionFacts,
        account: AccountFacts,
    ) -> EngineResult<OrderIntent> {
        rate.validate()?;
        if rate.pair.name != self.pair.name {
            return Err(EngineError::InvalidInput(format!(
                "{} rate routed to {} trader",
                rate.pair.name, self.pair.name
            )));
        }

        let previous = self.analyzer.latest().map(|r| r.timestamp);
        self.analyzer.add(rate.clone())?;

        let now = rate.timestamp;
        if self.config.reset_on_rollover {
            if let Some(prev) = previous {
                if prev.date_naive() != now.date_naive() {
                    debug!("{}: date rollover at {}", self.pair.name, now);
                    self.reset();
                }
            }
        }

        let snapshot = Snapshot::new(rate, position, account);
        self.range.save(&snapshot);
        self.advance_cycle(now);

        let intent = self.decide(&snapshot)?;
        if !intent.is_hold() {
            info!(
                "{}: {:?} {} lot(s) ({:?}) ask={} bid={} profit={}",
                self.pair.name,
                intent.action,
                intent.lot,
                intent.reason,
                snapshot.rate.ask,
                snapshot.rate.bid,
                snapshot.total_profit()
            );
        }
        match intent.action {
            IntentAction::CloseAll => self.reset(),
            IntentAction::OpenAsk | IntentAction::OpenBid
                if snapshot.position_status() != PositionStatus::NoPosition =>
            {
                self.added_this_cycle = true;
            }
            _ => {}
        }
        Ok(intent)
    }

    /// Commit the pending range once it has accumulated for `apply_after`.
    fn advance_cycle(&mut self, now: DateTime<Utc>) {
        let started = *self.cycle_started.get_or_insert(now);
        if now - started >= self.config.apply_after() {
            self.range.apply();
            self.cycle_started = Some(now);
            self.added_this_cycle = false;
        }
    }

    fn decide(&self, snapshot: &Snapshot) -> EngineResult<OrderIntent> {
        let sizing = &self.sizing;

        if !snapshot.has_no_position() {
            let total = snapshot.total_profit();
            if total >= sizing.to_profit(snapshot) && total >= sizing.to_minimum_profit(snapshot) {
                return Ok(OrderIntent::close_all(snapshot.total_lot()));
            }
        }

        if !snapshot.rate.is_tradable_spread() {
            return Ok(OrderIntent::hold(DecisionReason::SpreadTooWide));
        }
        if self.analyzer.rates_duration() < self.config.min_history()
            || self.range.is_before_apply()
        {
            return Ok(OrderIntent::hold(DecisionReason::Warmup));
        }

        let range = &self.range;
        let intent = match snapshot.position_status() {
            PositionStatus::NoPosition => {
                if !(range.is_range() && range.is_within_range(snapshot)) {
                    return Ok(OrderIntent::hold(DecisionReason::Idle));
                }
                let lot = sizing.to_initial_lot(snapshot);
                if lot > snapshot.limit_lot() {
                    return Ok(OrderIntent::hold(DecisionReason::LotLimitReached));
                }
                if range.is_near_upper_limit(snapshot) {
                    OrderIntent::open_bid(lot, DecisionReason::NearUpperEdge)
                } else if range.is_near_lower_limit(snapshot) {
                    OrderIntent::open_ask(lot, DecisionReason::NearLowerEdge)
                } else {
                    OrderIntent::hold(DecisionReason::Idle)
                }
            }
            PositionStatus::AskHeavy
                if !self.added_this_cycle
                    && range.is_below_range(snapshot)
                    && snapshot.rate.bid <= self.analyzer.min_bid()? =>
            {
                let lot = sizing.to_next_lot(snapshot);
                if snapshot.bid_lot + lot > snapshot.limit_lot() {
                    OrderIntent::hold(DecisionReason::LotLimitReached)
                } else {
                    OrderIntent::open_bid(lot, DecisionReason::AdverseBreakDown)
                }
            }
            PositionStatus::BidHeavy
                if !self.added_this_cycle
                    && range.is_above_range(snapshot)
                    && snapshot.rate.ask >= self.analyzer.max_ask()? =>
            {
                let lot = sizing.to_next_lot(snapshot);
                if snapshot.ask_lot + lot > snapshot.limit_lot() {
                    OrderIntent::hold(DecisionReason::LotLimitReached)
                } else {
                    OrderIntent::open_ask(lot, DecisionReason::AdverseBreakUp)
                }
            }
            _ => OrderIntent::hold(DecisionReason::Idle),
        };
        Ok(intent)
    }
}
