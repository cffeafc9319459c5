//! Paper account — simulated fills and margin for replays.
//!
//! Stands in for the broker: supplies position/account facts at each tick
//! boundary and executes intents at the quoted price. Buys fill at the ask,
//! sells at the bid, and a close-all realizes the snapshot's position profit.

use chrono::NaiveDate;
use rangelab_core::domain::{
    AccountFacts, IntentAction, OrderIntent, PositionFacts, Rate, Snapshot,
};
use serde::{Deserialize, Serialize};

/// Source of account facts and sink for intents.
pub trait AccountSource {
    /// Facts at the tick boundary of `rate`.
    fn facts(&mut self, rate: &Rate) -> (PositionFacts, AccountFacts);

    /// Execute an intent. `None` for holds and for intents with nothing to do.
    fn execute(&mut self, intent: &OrderIntent, rate: &Rate) -> Option<Execution>;
}

/// A simulated fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub action: IntentAction,
    pub lot: i64,
    pub price: i64,
    /// Profit realized by this execution (non-zero only for closes).
    pub realized: i64,
}

#[derive(Debug, Clone)]
pub struct PaperAccount {
    initial_margin: i64,
    realized: i64,
    todays_profit: i64,
    day: Option<NaiveDate>,
    position: PositionFacts,
}

impl PaperAccount {
    pub fn new(initial_margin: i64) -> Self {
        Self {
            initial_margin,
            realized: 0,
            todays_profit: 0,
            day: None,
            position: PositionFacts::default(),
        }
    }

    pub fn position(&self) -> PositionFacts {
        self.position
    }

    pub fn realized(&self) -> i64 {
        self.realized
    }

    pub fn margin(&self) -> i64 {
        self.initial_margin + self.realized
    }

    fn account_facts(&self, rate: &Rate) -> AccountFacts {
        let margin = self.margin();
        let unrealized = self.snapshot(rate, margin).position_profit();
        AccountFacts {
            margin,
            effective_margin: margin + unrealized,
            todays_profit: self.todays_profit,
        }
    }

    fn snapshot(&self, rate: &Rate, margin: i64) -> Snapshot {
        Snapshot::new(
            rate.clone(),
            self.position,
            AccountFacts {
                margin,
                effective_margin: margin,
                todays_profit: self.todays_profit,
            },
        )
    }

    /// Effective margin at `rate`.
    pub fn equity(&self, rate: &Rate) -> i64 {
        self.account_facts(rate).effective_margin
    }
}

/// Volume-weighted average of an existing side and a new fill, floored.
fn average_in(lot: i64, average: i64, add_lot: i64, price: i64) -> i64 {
    let total = lot + add_lot;
    if total == 0 {
        return 0;
    }
    (lot * average + add_lot * price).div_euclid(total)
}

impl AccountSource for PaperAccount {
    fn facts(&mut self, rate: &Rate) -> (PositionFacts, AccountFacts) {
        let today = rate.timestamp.date_naive();
        if self.day != Some(today) {
            self.day = Some(today);
            self.todays_profit = 0;
        }
        (self.position, self.account_facts(rate))
    }

    fn execute(&mut self, intent: &OrderIntent, rate: &Rate) -> Option<Execution> {
        match intent.action {
            IntentAction::Hold => None,
            IntentAction::OpenAsk if intent.lot > 0 => {
                let p = &mut self.position;
                p.ask_average_rate = average_in(p.ask_lot, p.ask_average_rate, intent.lot, rate.ask);
                p.ask_lot += intent.lot;
                Some(Execution {
                    action: intent.action,
                    lot: intent.lot,
                    price: rate.ask,
                    realized: 0,
                })
            }
            IntentAction::OpenBid if intent.lot > 0 => {
                let p = &mut self.position;
                p.bid_average_rate = average_in(p.bid_lot, p.bid_average_rate, intent.lot, rate.bid);
                p.bid_lot += intent.lot;
                Some(Execution {
                    action: intent.action,
                    lot: intent.lot,
                    price: rate.bid,
                    realized: 0,
                })
            }
            IntentAction::CloseAll if self.position.ask_lot + self.position.bid_lot > 0 => {
                let profit = self.snapshot(rate, self.margin()).position_profit();
                let lot = self.position.ask_lot + self.position.bid_lot;
                self.realized += profit;
                self.todays_profit += profit;
                self.position = PositionFacts::default();
                Some(Execution {
                    action: intent.action,
                    lot,
                    price: rate.mid(),
                    realized: profit,
                })
            }
            _ => None,
        }
    }
}
