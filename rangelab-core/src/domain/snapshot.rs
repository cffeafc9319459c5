//! Snapshot — the per-tick derived view every decision reads.
//!
//! A snapshot combines the current rate with the position and account facts
//! refreshed at the same tick boundary. All profit and lot figures are
//! derived on demand; nothing is stored beyond the raw inputs.

use serde::{Deserialize, Serialize};

use super::Rate;

/// Share of the affordable lot count the engine is allowed to use, in tenths.
const LIMIT_LOT_TENTHS: i64 = 9;

/// Open position facts for one pair, as reported by the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionFacts {
    pub ask_lot: i64,
    pub bid_lot: i64,
    pub ask_average_rate: i64,
    pub bid_average_rate: i64,
}

/// Account-level facts shared by every pair on the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountFacts {
    pub margin: i64,
    pub effective_margin: i64,
    pub todays_profit: i64,
}

/// Four-way position tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    NoPosition,
    /// More long (ask-side) lots than short.
    AskHeavy,
    /// More short (bid-side) lots than long.
    BidHeavy,
    /// Equal lots on both sides, both non-zero.
    Balanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub rate: Rate,
    pub ask_lot: i64,
    pub bid_lot: i64,
    pub ask_average_rate: i64,
    pub bid_average_rate: i64,
    pub margin: i64,
    pub effective_margin: i64,
    pub todays_profit: i64,
}

impl Snapshot {
    pub fn new(rate: Rate, position: PositionFacts, account: AccountFacts) -> Self {
        Self {
            rate,
            ask_lot: position.ask_lot,
            bid_lot: position.bid_lot,
            ask_average_rate: position.ask_average_rate,
            bid_average_rate: position.bid_average_rate,
            margin: account.margin,
            effective_margin: account.effective_margin,
            todays_profit: account.todays_profit,
        }
    }

    // ── Profit ───────────────────────────────────────────────────────

    /// Long side closes against the current bid.
    pub fn ask_pip_profit(&self) -> i64 {
        if self.ask_lot == 0 {
            return 0;
        }
        self.rate.bid - self.ask_average_rate
    }

    /// Short side closes against the current ask.
    pub fn bid_pip_profit(&self) -> i64 {
        if self.bid_lot == 0 {
            return 0;
        }
        self.bid_average_rate - self.rate.ask
    }

    pub fn ask_profit(&self) -> i64 {
        self.ask_pip_profit() * self.ask_lot
    }

    pub fn bid_profit(&self) -> i64 {
        self.bid_pip_profit() * self.bid_lot
    }

    /// Unrealized profit of the open position.
    pub fn position_profit(&self) -> i64 {
        self.ask_profit() + self.bid_profit()
    }

    /// Unrealized plus today's realized profit.
    pub fn total_profit(&self) -> i64 {
        self.position_profit() + self.todays_profit
    }

    // ── Lots ─────────────────────────────────────────────────────────

    /// `floor(min(margin, effective_margin) / margin_requirement * 0.9)`, never negative.
    pub fn limit_lot(&self) -> i64 {
        let usable = self.margin.min(self.effective_margin).max(0);
        usable * LIMIT_LOT_TENTHS / (self.rate.pair.margin_requirement * 10)
    }

    pub fn more_lot(&self) -> i64 {
        self.ask_lot.max(self.bid_lot)
    }

    pub fn less_lot(&self) -> i64 {
        self.ask_lot.min(self.bid_lot)
    }

    pub fn total_lot(&self) -> i64 {
        self.ask_lot + self.bid_lot
    }

    /// Lots that can still be added to the heavier side.
    pub fn remaining_lot(&self) -> i64 {
        (self.limit_lot() - self.more_lot()).max(0)
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn position_status(&self) -> PositionStatus {
        match (self.ask_lot, self.bid_lot) {
            (0, 0) => PositionStatus::NoPosition,
            (ask, bid) if ask > bid => PositionStatus::AskHeavy,
            (ask, bid) if ask < bid => PositionStatus::BidHeavy,
            _ => PositionStatus::Balanced,
        }
    }

    pub fn has_no_position(&self) -> bool {
        self.position_status() == PositionStatus::NoPosition
    }

    pub fn is_ask_heavy(&self) -> bool {
        self.position_status() == PositionStatus::AskHeavy
    }

    pub fn is_bid_heavy(&self) -> bool {
        self.position_status() == PositionStatus::BidHeavy
    }

    pub fn is_balanced(&self) -> bool {
        self.position_status() == PositionStatus::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CurrencyPair;
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn rate(ask: i64, bid: i64) -> Rate {
        let pair = Arc::new(CurrencyPair::new("USDJPY", 3, 50_000).unwrap());
        Rate::new(pair, ask, bid, Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap())
    }

    fn account(margin: i64) -> AccountFacts {
        AccountFacts {
            margin,
            effective_margin: margin,
            todays_profit: 0,
        }
    }

    #[test]
    fn limit_lot_scenario() {
        let snap = Snapshot::new(rate(14_503, 14_500), PositionFacts::default(), account(3_000_000));
        assert_eq!(snap.limit_lot(), 54);
    }

    #[test]
    fn limit_lot_uses_smaller_margin() {
        let acct = AccountFacts {
            margin: 3_000_000,
            effective_margin: 1_000_000,
            todays_profit: 0,
        };
        let snap = Snapshot::new(rate(14_503, 14_500), PositionFacts::default(), acct);
        assert_eq!(snap.limit_lot(), 18);
    }

    #[test]
    fn limit_lot_never_negative() {
        let snap = Snapshot::new(rate(14_503, 14_500), PositionFacts::default(), account(-500_000));
        assert_eq!(snap.limit_lot(), 0);
        assert_eq!(snap.remaining_lot(), 0);
    }

    #[test]
    fn ask_side_profit_uses_bid() {
        let pos = PositionFacts {
            ask_lot: 2,
            ask_average_rate: 14_490,
            ..Default::default()
        };
        let snap = Snapshot::new(rate(14_503, 14_500), pos, account(3_000_000));
        assert_eq!(snap.ask_pip_profit(), 10);
        assert_eq!(snap.ask_profit(), 20);
        assert_eq!(snap.bid_profit(), 0);
    }

    #[test]
    fn bid_side_profit_uses_ask() {
        let pos = PositionFacts {
            bid_lot: 3,
            bid_average_rate: 14_510,
            ..Default::default()
        };
        let snap = Snapshot::new(rate(14_503, 14_500), pos, account(3_000_000));
        assert_eq!(snap.bid_pip_profit(), 7);
        assert_eq!(snap.bid_profit(), 21);
    }

    #[test]
    fn total_profit_includes_todays_realized() {
        let pos = PositionFacts {
            ask_lot: 1,
            ask_average_rate: 14_510,
            bid_lot: 1,
            bid_average_rate: 14_520,
        };
        let acct = AccountFacts {
            margin: 3_000_000,
            effective_margin: 3_000_000,
            todays_profit: 100,
        };
        let snap = Snapshot::new(rate(14_503, 14_500), pos, acct);
        // ask: 14500 - 14510 = -10, bid: 14520 - 14503 = 17
        assert_eq!(snap.position_profit(), 7);
        assert_eq!(snap.total_profit(), 107);
    }

    #[test]
    fn position_status_four_way() {
        let r = rate(14_503, 14_500);
        let status = |ask_lot, bid_lot| {
            let pos = PositionFacts {
                ask_lot,
                bid_lot,
                ..Default::default()
            };
            Snapshot::new(r.clone(), pos, account(1_000_000)).position_status()
        };
        assert_eq!(status(0, 0), PositionStatus::NoPosition);
        assert_eq!(status(3, 1), PositionStatus::AskHeavy);
        assert_eq!(status(0, 2), PositionStatus::BidHeavy);
        assert_eq!(status(2, 2), PositionStatus::Balanced);
    }

    #[test]
    fn more_and_less_lot() {
        let pos = PositionFacts {
            ask_lot: 5,
            bid_lot: 2,
            ..Default::default()
        };
        let snap = Snapshot::new(rate(14_503, 14_500), pos, account(3_000_000));
        assert_eq!(snap.more_lot(), 5);
        assert_eq!(snap.less_lot(), 2);
        assert_eq!(snap.total_lot(), 7);
        assert_eq!(snap.remaining_lot(), 49);
    }
}
