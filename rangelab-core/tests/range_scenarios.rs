//! Scenario tests for range tracking and sizing behavior.
//!
//! Tests:
//! 1. Single-point cycle: reset, one save, apply collapses the range to a point
//! 2. Save sequences in every order reach the same extrema
//! 3. Near-edge tie-break: exact ties are near neither edge
//! 4. Lot limit and tapering scenarios against a realistic account

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rangelab_core::domain::{AccountFacts, CurrencyPair, PositionFacts, Rate, Snapshot};
use rangelab_core::range::{RangeManager, RangeState};
use rangelab_core::sizing::{LotSizing, NextLot, SizingPolicy};

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn at(second: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 8, 30, 0).unwrap() + Duration::seconds(second)
}

fn make_snapshot(second: i64, ask: i64, bid: i64, position: PositionFacts, margin: i64) -> Snapshot {
    let pair = Arc::new(CurrencyPair::new("USDJPY", 5, 50_000).unwrap());
    Snapshot::new(
        Rate::new(pair, ask, bid, at(second)),
        position,
        AccountFacts {
            margin,
            effective_margin: margin,
            todays_profit: 0,
        },
    )
}

fn quote(second: i64, ask: i64, bid: i64) -> Snapshot {
    make_snapshot(second, ask, bid, PositionFacts::default(), 3_000_000)
}

fn permutations(items: &[(i64, i64)]) -> Vec<Vec<(i64, i64)>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

// ──────────────────────────────────────────────
// Range cycle
// ──────────────────────────────────────────────

#[test]
fn single_point_cycle_collapses_range() {
    let mut rm = RangeManager::new("USDJPY");
    rm.save(&quote(0, 120, 110));
    rm.save(&quote(1, 130, 100));
    rm.apply();

    rm.reset();
    let only = quote(2, 14_503, 14_500);
    rm.save(&only);
    rm.apply();

    let upper = rm.upper_limit().unwrap();
    let lower = rm.lower_limit().unwrap();
    assert!(upper.same_quote(&only.rate));
    assert!(lower.same_quote(&only.rate));
    assert_eq!(rm.range().unwrap(), only.rate.spread());
    assert_eq!(rm.state(), RangeState::Applied);
}

#[test]
fn first_save_flag_follows_reset() {
    let mut rm = RangeManager::new("USDJPY");
    rm.save(&quote(0, 100, 95));
    rm.save(&quote(1, 101, 94));
    assert!(!rm.is_first_save());
    rm.reset();
    rm.save(&quote(2, 100, 95));
    assert!(rm.is_first_save());
    rm.save(&quote(3, 100, 95));
    assert!(!rm.is_first_save());
}

#[test]
fn three_saves_reach_same_extrema_in_any_order() {
    let quotes = [(100, 95), (105, 90), (103, 92)];
    for order in permutations(&quotes) {
        let mut rm = RangeManager::new("USDJPY");
        for (i, (ask, bid)) in order.iter().enumerate() {
            rm.save(&quote(i as i64, *ask, *bid));
        }
        assert_eq!(rm.upper_limit_save().unwrap().ask, 105, "order {order:?}");
        assert_eq!(rm.lower_limit_save().unwrap().bid, 90, "order {order:?}");
    }
}

#[test]
fn trending_market_is_never_range_bound() {
    let mut rm = RangeManager::new("USDJPY");
    for step in 0..10 {
        let ask = 100 + step * 5;
        rm.save(&quote(step, ask, ask - 3));
        rm.apply();
        assert!(rm.is_extended(), "step {step}");
        assert!(!rm.is_range());
        assert!(rm.is_upward() || step == 0);
    }
}

#[test]
fn near_edge_tie_is_near_neither() {
    let mut rm = RangeManager::new("USDJPY");
    rm.save(&quote(0, 110, 107));
    rm.save(&quote(1, 93, 90));
    rm.apply();

    // to_upper = 110 - 102 = 8, to_lower = 98 - 90 = 8
    let tie = quote(2, 102, 98);
    assert!(rm.is_within_range(&tie));
    assert!(!rm.is_near_upper_limit(&tie));
    assert!(!rm.is_near_lower_limit(&tie));
}

// ──────────────────────────────────────────────
// Sizing scenarios
// ──────────────────────────────────────────────

#[test]
fn limit_lot_for_three_million_margin() {
    let snap = quote(0, 14_503, 14_500);
    assert_eq!(snap.limit_lot(), 54);
}

#[test]
fn next_lot_tapers_at_ten_percent_of_limit() {
    // 5_555_556 * 0.9 / 50_000 floors to 100
    let margin = 5_555_556;
    let early = make_snapshot(
        0,
        14_503,
        14_500,
        PositionFacts {
            ask_lot: 9,
            ..Default::default()
        },
        margin,
    );
    let late = make_snapshot(
        0,
        14_503,
        14_500,
        PositionFacts {
            ask_lot: 11,
            ..Default::default()
        },
        margin,
    );
    assert_eq!(early.limit_lot(), 100);

    let policy = NextLot::default();
    assert_eq!(policy.evaluate(&early), 4);
    assert_eq!(policy.evaluate(&late), 1);

    let sizing = LotSizing::default();
    assert_eq!(sizing.to_next_lot(&early), 4);
    assert_eq!(sizing.to_next_lot(&late), 1);
}
