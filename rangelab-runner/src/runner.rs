//! Replay runner — wires together feed, per-pair traders and paper accounts.
//!
//! Two entry points:
//! - `run_replay()`: drains a feed, routes rates by pair, runs every pair.
//! - `run_pair()`: one pair's serial decision loop over its rates. Used by
//!   `run_replay()` on a rayon worker per pair.
//!
//! Pairs share no mutable state: each owns its trader and its paper account.

use std::collections::BTreeMap;

use log::{info, warn};
use rangelab_core::decision::PairTrader;
use rangelab_core::domain::{DecisionReason, IntentAction, Rate};
use rayon::prelude::*;
use thiserror::Error;

use crate::account::{AccountSource, PaperAccount};
use crate::config::{ConfigError, ReplayConfig};
use crate::feed::{FeedError, QuoteFeed};
use crate::result::{DecisionRecord, PairReport, ReplayResult, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("artifact I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Replay every rate in `feed` through the configured pairs.
///
/// Malformed rows and rows for unconfigured pairs are logged, counted and
/// skipped. An unreadable source ends the replay with an error.
pub fn run_replay(
    config: &ReplayConfig,
    feed: &mut dyn QuoteFeed,
) -> Result<ReplayResult, ReplayError> {
    let registry = config.build_registry()?;

    let mut routed: BTreeMap<String, Vec<Rate>> = registry
        .pair_names()
        .into_iter()
        .map(|name| (name.to_string(), Vec::new()))
        .collect();
    let mut malformed_rows = 0;
    let mut unrouted_rows = 0;

    while let Some(next) = feed.next_rate() {
        match next {
            Ok(rate) => match routed.get_mut(&rate.pair.name) {
                Some(rates) => rates.push(rate),
                None => unrouted_rows += 1,
            },
            Err(FeedError::UnknownPair(pair)) => {
                warn!("skipping quote for unconfigured pair {pair}");
                unrouted_rows += 1;
            }
            Err(FeedError::Csv(e)) => {
                warn!("skipping malformed quote row: {e}");
                malformed_rows += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let jobs: Vec<(PairTrader, Vec<Rate>)> = registry
        .into_traders()
        .map(|trader| {
            let rates = routed.remove(&trader.pair().name).unwrap_or_default();
            (trader, rates)
        })
        .collect();

    let initial_margin = config.account.initial_margin;
    let pairs: Vec<PairReport> = jobs
        .into_par_iter()
        .map(|(trader, rates)| run_pair(trader, rates, PaperAccount::new(initial_margin)))
        .collect();

    Ok(ReplayResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        pairs,
        malformed_rows,
        unrouted_rows,
    })
}

/// One pair's decision loop: each rate is processed to completion before the next.
pub fn run_pair(
    mut trader: PairTrader,
    rates: Vec<Rate>,
    mut account: PaperAccount,
) -> PairReport {
    let mut report = PairReport {
        pair: trader.pair().name.clone(),
        ..Default::default()
    };
    let mut last_rate: Option<Rate> = None;

    for rate in rates {
        let (position, facts) = account.facts(&rate);
        let was_flat = position.ask_lot + position.bid_lot == 0;

        let intent = match trader.on_tick(rate.clone(), position, facts) {
            Ok(intent) => intent,
            Err(e) => {
                warn!("{}: rejected quote at {}: {e}", report.pair, rate.timestamp);
                report.rejected += 1;
                continue;
            }
        };
        report.ticks += 1;

        if intent.reason == DecisionReason::LotLimitReached {
            report.lot_limit_holds += 1;
        }
        if let Some(exec) = account.execute(&intent, &rate) {
            match exec.action {
                IntentAction::CloseAll => report.closes += 1,
                IntentAction::OpenAsk | IntentAction::OpenBid if was_flat => report.opens += 1,
                IntentAction::OpenAsk | IntentAction::OpenBid => report.adds += 1,
                IntentAction::Hold => {}
            }
            report.decisions.push(DecisionRecord {
                timestamp: rate.timestamp,
                ask: rate.ask,
                bid: rate.bid,
                action: exec.action,
                lot: exec.lot,
                reason: intent.reason,
                price: exec.price,
                realized: exec.realized,
            });
        }
        last_rate = Some(rate);
    }

    report.realized_profit = account.realized();
    report.final_position = account.position();
    report.final_effective_margin = match &last_rate {
        Some(rate) => account.equity(rate),
        None => account.margin(),
    };
    info!(
        "{}: {} ticks, {} opens, {} adds, {} closes, realized {}",
        report.pair, report.ticks, report.opens, report.adds, report.closes, report.realized_profit
    );
    report
}
