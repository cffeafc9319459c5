//! Synthetic quote generation for demos and smoke tests.
//!
//! A seeded random walk on the bid with a constant spread. The same params
//! always produce the same quotes.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::feed::QuoteRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthParams {
    pub pair: String,
    pub ticks: usize,
    pub seed: u64,
    pub start: DateTime<Utc>,
    pub start_bid: i64,
    pub spread: i64,
    /// Largest bid move per tick, either direction.
    pub max_step: i64,
    pub step_seconds: i64,
}

impl SynthParams {
    pub fn new(pair: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            pair: pair.into(),
            ticks: 1_000,
            seed: 42,
            start,
            start_bid: 14_500,
            spread: 3,
            max_step: 2,
            step_seconds: 1,
        }
    }
}

pub fn generate_quotes(params: &SynthParams) -> Vec<QuoteRecord> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut bid = params.start_bid.max(1);
    let step = params.max_step.max(0);

    (0..params.ticks)
        .map(|i| {
            if i > 0 && step > 0 {
                bid = (bid + rng.gen_range(-step..=step)).max(1);
            }
            QuoteRecord {
                timestamp: params.start + Duration::seconds(params.step_seconds * i as i64),
                pair: params.pair.clone(),
                ask: bid + params.spread,
                bid,
            }
        })
        .collect()
}
