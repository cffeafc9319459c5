//! Rate analyzer — bounded-duration quote history with max-ask / min-bid.
//!
//! The window is measured against the newest rate's own timestamp, never
//! wall-clock time, so replays are deterministic.

use std::collections::VecDeque;

use chrono::Duration;

use crate::domain::Rate;
use crate::error::{EngineError, EngineResult};

/// Default history window.
pub const DEFAULT_WINDOW_MINUTES: i64 = 10;

#[derive(Debug, Clone)]
pub struct RateAnalyzer {
    history: VecDeque<Rate>,
    window: Duration,
}

impl RateAnalyzer {
    pub fn new(window_minutes: i64) -> EngineResult<Self> {
        if window_minutes <= 0 {
            return Err(EngineError::Configuration(format!(
                "analyzer window must be > 0 minutes, got {window_minutes}"
            )));
        }
        Ok(Self {
            history: VecDeque::new(),
            window: Duration::minutes(window_minutes),
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Append `rate` and evict everything older than the window.
    ///
    /// An out-of-order timestamp is rejected and leaves the history untouched.
    pub fn add(&mut self, rate: Rate) -> EngineResult<()> {
        if let Some(last) = self.history.back() {
            if rate.timestamp < last.timestamp {
                return Err(EngineError::InvalidInput(format!(
                    "{} rate at {} is earlier than last recorded {}",
                    rate.pair.name, rate.timestamp, last.timestamp
                )));
            }
        }

        let now = rate.timestamp;
        self.history.push_back(rate);
        while let Some(front) = self.history.front() {
            if now - front.timestamp > self.window {
                self.history.pop_front();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Time covered by the retained history; zero when empty.
    pub fn rates_duration(&self) -> Duration {
        match (self.history.front(), self.history.back()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => Duration::zero(),
        }
    }

    pub fn max_ask(&self) -> EngineResult<i64> {
        self.history
            .iter()
            .map(|r| r.ask)
            .max()
            .ok_or(EngineError::EmptyHistory)
    }

    pub fn min_bid(&self) -> EngineResult<i64> {
        self.history
            .iter()
            .map(|r| r.bid)
            .min()
            .ok_or(EngineError::EmptyHistory)
    }

    pub fn latest(&self) -> Option<&Rate> {
        self.history.back()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for RateAnalyzer {
    fn default() -> Self {
        Self {
            history: VecDeque::new(),
            window: Duration::minutes(DEFAULT_WINDOW_MINUTES),
        }
    }
}
