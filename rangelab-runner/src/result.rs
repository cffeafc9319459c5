//! Replay results and artifact persistence.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rangelab_core::domain::{DecisionReason, IntentAction, PositionFacts};
use serde::{Deserialize, Serialize};

use crate::config::RunId;
use crate::runner::ReplayError;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// One executed (non-hold) decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub timestamp: DateTime<Utc>,
    pub ask: i64,
    pub bid: i64,
    pub action: IntentAction,
    pub lot: i64,
    pub reason: DecisionReason,
    pub price: i64,
    pub realized: i64,
}

/// Outcome of one pair's replay loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    pub pair: String,
    /// Quotes accepted by the engine.
    pub ticks: usize,
    /// Quotes the engine rejected (crossed, out of order).
    pub rejected: usize,
    /// Entries from flat.
    pub opens: usize,
    /// Counter-trend adds.
    pub adds: usize,
    pub closes: usize,
    /// Ticks held because the lot limit was reached.
    pub lot_limit_holds: usize,
    pub realized_profit: i64,
    pub final_position: PositionFacts,
    pub final_effective_margin: i64,
    pub decisions: Vec<DecisionRecord>,
}

/// Complete result of a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub pairs: Vec<PairReport>,
    /// Feed rows that could not be parsed.
    pub malformed_rows: usize,
    /// Feed rows naming a pair the config does not trade.
    pub unrouted_rows: usize,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ReplayResult {
    pub fn total_realized_profit(&self) -> i64 {
        self.pairs.iter().map(|p| p.realized_profit).sum()
    }

    pub fn pair(&self, name: &str) -> Option<&PairReport> {
        self.pairs.iter().find(|p| p.pair == name)
    }
}

/// Write `<run_id>.json` into `dir`, creating it if needed.
pub fn save_artifacts(result: &ReplayResult, dir: &Path) -> Result<PathBuf, ReplayError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", result.run_id));
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Read a previously saved result.
pub fn load_artifacts(path: &Path) -> Result<ReplayResult, ReplayError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReplayResult {
        ReplayResult {
            schema_version: SCHEMA_VERSION,
            run_id: "abc123".into(),
            pairs: vec![
                PairReport {
                    pair: "USDJPY".into(),
                    realized_profit: 120,
                    ..Default::default()
                },
                PairReport {
                    pair: "EURJPY".into(),
                    realized_profit: -20,
                    ..Default::default()
                },
            ],
            malformed_rows: 0,
            unrouted_rows: 0,
        }
    }

    #[test]
    fn totals_across_pairs() {
        let result = sample();
        assert_eq!(result.total_realized_profit(), 100);
        assert_eq!(result.pair("EURJPY").unwrap().realized_profit, -20);
        assert!(result.pair("GBPJPY").is_none());
    }

    #[test]
    fn older_json_without_schema_version_loads() {
        let json = r#"{"run_id":"x","pairs":[],"malformed_rows":0,"unrouted_rows":0}"#;
        let result: ReplayResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.schema_version, SCHEMA_VERSION);
    }
}
