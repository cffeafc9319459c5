//! Serializable replay configuration.

use std::collections::HashSet;
use std::path::Path;

use rangelab_core::decision::{DecisionConfig, PairRegistry};
use rangelab_core::domain::CurrencyPair;
use rangelab_core::sizing::LotSizing;
use rangelab_core::EngineError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a replay run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Simulated account settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Starting margin for each pair's paper account.
    pub initial_margin: i64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            initial_margin: 3_000_000,
        }
    }
}

/// Everything needed to reproduce a replay:
/// - account settings
/// - decision loop timing
/// - lot sizing policies
/// - traded pairs and their broker metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub engine: DecisionConfig,
    #[serde(default)]
    pub sizing: LotSizing,
    pub pairs: Vec<CurrencyPair>,
}

impl ReplayConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account.initial_margin <= 0 {
            return Err(ConfigError::Invalid(format!(
                "account.initial_margin must be > 0, got {}",
                self.account.initial_margin
            )));
        }
        if self.pairs.is_empty() {
            return Err(ConfigError::Invalid("at least one [[pairs]] entry is required".into()));
        }
        let mut seen = HashSet::new();
        for pair in &self.pairs {
            pair.validate()?;
            if !seen.insert(pair.name.as_str()) {
                return Err(ConfigError::Invalid(format!("pair {} listed twice", pair.name)));
            }
        }
        self.engine.validate()?;
        self.sizing.validate()?;
        Ok(())
    }

    /// One trader per configured pair, all sharing the engine and sizing settings.
    pub fn build_registry(&self) -> Result<PairRegistry, ConfigError> {
        let mut registry = PairRegistry::new();
        for pair in &self.pairs {
            registry.register(pair.clone(), self.engine.clone(), self.sizing.clone())?;
        }
        Ok(registry)
    }

    /// Deterministic hash of the configuration.
    ///
    /// Two replays with identical configs share a RunId, so their artifacts
    /// land in the same file.
    pub fn run_id(&self) -> RunId {
        // Plain structs, string keys, integer fields: serialization is infallible.
        let json = serde_json::to_vec(self).expect("ReplayConfig serializes to JSON");
        let hex = blake3::hash(&json).to_hex();
        hex.as_str()[..16].to_string()
    }
}
