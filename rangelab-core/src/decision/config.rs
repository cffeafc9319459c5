//! Decision loop timing parameters.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::analyzer::DEFAULT_WINDOW_MINUTES;
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Rate analyzer window.
    pub window_minutes: i64,
    /// History the analyzer must cover before any entry is considered.
    pub min_history_minutes: i64,
    /// How long a pending range accumulates before it is committed.
    pub apply_after_seconds: i64,
    /// Reset the range when the UTC date changes between ticks.
    pub reset_on_rollover: bool,
}

impl DecisionConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.window_minutes <= 0 {
            return Err(EngineError::Configuration(format!(
                "window_minutes must be > 0, got {}",
                self.window_minutes
            )));
        }
        if !(0..=self.window_minutes).contains(&self.min_history_minutes) {
            return Err(EngineError::Configuration(format!(
                "min_history_minutes must be within 0..={}, got {}",
                self.window_minutes, self.min_history_minutes
            )));
        }
        if self.apply_after_seconds <= 0 {
            return Err(EngineError::Configuration(format!(
                "apply_after_seconds must be > 0, got {}",
                self.apply_after_seconds
            )));
        }
        Ok(())
    }

    pub fn min_history(&self) -> Duration {
        Duration::minutes(self.min_history_minutes)
    }

    pub fn apply_after(&self) -> Duration {
        Duration::seconds(self.apply_after_seconds)
    }
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            min_history_minutes: 5,
            apply_after_seconds: 60,
            reset_on_rollover: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        DecisionConfig::default().validate().unwrap();
    }

    #[test]
    fn min_history_cannot_exceed_window() {
        let config = DecisionConfig {
            window_minutes: 10,
            min_history_minutes: 11,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn apply_cadence_must_be_positive() {
        let config = DecisionConfig {
            apply_after_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
