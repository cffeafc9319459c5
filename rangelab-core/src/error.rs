//! Error taxonomy for the engine.
//!
//! Every variant is recoverable from the caller's side: it means "bad input"
//! or "not enough data yet". The component that raised it keeps its
//! invariants intact.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Out-of-order or malformed quote.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Extrema requested before any rate was recorded.
    #[error("rate history is empty")]
    EmptyHistory,

    /// Range arithmetic requested before the bounds were set.
    #[error("{0} bounds are not set")]
    UnsetState(&'static str),

    /// Bad policy or pair parameter (e.g. a zero denominator).
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
