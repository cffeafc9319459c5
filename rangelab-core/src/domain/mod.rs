//! Domain types for RangeLab

pub mod intent;
pub mod pair;
pub mod rate;
pub mod snapshot;

pub use intent::{DecisionReason, IntentAction, OrderIntent};
pub use pair::CurrencyPair;
pub use rate::Rate;
pub use snapshot::{AccountFacts, PositionFacts, PositionStatus, Snapshot};

/// Pair name type alias
pub type PairName = String;
