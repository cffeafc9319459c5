//! Per-pair decision loop and the registry that owns one loop per pair.

pub mod config;
pub mod registry;
pub mod trader;

pub use config::DecisionConfig;
pub use registry::PairRegistry;
pub use trader::PairTrader;
