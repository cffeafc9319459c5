//! RangeLab Core — range tracking and position sizing engine for FX scalping.
//!
//! This crate contains the stateful heart of the strategy:
//! - Domain types (pairs, rates, snapshots, order intents)
//! - Rate analyzer: bounded-duration max-ask / min-bid history
//! - Range manager: save/apply/reset range protocol with extension detection
//! - Lot sizing policies driven by configuration
//! - Per-pair decision loop and the registry that owns one loop per pair
//!
//! Everything here is synchronous and performs no I/O.

pub mod analyzer;
pub mod decision;
pub mod domain;
pub mod error;
pub mod range;
pub mod sizing;

pub use error::{EngineError, EngineResult};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: per-pair state can move onto a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Rate>();
        require_sync::<domain::Rate>();
        require_send::<domain::Snapshot>();
        require_sync::<domain::Snapshot>();
        require_send::<domain::OrderIntent>();
        require_sync::<domain::OrderIntent>();

        // Stateful components
        require_send::<analyzer::RateAnalyzer>();
        require_sync::<analyzer::RateAnalyzer>();
        require_send::<range::RangeManager>();
        require_sync::<range::RangeManager>();
        require_send::<decision::PairTrader>();
        require_sync::<decision::PairTrader>();
        require_send::<decision::PairRegistry>();
        require_sync::<decision::PairRegistry>();

        // Policies
        require_send::<sizing::LotSizing>();
        require_sync::<sizing::LotSizing>();
    }

    /// Architecture contract: sizing policies see only the snapshot.
    ///
    /// `SizingPolicy::evaluate` takes `&Snapshot` and nothing else, so a policy
    /// cannot read or mutate range state.
    #[test]
    fn sizing_policy_reads_only_the_snapshot() {
        fn _check_trait_object_builds(
            policy: &dyn sizing::SizingPolicy,
            snapshot: &domain::Snapshot,
        ) -> i64 {
            policy.evaluate(snapshot)
        }
    }
}
