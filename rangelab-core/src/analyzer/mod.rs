//! Rolling quote statistics.

pub mod rate_analyzer;

pub use rate_analyzer::{RateAnalyzer, DEFAULT_WINDOW_MINUTES};
