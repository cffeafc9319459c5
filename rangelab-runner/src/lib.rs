//! RangeLab Runner — quote replay around `rangelab-core`.
//!
//! This crate provides:
//! - TOML replay configuration with content-hashed run ids
//! - CSV and in-memory quote feeds
//! - A paper account standing in for the broker
//! - Per-pair replay loops, run in parallel across pairs
//! - JSON result artifacts
//! - Seeded synthetic quotes
//! - Logger setup for binaries

pub mod account;
pub mod config;
pub mod feed;
pub mod logger;
pub mod result;
pub mod runner;
pub mod synthetic;

pub use account::{AccountSource, Execution, PaperAccount};
pub use config::{AccountConfig, ConfigError, ReplayConfig, RunId};
pub use feed::{write_quotes_csv, CsvQuoteFeed, FeedError, QuoteFeed, QuoteRecord, VecFeed};
pub use logger::init_logger;
pub use result::{
    load_artifacts, save_artifacts, DecisionRecord, PairReport, ReplayResult, SCHEMA_VERSION,
};
pub use runner::{run_pair, run_replay, ReplayError};
pub use synthetic::{generate_quotes, SynthParams};
