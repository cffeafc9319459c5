//! Quote feeds — pull-style sources of rates.
//!
//! The engine never reads quotes itself. A feed turns an external source
//! (a CSV recording here) into `Rate`s for the configured pairs.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rangelab_core::domain::{CurrencyPair, Rate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("open quote file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed quote row: {0}")]
    Csv(#[from] csv::Error),
    #[error("quote for unconfigured pair {0}")]
    UnknownPair(String),
}

/// One CSV row: `timestamp,pair,ask,bid` with RFC 3339 timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub timestamp: DateTime<Utc>,
    pub pair: String,
    pub ask: i64,
    pub bid: i64,
}

/// Pull-style rate source. `None` means the feed is exhausted.
pub trait QuoteFeed {
    fn next_rate(&mut self) -> Option<Result<Rate, FeedError>>;
}

/// Resolves pair names to the shared metadata attached to each rate.
fn pair_lookup(pairs: &[CurrencyPair]) -> HashMap<String, Arc<CurrencyPair>> {
    pairs
        .iter()
        .map(|p| (p.name.clone(), Arc::new(p.clone())))
        .collect()
}

fn to_rate(
    lookup: &HashMap<String, Arc<CurrencyPair>>,
    record: QuoteRecord,
) -> Result<Rate, FeedError> {
    let pair = lookup
        .get(&record.pair)
        .ok_or_else(|| FeedError::UnknownPair(record.pair.clone()))?;
    Ok(Rate::new(pair.clone(), record.ask, record.bid, record.timestamp))
}

/// Streams rates from CSV with a header row.
pub struct CsvQuoteFeed<R: Read> {
    rows: csv::DeserializeRecordsIntoIter<R, QuoteRecord>,
    pairs: HashMap<String, Arc<CurrencyPair>>,
}

impl CsvQuoteFeed<File> {
    pub fn from_path(path: &Path, pairs: &[CurrencyPair]) -> Result<Self, FeedError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, pairs))
    }
}

impl<R: Read> CsvQuoteFeed<R> {
    pub fn from_reader(reader: R, pairs: &[CurrencyPair]) -> Self {
        let rows = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize();
        Self {
            rows,
            pairs: pair_lookup(pairs),
        }
    }
}

impl<R: Read> QuoteFeed for CsvQuoteFeed<R> {
    fn next_rate(&mut self) -> Option<Result<Rate, FeedError>> {
        let row = self.rows.next()?;
        Some(row.map_err(FeedError::from).and_then(|r| to_rate(&self.pairs, r)))
    }
}

/// In-memory feed over pre-built records.
pub struct VecFeed {
    records: std::vec::IntoIter<QuoteRecord>,
    pairs: HashMap<String, Arc<CurrencyPair>>,
}

impl VecFeed {
    pub fn new(records: Vec<QuoteRecord>, pairs: &[CurrencyPair]) -> Self {
        Self {
            records: records.into_iter(),
            pairs: pair_lookup(pairs),
        }
    }
}

impl QuoteFeed for VecFeed {
    fn next_rate(&mut self) -> Option<Result<Rate, FeedError>> {
        let record = self.records.next()?;
        Some(to_rate(&self.pairs, record))
    }
}

/// Write records as CSV with a header row.
pub fn write_quotes_csv(path: &Path, records: &[QuoteRecord]) -> Result<(), FeedError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<CurrencyPair> {
        vec![CurrencyPair::new("USDJPY", 3, 50_000).unwrap()]
    }

    #[test]
    fn reads_csv_rows() {
        let csv = "timestamp,pair,ask,bid\n\
                   2024-01-02T09:00:00Z,USDJPY,14503,14500\n\
                   2024-01-02T09:00:01Z, USDJPY ,14504,14501\n";
        let mut feed = CsvQuoteFeed::from_reader(csv.as_bytes(), &pairs());
        let first = feed.next_rate().unwrap().unwrap();
        assert_eq!((first.ask, first.bid), (14_503, 14_500));
        assert_eq!(first.pair.margin_requirement, 50_000);
        let second = feed.next_rate().unwrap().unwrap();
        assert_eq!(second.ask, 14_504);
        assert!(feed.next_rate().is_none());
    }

    #[test]
    fn malformed_row_is_reported_and_feed_continues() {
        let csv = "timestamp,pair,ask,bid\n\
                   not-a-time,USDJPY,14503,14500\n\
                   2024-01-02T09:00:01Z,USDJPY,14504,14501\n";
        let mut feed = CsvQuoteFeed::from_reader(csv.as_bytes(), &pairs());
        assert!(matches!(feed.next_rate(), Some(Err(FeedError::Csv(_)))));
        assert!(feed.next_rate().unwrap().is_ok());
    }

    #[test]
    fn unknown_pair_is_reported() {
        let csv = "timestamp,pair,ask,bid\n2024-01-02T09:00:00Z,GBPJPY,19003,19000\n";
        let mut feed = CsvQuoteFeed::from_reader(csv.as_bytes(), &pairs());
        assert!(matches!(
            feed.next_rate(),
            Some(Err(FeedError::UnknownPair(name))) if name == "GBPJPY"
        ));
    }
}
