use async_trait::async_trait;
use dashmap::DashMap;

use super::{normalize_symbol, CandleSource};
use crate::error::Result;
use crate::types::{RawCandle, Timeframe};

/// In-memory candle source.
///
/// Serves preloaded series, e.g. candles replayed from a file or fixtures in
/// tests. Symbols are normalized the same way as for exchange sources.
#[derive(Default)]
pub struct MemorySource {
    series: DashMap<String, Vec<RawCandle>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(symbol: &str, timeframe: Timeframe) -> String {
        format!("{}:{}", normalize_symbol(symbol), timeframe)
    }

    /// Replace the series for a symbol and timeframe. Candles are stored
    /// oldest first.
    pub fn insert(&self, symbol: &str, timeframe: Timeframe, mut candles: Vec<RawCandle>) {
        candles.sort_by_key(|c| c.time);
        self.series.insert(Self::key(symbol, timeframe), candles);
    }

    /// Append candles to an existing series, creating it if absent.
    pub fn extend(&self, symbol: &str, timeframe: Timeframe, candles: Vec<RawCandle>) {
        let mut entry = self.series.entry(Self::key(symbol, timeframe)).or_default();
        entry.extend(candles);
        entry.sort_by_key(|c| c.time);
    }

    /// Drop the series for a symbol and timeframe.
    pub fn remove(&self, symbol: &str, timeframe: Timeframe) -> Option<Vec<RawCandle>> {
        self.series
            .remove(&Self::key(symbol, timeframe))
            .map(|(_, candles)| candles)
    }

    /// Number of stored series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait]
impl CandleSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Option<Vec<RawCandle>>> {
        Ok(self.series.get(&Self::key(symbol, timeframe)).map(|series| {
            let start = series.len().saturating_sub(limit);
            series[start..].to_vec()
        }))
    }
}
