//! Signal service: fetch candles, compute indicators, classify.

use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::cache::{CandleCache, CandleKey};
use super::signals::{classify, compute_indicators, ClassifiedFrame};
use crate::error::{AppError, Result};
use crate::sources::CandleSource;
use crate::types::{RawCandle, SignalReport, StrategyConfig, Timeframe};

/// Runs the indicator engine and classifier over candles from a source.
pub struct SignalService {
    source: Arc<dyn CandleSource>,
    strategy: StrategyConfig,
    cache: CandleCache,
}

impl SignalService {
    /// Create a service. A zero `cache_ttl` disables candle caching.
    pub fn new(
        source: Arc<dyn CandleSource>,
        strategy: StrategyConfig,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            source,
            strategy,
            cache: CandleCache::new(cache_ttl),
        }
    }

    pub fn strategy(&self) -> &StrategyConfig {
        &self.strategy
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Fetch a candle window, reusing a cached one while it is fresh.
    async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Arc<Vec<RawCandle>>> {
        let key = CandleKey::new(symbol, timeframe, limit);
        if let Some(candles) = self.cache.get(&key) {
            debug!("Candle cache hit for {} {} x{}", key.symbol, timeframe, limit);
            return Ok(candles);
        }

        let candles = self
            .source
            .fetch_candles(symbol, timeframe, limit)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No {} candles available for {} from {}",
                    timeframe,
                    key.symbol,
                    self.source.name()
                ))
            })?;

        Ok(self.cache.insert(key, candles))
    }

    /// Classify the latest candle for `symbol`.
    pub async fn analyze(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<SignalReport> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::BadRequest("symbol must not be empty".to_string()));
        }
        if limit == 0 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }

        let candles = self.candles(symbol, timeframe, limit).await?;
        let classified = self.classify_candles(&candles)?;
        let report = build_report(symbol, timeframe, &classified);

        info!(
            "{} {}: {} over {} candles",
            report.symbol, timeframe, report.signal, report.candles
        );
        Ok(report)
    }

    /// Analyze several symbols concurrently. Results keep the input order.
    pub async fn analyze_many(
        &self,
        symbols: &[String],
        timeframe: Timeframe,
        limit: usize,
    ) -> Vec<(String, Result<SignalReport>)> {
        let results = join_all(
            symbols
                .iter()
                .map(|symbol| self.analyze(symbol, timeframe, limit)),
        )
        .await;

        symbols.iter().cloned().zip(results).collect()
    }

    /// Run both pipeline stages over an already fetched window.
    pub fn classify_candles(&self, candles: &[RawCandle]) -> Result<ClassifiedFrame> {
        let frame = compute_indicators(candles, &self.strategy.indicators)?;
        Ok(classify(&frame, &self.strategy.signals)?)
    }

    /// Drop expired candle windows.
    pub fn purge_cache(&self) {
        self.cache.purge_expired();
    }
}

fn build_report(symbol: &str, timeframe: Timeframe, classified: &ClassifiedFrame) -> SignalReport {
    SignalReport {
        symbol: symbol.to_uppercase(),
        timeframe,
        signal: classified.latest_signal(),
        candles: classified.frame.len(),
        latest: classified.frame.latest_snapshot(),
        votes: classified.votes.clone(),
        timestamp: chrono::Utc::now().timestamp_millis(),
    }
}
