//! Integration tests for services and candle sources

use augur::services::{CandleCache, CandleKey, SignalService};
use augur::{
    AppError, Candle, CandleSource, IndicatorConfig, IndicatorError, MemorySource, RawCandle,
    SignalLabel, StrategyConfig, Timeframe,
};
use std::sync::Arc;
use std::time::Duration;

const HOUR_MS: i64 = 3_600_000;

fn raw_series(closes: &[f64]) -> Vec<RawCandle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| Candle::flat(i as i64 * HOUR_MS, *close, 1_000.0).into())
        .collect()
}

fn breakout_series() -> Vec<RawCandle> {
    let mut closes = vec![100.0; 99];
    closes.push(101.0);
    raw_series(&closes)
}

fn service(source: MemorySource, ttl: Duration) -> SignalService {
    SignalService::new(Arc::new(source), StrategyConfig::default(), ttl)
}

// ============================================================================
// CandleCache
// ============================================================================

#[test]
fn test_cache_set_and_get() {
    let cache = CandleCache::new(Duration::from_secs(60));
    let key = CandleKey::new("btcusdt", Timeframe::FourHours, 500);

    cache.insert(key.clone(), raw_series(&[1.0, 2.0]));
    assert_eq!(cache.get(&key).map(|c| c.len()), Some(2));
    assert!(cache
        .get(&CandleKey::new("BTCUSDT", Timeframe::FourHours, 100))
        .is_none());
}

#[test]
fn test_cache_expiration() {
    let cache = CandleCache::new(Duration::from_millis(10));
    let key = CandleKey::new("ETH", Timeframe::OneHour, 10);
    cache.insert(key.clone(), raw_series(&[1.0]));

    std::thread::sleep(Duration::from_millis(20));
    assert!(cache.get(&key).is_none());
}

// ============================================================================
// MemorySource
// ============================================================================

#[test]
fn test_memory_source_normalizes_symbols() {
    let source = MemorySource::new();
    source.insert("BTC/USDT", Timeframe::OneDay, raw_series(&[1.0, 2.0, 3.0]));

    let candles = tokio_test::block_on(source.fetch_candles("btc", Timeframe::OneDay, 2))
        .unwrap()
        .unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(source.name(), "memory");
}

// ============================================================================
// SignalService
// ============================================================================

#[tokio::test]
async fn test_service_reports_breakout() {
    let source = MemorySource::new();
    source.insert("ETH", Timeframe::FourHours, breakout_series());
    let service = service(source, Duration::from_secs(30));

    let report = service
        .analyze("eth", Timeframe::FourHours, 500)
        .await
        .unwrap();
    assert_eq!(report.symbol, "ETH");
    assert_eq!(report.timeframe, Timeframe::FourHours);
    assert_eq!(report.signal, SignalLabel::Buy);
    assert_eq!(report.candles, 100);
    assert_eq!(report.latest.as_ref().map(|l| l.close), Some(101.0));
    assert!(report.timestamp > 0);
}

#[tokio::test]
async fn test_service_limit_selects_newest_window() {
    let source = MemorySource::new();
    source.insert("ETH", Timeframe::FourHours, breakout_series());
    let service = service(source, Duration::ZERO);

    let report = service.analyze("ETH", Timeframe::FourHours, 60).await.unwrap();
    assert_eq!(report.candles, 60);
    assert_eq!(report.signal, SignalLabel::Buy);
}

#[tokio::test]
async fn test_service_short_window_is_insufficient_data() {
    let source = MemorySource::new();
    source.insert("ETH", Timeframe::FourHours, breakout_series());
    let service = service(source, Duration::ZERO);

    // Enough for the indicators, too few for a crossover read
    let report = service.analyze("ETH", Timeframe::FourHours, 51).await.unwrap();
    assert_eq!(report.candles, 51);
    assert_eq!(report.signal, SignalLabel::InsufficientData);
    assert!(report.votes.is_empty());
}

#[tokio::test]
async fn test_service_errors() {
    let source = MemorySource::new();
    source.insert("ETH", Timeframe::FourHours, breakout_series());
    let service = service(source, Duration::ZERO);

    let err = service.analyze("SOL", Timeframe::FourHours, 100).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service.analyze("ETH", Timeframe::OneDay, 100).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = service.analyze("ETH", Timeframe::FourHours, 20).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Indicator(IndicatorError::InsufficientHistory { candles: 20, .. })
    ));
}

#[tokio::test]
async fn test_service_rejects_invalid_strategy() {
    let source = MemorySource::new();
    source.insert("ETH", Timeframe::FourHours, breakout_series());
    let indicators = IndicatorConfig {
        macd_fast: 30,
        ..Default::default()
    };
    let service = SignalService::new(
        Arc::new(source),
        StrategyConfig::new(indicators, 70.0, 30.0),
        Duration::ZERO,
    );

    let err = service.analyze("ETH", Timeframe::FourHours, 100).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Indicator(IndicatorError::InvalidConfig(_))
    ));
}

#[tokio::test]
async fn test_analyze_many_runs_each_symbol() {
    let source = MemorySource::new();
    source.insert("ETH", Timeframe::OneHour, breakout_series());
    source.insert("BTC", Timeframe::OneHour, raw_series(&[100.0; 80]));
    let service = service(source, Duration::from_secs(30));

    let symbols: Vec<String> = ["ETH", "BTC", "XRP"].iter().map(|s| s.to_string()).collect();
    let results = service.analyze_many(&symbols, Timeframe::OneHour, 500).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].1.as_ref().unwrap().signal, SignalLabel::Buy);
    assert_eq!(results[1].1.as_ref().unwrap().signal, SignalLabel::Hold);
    assert!(results[2].1.is_err());
}
