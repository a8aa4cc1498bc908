//! HTTP API tests against the in-process router

use augur::config::Config;
use augur::services::SignalService;
use augur::{api, AppState, Candle, MemorySource, RawCandle, Timeframe};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app() -> Router {
    let mut closes = vec![100.0; 79];
    closes.push(101.0);
    let candles: Vec<RawCandle> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| Candle::flat(i as i64 * 3_600_000, *close, 1_000.0).into())
        .collect();

    let source = MemorySource::new();
    source.insert("BTC", Timeframe::FourHours, candles.clone());
    source.insert("ETH", Timeframe::OneHour, candles);

    let config = Config::default();
    let service = SignalService::new(Arc::new(source), config.strategy, Duration::ZERO);
    api::router().with_state(AppState {
        config: Arc::new(config),
        signal_service: Arc::new(service),
    })
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_signals_default_timeframe() {
    let (status, body) = get("/api/signals/btc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["cached"], false);

    let data = &body["data"];
    assert_eq!(data["symbol"], "BTC");
    assert_eq!(data["timeframe"], "4h");
    assert_eq!(data["signal"], "BUY");
    assert_eq!(data["candles"], 80);
    assert_eq!(data["latest"]["close"], 101.0);
    assert!(data["latest"]["smaFast"].is_number());
    assert_eq!(data["votes"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn test_signals_explicit_timeframe_and_limit() {
    let (status, body) = get("/api/signals/ETH?timeframe=1h&limit=51").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["signal"], "INSUFFICIENT_DATA");
    assert_eq!(body["data"]["candles"], 51);
}

#[tokio::test]
async fn test_signals_invalid_timeframe() {
    let (status, body) = get("/api/signals/BTC?timeframe=3h").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_signals_unknown_symbol() {
    let (status, _) = get("/api/signals/DOGE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signals_short_history() {
    let (status, body) = get("/api/signals/BTC?limit=10").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("insufficient history"));
}

#[tokio::test]
async fn test_batch_signals() {
    let (status, body) = get("/api/signals?symbols=BTC,DOGE&timeframe=4h").await;
    assert_eq!(status, StatusCode::OK);

    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["symbol"], "BTC");
    assert_eq!(entries[0]["report"]["signal"], "BUY");
    assert_eq!(entries[1]["symbol"], "DOGE");
    assert!(entries[1]["error"].is_string());
}

#[tokio::test]
async fn test_batch_signals_requires_symbols() {
    let (status, _) = get("/api/signals?symbols=,").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
