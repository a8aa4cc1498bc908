use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{normalize_symbol, CandleSource};
use crate::error::{AppError, Result};
use crate::types::{Numeric, RawCandle, Timeframe};

/// Largest `limit` the klines endpoint accepts.
pub const MAX_KLINES: usize = 1000;

/// Binance error code for an unknown trading pair.
const INVALID_SYMBOL_CODE: i64 = -1121;

/// Binance error body.
#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i64,
    #[serde(default)]
    msg: String,
}

/// Binance REST client for historical klines.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BinanceClient {
    /// Create a new Binance client against `base_url` (e.g. `https://api.binance.com/api/v3`).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Augur/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn klines_url(&self) -> String {
        format!("{}/klines", self.base_url)
    }
}

#[async_trait]
impl CandleSource for BinanceClient {
    fn name(&self) -> &str {
        "binance"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Option<Vec<RawCandle>>> {
        let pair = normalize_symbol(symbol);
        if pair.is_empty() {
            return Ok(None);
        }
        let limit = limit.clamp(1, MAX_KLINES).to_string();

        let mut request = self.client.get(self.klines_url()).query(&[
            ("symbol", pair.as_str()),
            ("interval", timeframe.as_str()),
            ("limit", limit.as_str()),
        ]);
        if let Some(ref key) = self.api_key {
            request = request.header("X-MBX-APIKEY", key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if status == StatusCode::BAD_REQUEST && is_invalid_symbol(&text) {
                debug!("Binance does not list {}", pair);
                return Ok(None);
            }
            warn!("Binance API returned {}: {}", status, excerpt(&text, 200));
            return Err(AppError::ExternalApi(format!(
                "Binance API error: {}",
                status
            )));
        }

        let rows: Vec<Vec<Value>> = response.json().await?;
        let candles = parse_klines(&rows);
        debug!(
            "Fetched {} {} candles for {} from Binance",
            candles.len(),
            timeframe,
            pair
        );

        Ok(Some(candles))
    }
}

/// First `max_chars` characters of an error body, cut on a char boundary.
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Whether a Binance error body reports an unknown symbol.
fn is_invalid_symbol(body: &str) -> bool {
    serde_json::from_str::<BinanceError>(body)
        .map(|err| {
            debug!("Binance error {}: {}", err.code, err.msg);
            err.code == INVALID_SYMBOL_CODE
        })
        .unwrap_or(false)
}

fn numeric(value: Option<&Value>) -> Option<Numeric> {
    match value? {
        Value::Number(n) => n.as_f64().map(Numeric::Number),
        Value::String(s) => Some(Numeric::Text(s.clone())),
        _ => None,
    }
}

/// Convert kline rows `[openTime, open, high, low, close, volume, ...]`.
///
/// Rows without an integer open time are skipped; price fields are kept as
/// delivered.
fn parse_klines(rows: &[Vec<Value>]) -> Vec<RawCandle> {
    rows.iter()
        .filter_map(|row| {
            let time = row.first()?.as_i64()?;
            Some(RawCandle {
                time,
                open: numeric(row.get(1)),
                high: numeric(row.get(2)),
                low: numeric(row.get(3)),
                close: numeric(row.get(4)),
                volume: numeric(row.get(5)),
            })
        })
        .collect()
}
