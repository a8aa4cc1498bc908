//! Candle sources.
//!
//! A source delivers raw OHLCV candles for a symbol and timeframe. Values are
//! passed through unvalidated; coercion belongs to the indicator engine.

pub mod binance;
pub mod memory;

pub use binance::BinanceClient;
pub use memory::MemorySource;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RawCandle, Timeframe};

/// Quote assets recognised at the end of a trading pair.
const QUOTE_ASSETS: &[&str] = &[
    "USDT", "FDUSD", "USDC", "BUSD", "TUSD", "BTC", "ETH", "BNB", "EUR", "TRY",
];

/// Quote asset appended to bare base symbols.
const DEFAULT_QUOTE: &str = "USDT";

/// Provider of historical candles.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Source name used in logs.
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent candles, oldest first.
    ///
    /// `Ok(None)` means the source does not know the symbol. Fewer than
    /// `limit` candles is a valid answer.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Option<Vec<RawCandle>>>;
}

/// Normalize a user-supplied symbol to an exchange trading pair.
///
/// `btc` becomes `BTCUSDT`, `BTC/USDT` becomes `BTCUSDT` and a full pair such
/// as `ETHBTC` is kept.
pub fn normalize_symbol(symbol: &str) -> String {
    let pair: String = symbol
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '-' | '_' | ' '))
        .collect::<String>()
        .to_uppercase();

    let has_quote = QUOTE_ASSETS
        .iter()
        .any(|quote| pair.len() >= quote.len() + 2 && pair.ends_with(quote));

    if has_quote || pair.is_empty() {
        pair
    } else {
        format!("{}{}", pair, DEFAULT_QUOTE)
    }
}
