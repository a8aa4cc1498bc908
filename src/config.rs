use std::env;
use std::time::Duration;

use crate::types::{IndicatorConfig, StrategyConfig, Timeframe};

const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Binance REST base URL.
    pub binance_api_url: String,
    /// Binance API key (optional, public endpoints work without).
    pub binance_api_key: Option<String>,
    /// Timeframe used when a request does not name one.
    pub default_timeframe: Timeframe,
    /// Candle count used when a request does not name one.
    pub default_limit: usize,
    /// How long fetched candle windows are reused.
    pub candle_cache_ttl: Duration,
    /// Indicator periods and classifier thresholds.
    pub strategy: StrategyConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unset or unparseable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f64>().ok());
        let period = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        let defaults = IndicatorConfig::default();
        let indicators = IndicatorConfig {
            sma_fast: period("SMA_FAST_PERIOD", defaults.sma_fast),
            sma_slow: period("SMA_SLOW_PERIOD", defaults.sma_slow),
            rsi_period: period("RSI_PERIOD", defaults.rsi_period),
            macd_fast: period("MACD_FAST_PERIOD", defaults.macd_fast),
            macd_slow: period("MACD_SLOW_PERIOD", defaults.macd_slow),
            macd_signal: period("MACD_SIGNAL_PERIOD", defaults.macd_signal),
            bb_period: period("BBANDS_PERIOD", defaults.bb_period),
            bb_std_dev: parsed("BBANDS_DEV").unwrap_or(defaults.bb_std_dev),
        };
        let strategy = StrategyConfig::new(
            indicators,
            parsed("RSI_OVERBOUGHT").unwrap_or(70.0),
            parsed("RSI_OVERSOLD").unwrap_or(30.0),
        );

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            binance_api_url: lookup("BINANCE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| BINANCE_API_URL.to_string()),
            binance_api_key: lookup("BINANCE_API_KEY").filter(|key| !key.is_empty()),
            default_timeframe: lookup("DEFAULT_TIMEFRAME")
                .and_then(|v| Timeframe::from_str(v.trim()))
                .unwrap_or_default(),
            default_limit: lookup("DEFAULT_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(500),
            candle_cache_ttl: Duration::from_secs(
                lookup("CANDLE_CACHE_TTL_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            strategy,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
