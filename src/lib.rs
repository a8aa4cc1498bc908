//! Augur - technical-analysis signal engine
//!
//! Turns OHLCV candles into SMA, RSI, MACD and Bollinger Band columns and
//! classifies the latest candle by indicator consensus.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use std::sync::Arc;

use config::Config;
use services::SignalService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signal_service: Arc<SignalService>,
}

// Re-export commonly used types
pub use error::{AppError, Result};
pub use services::signals::{
    classify, compute_indicators, Column, IndicatorError, IndicatorFrame, SchemaError,
};
pub use sources::{normalize_symbol, BinanceClient, CandleSource, MemorySource};
pub use types::*;
