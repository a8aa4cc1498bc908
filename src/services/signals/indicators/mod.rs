//! Indicator engine.
//!
//! Turns a raw candle series into an [`IndicatorFrame`]: the coerced candles
//! plus SMA fast/slow, RSI, MACD and Bollinger columns, with warm-up gaps
//! resolved and unusable candles pruned.

pub mod bollinger;
pub mod ema;
pub mod fill;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::BollingerBands;
pub use frame::{Column, IndicatorFrame};
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{coerce_series, Candle, IndicatorConfig, RawCandle};

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of candles before the first value is defined.
    fn min_periods(&self) -> usize;

    /// Compute the indicator's columns over the full series.
    /// Every returned column has one entry per candle.
    fn compute(&self, candles: &[Candle]) -> Vec<(Column, Vec<Option<f64>>)>;
}

/// Indicator engine failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("no valid candles in input")]
    EmptyInput,

    #[error("insufficient history: {candles} valid candles, indicators need at least {required}")]
    InsufficientHistory { candles: usize, required: usize },

    #[error("invalid indicator configuration: {0}")]
    InvalidConfig(String),
}

/// Indicators configured for one engine run.
pub fn configured_indicators(config: &IndicatorConfig) -> Vec<Box<dyn Indicator>> {
    vec![
        // Trend
        Box::new(Sma::new(config.sma_fast, Column::SmaFast)),
        Box::new(Sma::new(config.sma_slow, Column::SmaSlow)),
        Box::new(Macd::new(config.macd_fast, config.macd_slow, config.macd_signal)),
        // Momentum
        Box::new(Rsi::new(config.rsi_period)),
        // Volatility
        Box::new(BollingerBands::new(config.bb_period, config.bb_std_dev)),
    ]
}

/// Replace a column containing non-finite values with an undefined one.
fn guard_column(indicator: &str, column: Column, values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    match values.iter().flatten().position(|v| !v.is_finite()) {
        Some(_) => {
            warn!(
                "{} produced non-finite values for '{}'; column marked unusable",
                indicator, column
            );
            vec![None; values.len()]
        }
        None => values,
    }
}

/// Compute every indicator column for a candle series.
///
/// Candles with a missing or non-numeric field are dropped first. Indicator
/// warm-up gaps are forward- then back-filled; a column that never produced a
/// value stays undefined and every candle is then pruned for lacking it.
pub fn compute_indicators(
    candles: &[RawCandle],
    config: &IndicatorConfig,
) -> Result<IndicatorFrame, IndicatorError> {
    config.validate().map_err(IndicatorError::InvalidConfig)?;

    let series = coerce_series(candles);
    if series.len() < candles.len() {
        warn!(
            "Dropped {} invalid or duplicate candles before indicator calculation",
            candles.len() - series.len()
        );
    }
    if series.is_empty() {
        return Err(IndicatorError::EmptyInput);
    }

    let mut columns: BTreeMap<Column, Vec<Option<f64>>> = BTreeMap::new();
    for indicator in configured_indicators(config) {
        if series.len() < indicator.min_periods() {
            debug!(
                "{} needs {} candles, have {}",
                indicator.name(),
                indicator.min_periods(),
                series.len()
            );
        }
        for (column, values) in indicator.compute(&series) {
            columns.insert(column, guard_column(indicator.name(), column, values));
        }
    }

    let mut backfilled = BTreeMap::new();
    for (column, values) in columns.iter_mut() {
        match fill::fill_warmup(values) {
            Some(count) => {
                backfilled.insert(*column, count);
            }
            None => warn!("Column '{}' is entirely undefined and cannot be filled", column),
        }
    }

    let total = series.len();
    let frame = IndicatorFrame::from_parts(series, columns).with_backfilled(backfilled);
    let frame = frame.retain_positions(|i| {
        Column::CRITICAL
            .iter()
            .all(|column| frame.value(*column, i).is_some())
    });

    if frame.len() < total {
        debug!(
            "Dropped {} candles missing critical indicators after filling",
            total - frame.len()
        );
    }

    if frame.is_empty() {
        return Err(IndicatorError::InsufficientHistory {
            candles: total,
            required: config.warmup_candles(),
        });
    }

    debug!("Computed indicators over {} candles", frame.len());
    Ok(frame)
}
