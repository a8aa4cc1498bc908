//! Simple Moving Average (SMA) indicator.

use super::{Column, Indicator};
use crate::types::Candle;

/// SMA (Simple Moving Average) indicator.
///
/// Arithmetic mean of the closing price over the trailing `period` candles.
/// The engine runs two of these, fast and slow, for the crossover vote.
pub struct Sma {
    period: usize,
    column: Column,
}

impl Sma {
    pub fn new(period: usize, column: Column) -> Self {
        Self { period, column }
    }
}

/// Trailing mean of `values`; undefined until `period` values are available.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for (i, window) in values.windows(period).enumerate() {
        out[i + period - 1] = Some(window.iter().sum::<f64>() / period as f64);
    }
    out
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        match self.column {
            Column::SmaFast => "SMA (fast)",
            _ => "SMA (slow)",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<(Column, Vec<Option<f64>>)> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        vec![(self.column, sma(&closes, self.period))]
    }
}
