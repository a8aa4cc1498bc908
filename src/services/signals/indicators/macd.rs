//! MACD (Moving Average Convergence Divergence) indicator.

use super::ema::ema;
use super::{Column, Indicator};
use crate::types::Candle;

/// MACD indicator.
///
/// Shows the relationship between two EMAs:
/// - MACD Line = EMA(fast) - EMA(slow)
/// - Signal Line = EMA(signal) of MACD Line
/// - Histogram = MACD Line - Signal Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD line, signal line and histogram, aligned to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// Compute all three MACD series over closing prices.
    ///
    /// The line is defined from position `slow - 1`. The signal EMA is seeded
    /// from the first `signal` line values, so the signal and histogram start
    /// at position `slow + signal - 2` and need `slow + signal - 1` candles.
    pub fn series(&self, closes: &[f64]) -> MacdSeries {
        let len = closes.len();
        let fast = ema(closes, self.fast_period);
        let slow = ema(closes, self.slow_period);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        // Signal line runs over the defined tail of the MACD line
        let mut signal = vec![None; len];
        if let Some(start) = line.iter().position(Option::is_some) {
            let defined: Vec<f64> = line[start..].iter().map(|v| v.unwrap_or(0.0)).collect();
            for (offset, value) in ema(&defined, self.signal_period).into_iter().enumerate() {
                signal[start + offset] = value;
            }
        }

        let histogram = line
            .iter()
            .zip(&signal)
            .map(|(m, s)| Some((*m)? - (*s)?))
            .collect();

        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "MACD"
    }

    fn min_periods(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<(Column, Vec<Option<f64>>)> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let series = self.series(&closes);
        vec![
            (Column::Macd, series.line),
            (Column::MacdSignal, series.signal),
            (Column::MacdHist, series.histogram),
        ]
    }
}
