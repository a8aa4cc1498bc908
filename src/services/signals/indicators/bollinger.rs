//! Bollinger Bands indicator.

use super::{Column, Indicator};
use crate::types::Candle;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(period)
/// - Upper band: SMA + multiplier * StdDev
/// - Lower band: SMA - multiplier * StdDev
///
/// The deviation is the sample standard deviation of the same window.
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: 2.0,
        }
    }
}

/// Upper, middle and lower band, aligned to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    /// Sample standard deviation (n - 1 denominator).
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.len() < 2 {
            return f64::NAN;
        }
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        variance.sqrt()
    }

    /// Compute the three bands over closing prices.
    pub fn bands(&self, closes: &[f64]) -> Bands {
        let len = closes.len();
        let mut bands = Bands {
            upper: vec![None; len],
            middle: vec![None; len],
            lower: vec![None; len],
        };
        if self.period == 0 || len < self.period {
            return bands;
        }

        for (i, window) in closes.windows(self.period).enumerate() {
            let at = i + self.period - 1;
            let middle = window.iter().sum::<f64>() / self.period as f64;
            // A flat window has zero deviation and collapses the bands
            let width = self.std_dev_multiplier * Self::std_dev(window, middle);

            bands.middle[at] = Some(middle);
            bands.upper[at] = Some(middle + width);
            bands.lower[at] = Some(middle - width);
        }
        bands
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<(Column, Vec<Option<f64>>)> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let bands = self.bands(&closes);
        vec![
            (Column::BbUpper, bands.upper),
            (Column::BbMiddle, bands.middle),
            (Column::BbLower, bands.lower),
        ]
    }
}
