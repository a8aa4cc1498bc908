use serde::{Deserialize, Serialize};

/// Periods and multipliers for the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorConfig {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bb_period: usize,
    /// Bollinger standard-deviation multiplier.
    pub bb_std_dev: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bb_period: 20,
            bb_std_dev: 2.0,
        }
    }
}

impl IndicatorConfig {
    /// Check that the periods describe computable indicators.
    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bb_period", self.bb_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(format!("{} must be greater than zero", name));
        }
        if self.sma_fast >= self.sma_slow {
            return Err(format!(
                "sma_fast ({}) must be shorter than sma_slow ({})",
                self.sma_fast, self.sma_slow
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            ));
        }
        if self.bb_period < 2 {
            return Err("bb_period must be at least 2".to_string());
        }
        if !self.bb_std_dev.is_finite() || self.bb_std_dev <= 0.0 {
            return Err(format!(
                "bb_std_dev must be a positive number, got {}",
                self.bb_std_dev
            ));
        }
        Ok(())
    }

    /// Candles needed before the slowest indicator produces its first value.
    pub fn warmup_candles(&self) -> usize {
        [
            self.sma_slow,
            self.rsi_period + 1,
            self.macd_slow + self.macd_signal - 1,
            self.bb_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Thresholds and minimum history for the signal classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalConfig {
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Valid candles required before crossovers are read.
    pub min_candles: usize,
}

impl SignalConfig {
    /// Derive the minimum history from the indicator periods.
    ///
    /// One candle beyond the longest lookback for the indicator itself and
    /// one more so the crossover has a previous candle to compare against.
    pub fn for_indicators(indicators: &IndicatorConfig) -> Self {
        let longest = [
            indicators.sma_slow,
            indicators.rsi_period,
            indicators.macd_slow + indicators.macd_signal,
            indicators.bb_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            min_candles: longest + 2,
        }
    }

    /// Override the RSI thresholds.
    pub fn with_rsi_thresholds(mut self, overbought: f64, oversold: f64) -> Self {
        self.rsi_overbought = overbought;
        self.rsi_oversold = oversold;
        self
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::for_indicators(&IndicatorConfig::default())
    }
}

/// Indicator and classifier settings used together for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyConfig {
    pub indicators: IndicatorConfig,
    pub signals: SignalConfig,
}

impl StrategyConfig {
    /// Build a strategy whose minimum history matches its indicator periods.
    pub fn new(indicators: IndicatorConfig, overbought: f64, oversold: f64) -> Self {
        Self {
            indicators,
            signals: SignalConfig::for_indicators(&indicators)
                .with_rsi_thresholds(overbought, oversold),
        }
    }
}
