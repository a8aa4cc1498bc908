use serde::{Deserialize, Serialize};

use crate::types::Timeframe;

/// Classification of a candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    Buy,
    WeakBuy,
    #[default]
    Hold,
    WeakSell,
    Sell,
    /// Enough candles for the math, not enough margin for a crossover read.
    InsufficientData,
}

impl SignalLabel {
    /// Wire name, e.g. "WEAK_BUY".
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::Buy => "BUY",
            SignalLabel::WeakBuy => "WEAK_BUY",
            SignalLabel::Hold => "HOLD",
            SignalLabel::WeakSell => "WEAK_SELL",
            SignalLabel::Sell => "SELL",
            SignalLabel::InsufficientData => "INSUFFICIENT_DATA",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, SignalLabel::Buy | SignalLabel::WeakBuy)
    }
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indicator family that casts one vote in the consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Sma,
    Rsi,
    Macd,
    Bollinger,
}

/// Crossover predicates of one indicator on the latest candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorVote {
    pub indicator: IndicatorKind,
    pub bullish: bool,
    pub bearish: bool,
}

/// Indicator values at a single candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    /// Candle open time, Unix milliseconds.
    pub time: i64,
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
}

/// Latest signal for a symbol plus the values it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    /// Symbol as requested, upper-cased.
    pub symbol: String,
    pub timeframe: Timeframe,
    pub signal: SignalLabel,
    /// Valid candles the classification was computed over.
    pub candles: usize,
    /// Indicator values at the latest candle, absent if no candle survived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<IndicatorSnapshot>,
    /// Per-indicator crossover votes; empty for INSUFFICIENT_DATA.
    pub votes: Vec<IndicatorVote>,
    /// Unix timestamp (milliseconds) when calculated.
    pub timestamp: i64,
}
