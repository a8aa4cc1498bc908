use serde::{Deserialize, Serialize};

/// A raw numeric field as delivered by a candle source.
///
/// Exchanges are inconsistent about encoding prices: some send JSON numbers,
/// Binance sends decimal strings. Both are accepted here and coerced later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Coerce to a finite float, `None` if the value is not numeric.
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Numeric::Text(value.to_string())
    }
}

/// Candle as received from a source, before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    /// Open time, Unix milliseconds.
    pub time: i64,
    pub open: Option<Numeric>,
    pub high: Option<Numeric>,
    pub low: Option<Numeric>,
    pub close: Option<Numeric>,
    pub volume: Option<Numeric>,
}

impl RawCandle {
    /// Convert to a validated candle. All five fields are required.
    pub fn coerce(&self) -> Option<Candle> {
        let field = |v: &Option<Numeric>| v.as_ref().and_then(Numeric::coerce);
        Some(Candle {
            time: self.time,
            open: field(&self.open)?,
            high: field(&self.high)?,
            low: field(&self.low)?,
            close: field(&self.close)?,
            volume: field(&self.volume)?,
        })
    }
}

/// OHLCV candle with every field present and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time, Unix milliseconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Candle whose four prices all equal `price`.
    pub fn flat(time: i64, price: f64, volume: f64) -> Self {
        Self {
            time,
            open: price,
            high: price,
            low: price,
            close: price,
            volume,
        }
    }
}

impl From<Candle> for RawCandle {
    fn from(c: Candle) -> Self {
        Self {
            time: c.time,
            open: Some(c.open.into()),
            high: Some(c.high.into()),
            low: Some(c.low.into()),
            close: Some(c.close.into()),
            volume: Some(c.volume.into()),
        }
    }
}

/// Coerce raw candles into an ascending series with unique timestamps.
///
/// Candles with a missing or non-numeric field are dropped. When two candles
/// share a timestamp the later one in the input wins.
pub fn coerce_series(raw: &[RawCandle]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = raw.iter().filter_map(RawCandle::coerce).collect();

    // Stable sort keeps input order among equal timestamps
    candles.sort_by_key(|c| c.time);

    let mut series: Vec<Candle> = Vec::with_capacity(candles.len());
    for candle in candles {
        match series.last_mut() {
            Some(last) if last.time == candle.time => *last = candle,
            _ => series.push(candle),
        }
    }
    series
}
