//! Candle series augmented with indicator columns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Candle, IndicatorSnapshot};

/// Named indicator column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    SmaFast,
    SmaSlow,
    Rsi,
    Macd,
    MacdSignal,
    MacdHist,
    BbUpper,
    BbMiddle,
    BbLower,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::SmaFast,
        Column::SmaSlow,
        Column::Rsi,
        Column::Macd,
        Column::MacdSignal,
        Column::MacdHist,
        Column::BbUpper,
        Column::BbMiddle,
        Column::BbLower,
    ];

    /// Columns a candle must have defined to be usable for signals.
    /// Histogram and outer bands are optional.
    pub const CRITICAL: [Column; 6] = [
        Column::SmaFast,
        Column::SmaSlow,
        Column::Rsi,
        Column::Macd,
        Column::MacdSignal,
        Column::BbMiddle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::SmaFast => "sma_fast",
            Column::SmaSlow => "sma_slow",
            Column::Rsi => "rsi",
            Column::Macd => "macd",
            Column::MacdSignal => "macd_signal",
            Column::MacdHist => "macd_hist",
            Column::BbUpper => "bb_upper",
            Column::BbMiddle => "bb_middle",
            Column::BbLower => "bb_lower",
        }
    }

    pub fn is_critical(&self) -> bool {
        Self::CRITICAL.contains(self)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candle series with one optional value per candle for each column.
///
/// Frames are plain data: the engine builds complete ones, but a frame can
/// also be assembled or deserialized elsewhere, so consumers must not assume
/// every column is present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorFrame {
    candles: Vec<Candle>,
    columns: BTreeMap<Column, Vec<Option<f64>>>,
    /// Leading positions per column whose value was copied backwards
    /// from the first computed value during warm-up resolution.
    #[serde(default)]
    backfilled: BTreeMap<Column, usize>,
}

impl IndicatorFrame {
    /// Assemble a frame from parts without validation.
    pub fn from_parts(
        candles: Vec<Candle>,
        columns: BTreeMap<Column, Vec<Option<f64>>>,
    ) -> Self {
        Self {
            candles,
            columns,
            backfilled: BTreeMap::new(),
        }
    }

    pub(crate) fn with_backfilled(mut self, backfilled: BTreeMap<Column, usize>) -> Self {
        self.backfilled = backfilled;
        self
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn column(&self, column: Column) -> Option<&[Option<f64>]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    /// Value of `column` at position `index`, `None` if missing or undefined.
    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.columns.get(&column)?.get(index).copied().flatten()
    }

    /// Whether the value at `index` is a warm-up copy rather than computed.
    pub fn is_backfilled(&self, column: Column, index: usize) -> bool {
        index < self.backfilled.get(&column).copied().unwrap_or(0)
    }

    /// Number of back-filled leading positions in `column`.
    pub fn backfilled(&self, column: Column) -> usize {
        self.backfilled.get(&column).copied().unwrap_or(0)
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Keep only the positions for which `keep` returns true.
    pub(crate) fn retain_positions<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(usize) -> bool,
    {
        let kept: Vec<usize> = (0..self.candles.len()).filter(|&i| keep(i)).collect();
        if kept.len() == self.candles.len() {
            return self.clone();
        }

        let candles = kept.iter().map(|&i| self.candles[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|(column, values)| {
                let values = kept
                    .iter()
                    .map(|&i| values.get(i).copied().flatten())
                    .collect();
                (*column, values)
            })
            .collect();
        // A gap in the kept positions invalidates the prefix counts
        let backfilled = self
            .backfilled
            .iter()
            .map(|(column, &count)| (*column, kept.iter().take_while(|&&i| i < count).count()))
            .collect();

        Self {
            candles,
            columns,
            backfilled,
        }
    }

    /// Indicator values at position `index`.
    pub fn snapshot(&self, index: usize) -> Option<IndicatorSnapshot> {
        let candle = self.candles.get(index)?;
        Some(IndicatorSnapshot {
            time: candle.time,
            close: candle.close,
            sma_fast: self.value(Column::SmaFast, index),
            sma_slow: self.value(Column::SmaSlow, index),
            rsi: self.value(Column::Rsi, index),
            macd: self.value(Column::Macd, index),
            macd_signal: self.value(Column::MacdSignal, index),
            macd_hist: self.value(Column::MacdHist, index),
            bb_upper: self.value(Column::BbUpper, index),
            bb_middle: self.value(Column::BbMiddle, index),
            bb_lower: self.value(Column::BbLower, index),
        })
    }

    /// Indicator values at the latest candle.
    pub fn latest_snapshot(&self) -> Option<IndicatorSnapshot> {
        self.snapshot(self.candles.len().checked_sub(1)?)
    }
}
