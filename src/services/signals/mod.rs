//! Trading signals service module.
//!
//! Provides the indicator engine and the consensus classifier that reads
//! crossovers on the latest candle and turns them into a signal label.

pub mod consensus;
pub mod crossover;
pub mod indicators;

pub use consensus::Consensus;
pub use indicators::{compute_indicators, Column, IndicatorError, IndicatorFrame};

use thiserror::Error;
use tracing::debug;

use crate::types::{IndicatorKind, IndicatorVote, SignalConfig, SignalLabel};
use crossover::{crossed_above, crossed_below, Step};

/// Frame shape problems detected before classification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("missing indicator column '{0}'")]
    MissingColumn(Column),

    #[error("column '{column}' has {actual} values for {expected} candles")]
    LengthMismatch {
        column: Column,
        expected: usize,
        actual: usize,
    },
}

/// Indicator frame with one signal label per candle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFrame {
    /// Frame after dropping candles unusable for signals.
    pub frame: IndicatorFrame,
    /// One label per candle; only the latest carries the classification.
    pub signals: Vec<SignalLabel>,
    /// Votes evaluated on the latest candle. Empty when the history was too
    /// short to evaluate crossovers.
    pub votes: Vec<IndicatorVote>,
}

impl ClassifiedFrame {
    /// Classification of the latest candle.
    pub fn latest_signal(&self) -> SignalLabel {
        self.signals
            .last()
            .copied()
            .unwrap_or(SignalLabel::InsufficientData)
    }

    fn insufficient(frame: IndicatorFrame) -> Self {
        let mut signals = vec![SignalLabel::Hold; frame.len()];
        if let Some(last) = signals.last_mut() {
            *last = SignalLabel::InsufficientData;
        }
        Self {
            frame,
            signals,
            votes: Vec::new(),
        }
    }
}

fn check_schema(frame: &IndicatorFrame) -> Result<(), SchemaError> {
    for column in Column::ALL {
        let values = frame
            .column(column)
            .ok_or(SchemaError::MissingColumn(column))?;
        if values.len() != frame.len() {
            return Err(SchemaError::LengthMismatch {
                column,
                expected: frame.len(),
                actual: values.len(),
            });
        }
    }
    Ok(())
}

/// Evaluate each indicator's crossover predicates on the last two candles.
fn evaluate_votes(
    frame: &IndicatorFrame,
    config: &SignalConfig,
    histogram_usable: bool,
) -> Vec<IndicatorVote> {
    let cur = frame.len() - 1;
    let prev = cur - 1;
    let step = |column: Column| Step::new(frame.value(column, prev), frame.value(column, cur));
    let candles = frame.candles();
    let close = Step::new(Some(candles[prev].close), Some(candles[cur].close));

    let (fast, slow) = (step(Column::SmaFast), step(Column::SmaSlow));
    let rsi = step(Column::Rsi);
    let (macd, signal, hist) = (
        step(Column::Macd),
        step(Column::MacdSignal),
        step(Column::MacdHist),
    );
    let zero = Step::level(0.0);

    vec![
        IndicatorVote {
            indicator: IndicatorKind::Sma,
            bullish: crossed_above(fast, slow),
            bearish: crossed_below(fast, slow),
        },
        IndicatorVote {
            indicator: IndicatorKind::Rsi,
            bullish: crossed_above(rsi, Step::level(config.rsi_oversold)),
            bearish: crossed_below(rsi, Step::level(config.rsi_overbought)),
        },
        IndicatorVote {
            indicator: IndicatorKind::Macd,
            bullish: crossed_above(macd, signal)
                || (histogram_usable && crossed_above(hist, zero)),
            bearish: crossed_below(macd, signal)
                || (histogram_usable && crossed_below(hist, zero)),
        },
        IndicatorVote {
            indicator: IndicatorKind::Bollinger,
            bullish: crossed_above(close, step(Column::BbLower)),
            bearish: crossed_below(close, step(Column::BbUpper)),
        },
    ]
}

/// Classify the latest candle of an indicator frame.
///
/// Historical candles keep `HOLD`. If fewer than `config.min_candles` usable
/// candles remain the latest candle is `INSUFFICIENT_DATA`, which is a normal
/// outcome for short or newly listed symbols rather than an error.
pub fn classify(
    frame: &IndicatorFrame,
    config: &SignalConfig,
) -> Result<ClassifiedFrame, SchemaError> {
    check_schema(frame)?;

    let histogram_usable = frame
        .column(Column::MacdHist)
        .is_some_and(|values| values.iter().any(Option::is_some));
    if !histogram_usable {
        debug!("MACD histogram unusable; MACD votes use the line crossover only");
    }

    let frame = frame.retain_positions(|i| {
        Column::CRITICAL
            .iter()
            .all(|column| frame.value(*column, i).is_some())
            && (!histogram_usable || frame.value(Column::MacdHist, i).is_some())
    });

    if frame.len() < config.min_candles.max(2) {
        debug!(
            "Only {} valid candles, need {} for a crossover read",
            frame.len(),
            config.min_candles
        );
        return Ok(ClassifiedFrame::insufficient(frame));
    }

    let votes = evaluate_votes(&frame, config, histogram_usable);
    let consensus = Consensus::from_votes(&votes);
    let label = consensus.label();
    debug!(
        "Consensus over {} candles: {} bullish, {} bearish -> {}",
        frame.len(),
        consensus.bullish,
        consensus.bearish,
        label
    );

    let mut signals = vec![SignalLabel::Hold; frame.len()];
    if let Some(last) = signals.last_mut() {
        *last = label;
    }

    Ok(ClassifiedFrame {
        frame,
        signals,
        votes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candle;
    use std::collections::BTreeMap;

    fn flat_frame(len: usize) -> IndicatorFrame {
        let candles = (0..len)
            .map(|i| Candle::flat(i as i64, 100.0, 1.0))
            .collect();
        let columns = Column::ALL
            .iter()
            .map(|column| {
                let value = match column {
                    Column::Rsi => 50.0,
                    Column::Macd | Column::MacdSignal | Column::MacdHist => 0.0,
                    _ => 100.0,
                };
                (*column, vec![Some(value); len])
            })
            .collect();
        IndicatorFrame::from_parts(candles, columns)
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let mut columns: BTreeMap<Column, Vec<Option<f64>>> = BTreeMap::new();
        columns.insert(Column::SmaFast, vec![Some(1.0)]);
        let frame = IndicatorFrame::from_parts(vec![Candle::flat(0, 1.0, 1.0)], columns);
        assert_eq!(
            classify(&frame, &SignalConfig::default()).unwrap_err(),
            SchemaError::MissingColumn(Column::SmaSlow)
        );
    }

    #[test]
    fn test_length_mismatch_is_schema_error() {
        let frame = flat_frame(3);
        let mut columns: BTreeMap<Column, Vec<Option<f64>>> = Column::ALL
            .iter()
            .map(|c| (*c, frame.column(*c).unwrap().to_vec()))
            .collect();
        columns.insert(Column::BbLower, vec![Some(1.0)]);
        let frame = IndicatorFrame::from_parts(frame.candles().to_vec(), columns);

        assert_eq!(
            classify(&frame, &SignalConfig::default()).unwrap_err(),
            SchemaError::LengthMismatch {
                column: Column::BbLower,
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn test_flat_frame_holds() {
        let classified = classify(&flat_frame(60), &SignalConfig::default()).unwrap();
        assert_eq!(classified.latest_signal(), SignalLabel::Hold);
        assert_eq!(classified.votes.len(), 4);
        assert!(classified.votes.iter().all(|v| !v.bullish && !v.bearish));
    }

    #[test]
    fn test_short_frame_is_insufficient() {
        let classified = classify(&flat_frame(10), &SignalConfig::default()).unwrap();
        assert_eq!(classified.signals.len(), 10);
        assert_eq!(classified.latest_signal(), SignalLabel::InsufficientData);
        assert!(classified.signals[..9].iter().all(|s| *s == SignalLabel::Hold));
        assert!(classified.votes.is_empty());
    }

    #[test]
    fn test_empty_frame_is_insufficient() {
        let frame = IndicatorFrame::from_parts(
            Vec::new(),
            Column::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        );
        let classified = classify(&frame, &SignalConfig::default()).unwrap();
        assert!(classified.signals.is_empty());
        assert_eq!(classified.latest_signal(), SignalLabel::InsufficientData);
    }

    #[test]
    fn test_undefined_rows_are_dropped() {
        let frame = flat_frame(60);
        let mut columns: BTreeMap<Column, Vec<Option<f64>>> = Column::ALL
            .iter()
            .map(|c| (*c, frame.column(*c).unwrap().to_vec()))
            .collect();
        if let Some(rsi) = columns.get_mut(&Column::Rsi) {
            for value in rsi.iter_mut().take(20) {
                *value = None;
            }
        }
        let frame = IndicatorFrame::from_parts(frame.candles().to_vec(), columns);

        let classified = classify(&frame, &SignalConfig::default()).unwrap();
        assert_eq!(classified.frame.len(), 40);
        assert_eq!(classified.latest_signal(), SignalLabel::InsufficientData);
    }

    #[test]
    fn test_histogram_cross_votes_without_line_cross() {
        let frame = flat_frame(60);
        let mut columns: BTreeMap<Column, Vec<Option<f64>>> = Column::ALL
            .iter()
            .map(|c| (*c, frame.column(*c).unwrap().to_vec()))
            .collect();
        // Line stays above signal, so only the histogram crosses zero
        columns.insert(Column::Macd, vec![Some(1.0); 60]);
        columns.insert(Column::MacdSignal, vec![Some(0.5); 60]);
        if let Some(hist) = columns.get_mut(&Column::MacdHist) {
            hist[58] = Some(-0.1);
            hist[59] = Some(0.2);
        }
        let frame = IndicatorFrame::from_parts(frame.candles().to_vec(), columns);

        let classified = classify(&frame, &SignalConfig::default()).unwrap();
        let macd = classified
            .votes
            .iter()
            .find(|v| v.indicator == IndicatorKind::Macd)
            .unwrap();
        assert!(macd.bullish);
        assert!(!macd.bearish);
        assert_eq!(classified.latest_signal(), SignalLabel::WeakBuy);
    }

    #[test]
    fn test_unusable_histogram_is_ignored() {
        let frame = flat_frame(60);
        let mut columns: BTreeMap<Column, Vec<Option<f64>>> = Column::ALL
            .iter()
            .map(|c| (*c, frame.column(*c).unwrap().to_vec()))
            .collect();
        columns.insert(Column::MacdHist, vec![None; 60]);
        let frame = IndicatorFrame::from_parts(frame.candles().to_vec(), columns);

        let classified = classify(&frame, &SignalConfig::default()).unwrap();
        assert_eq!(classified.frame.len(), 60);
        assert_eq!(classified.latest_signal(), SignalLabel::Hold);
    }
}
