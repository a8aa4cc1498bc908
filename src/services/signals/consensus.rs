//! Consensus aggregation of indicator votes.

use crate::types::{IndicatorVote, SignalLabel};

/// Bullish and bearish vote counts on one candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Consensus {
    pub bullish: usize,
    pub bearish: usize,
}

impl Consensus {
    pub fn from_votes(votes: &[IndicatorVote]) -> Self {
        Self {
            bullish: votes.iter().filter(|v| v.bullish).count(),
            bearish: votes.iter().filter(|v| v.bearish).count(),
        }
    }

    /// Two or more agreeing votes with no opposition is a full signal, a
    /// single vote a weak one. Any disagreement resolves to HOLD.
    pub fn label(&self) -> SignalLabel {
        match (self.bullish, self.bearish) {
            (b, 0) if b >= 2 => SignalLabel::Buy,
            (1, 0) => SignalLabel::WeakBuy,
            (0, s) if s >= 2 => SignalLabel::Sell,
            (0, 1) => SignalLabel::WeakSell,
            _ => SignalLabel::Hold,
        }
    }
}
