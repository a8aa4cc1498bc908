//! Crossover predicates between two series on consecutive candles.

/// Values of one series on the previous and the current candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub prev: Option<f64>,
    pub cur: Option<f64>,
}

impl Step {
    pub fn new(prev: Option<f64>, cur: Option<f64>) -> Self {
        Self { prev, cur }
    }

    /// A fixed threshold, identical on both candles.
    pub fn level(value: f64) -> Self {
        Self::new(Some(value), Some(value))
    }

    fn values(self) -> Option<(f64, f64)> {
        Some((self.prev?, self.cur?))
    }
}

/// `a` moved from at-or-below `b` to strictly above it.
/// False when any operand is undefined.
pub fn crossed_above(a: Step, b: Step) -> bool {
    match (a.values(), b.values()) {
        (Some((a_prev, a_cur)), Some((b_prev, b_cur))) => a_prev <= b_prev && a_cur > b_cur,
        _ => false,
    }
}

/// `a` moved from at-or-above `b` to strictly below it.
/// False when any operand is undefined.
pub fn crossed_below(a: Step, b: Step) -> bool {
    match (a.values(), b.values()) {
        (Some((a_prev, a_cur)), Some((b_prev, b_cur))) => a_prev >= b_prev && a_cur < b_cur,
        _ => false,
    }
}
