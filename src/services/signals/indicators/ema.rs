//! Exponential Moving Average (EMA) helper.

/// EMA over a dense series.
///
/// The first value is the SMA of the first `period` inputs, so the output is
/// undefined before position `period - 1`. Later values use the usual
/// `2 / (period + 1)` multiplier.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);

    // First EMA is SMA
    let mut current = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(current);

    for (i, value) in values.iter().enumerate().skip(period) {
        current = (value - current) * multiplier + current;
        out[i] = Some(current);
    }
    out
}
