//! Warm-up resolution for indicator columns.
//!
//! Indicators are undefined until their window fills. Those gaps are closed by
//! carrying values forward, then copying the first computed value backwards
//! over the leading warm-up positions. The back-filled values are not real
//! indicator readings; they exist so that every candle has a value. Consensus
//! only reads the latest two candles, which sit past the warm-up once the
//! classifier's minimum history is met.

/// Forward-fill then back-fill `values` in place.
///
/// Returns the number of leading positions that were back-filled, or `None`
/// when the column has no defined value at all and nothing could be filled.
pub fn fill_warmup(values: &mut [Option<f64>]) -> Option<usize> {
    let first = values.iter().position(Option::is_some)?;

    let mut carry = None;
    for value in values.iter_mut() {
        match value {
            Some(v) => carry = Some(*v),
            None => *value = carry,
        }
    }

    let seed = values[first];
    for value in values[..first].iter_mut() {
        *value = seed;
    }

    Some(first)
}
