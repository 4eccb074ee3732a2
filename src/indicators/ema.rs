// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula (recursive form, no bias adjustment):
//   alpha  = 2 / (span + 1)
//   EMA_0  = x_0
//   EMA_t  = alpha * x_t + (1 - alpha) * EMA_{t-1}
//
// Seeding with the first value means there is no warm-up gap: the output has
// exactly one value per input, starting at index 0.
// =============================================================================

/// Compute the EMA of `values` with the given `span`.
///
/// # Edge cases
/// - empty input => empty vec
/// - `span == 0` is treated as `span == 1` (alpha = 1, output equals input)
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let mut prev = match iter.next() {
        Some(&first) => first,
        None => return result,
    };
    result.push(prev);

    for &x in iter {
        prev = alpha * x + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}
