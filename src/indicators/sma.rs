// =============================================================================
// Simple Moving Average (SMA) and rolling standard deviation
// =============================================================================
//
// Both functions return a series aligned 1:1 with the input. Index `t` holds
// the statistic of `values[t + 1 - window ..= t]`; indices before `window - 1`
// are `None`.
//
// Each window is summed directly rather than with a running sum, so a value
// never depends on rounding residue carried over from earlier windows.
// =============================================================================

/// Trailing arithmetic mean over `window` values.
///
/// # Edge cases
/// - `window == 0` => all `None`
/// - `values.len() < window` => all `None`
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| Some(mean(w)))
}

/// Trailing sample standard deviation (`n - 1` denominator) over `window`
/// values.
///
/// A window of one value has no sample deviation, so `window < 2` yields all
/// `None`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, |w| {
        let m = mean(w);
        let ss: f64 = w.iter().map(|x| (x - m).powi(2)).sum();
        Some((ss / (w.len() - 1) as f64).sqrt())
    })
}

fn rolling<F>(values: &[f64], window: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for (i, w) in values.windows(window).enumerate() {
        out[i + window - 1] = stat(w);
    }
    out
}

fn mean(w: &[f64]) -> f64 {
    w.iter().sum::<f64>() / w.len() as f64
}
