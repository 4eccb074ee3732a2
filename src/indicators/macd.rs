// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(close, fast) - EMA(close, slow)
//   Signal    = EMA(MACD, signal)
//   Histogram = MACD - Signal
//
// All EMAs are seeded with their first input, so every line is defined from
// index 0 and MACD[0] == 0.
// =============================================================================

use super::ema::calculate_ema;

/// The three MACD lines, each aligned 1:1 with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdResult {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdResult {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let macd: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = calculate_ema(&macd, signal);
    let histogram = macd.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdResult {
        macd,
        signal: signal_line,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        let r = calculate_macd(&[], 12, 26, 9);
        assert!(r.macd.is_empty());
        assert!(r.signal.is_empty());
        assert!(r.histogram.is_empty());
    }

    #[test]
    fn defined_from_index_zero() {
        let r = calculate_macd(&[123.45], 12, 26, 9);
        assert_eq!(r.macd, vec![0.0]);
        assert_eq!(r.signal, vec![0.0]);
        assert_eq!(r.histogram, vec![0.0]);
    }

    #[test]
    fn uptrend_pushes_macd_up() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let r = calculate_macd(&closes, 12, 26, 9);
        for w in r.macd.windows(2) {
            assert!(w[1] > w[0]);
        }
        // Signal lags MACD in a steady uptrend.
        assert!(r.histogram[1..].iter().all(|h| *h > 0.0));
    }

    #[test]
    fn histogram_is_difference() {
        let closes = [10.0, 11.0, 9.5, 12.0, 12.5, 11.0, 13.0];
        let r = calculate_macd(&closes, 3, 5, 2);
        for i in 0..closes.len() {
            assert!((r.histogram[i] - (r.macd[i] - r.signal[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn flat_series_is_zero() {
        let r = calculate_macd(&[50.0; 40], 12, 26, 9);
        assert!(r.macd.iter().all(|v| v.abs() < 1e-12));
    }
}
