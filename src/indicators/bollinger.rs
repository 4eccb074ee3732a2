// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the sample standard deviation of
// the same trailing window.

use super::sma::{rolling_mean, rolling_std};

/// Band series, each aligned 1:1 with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerResult {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands over `closes`.
///
/// Every band is `None` until `period` closes are available, so a series
/// shorter than `period` has no band values at all.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerResult {
    let middle = rolling_mean(closes, period);
    let std = rolling_std(closes, period);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std)
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m + sign * num_std * s),
                _ => None,
            })
            .collect()
    };

    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerResult {
        upper,
        middle,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        let (u, m, l) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert!(u > m);
        assert!(l < m);
        assert!((m - 10.5).abs() < 1e-10);
        assert!(((u - m) - (m - l)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = calculate_bollinger(&[1.0, 2.0, 3.0], 20, 2.0);
        assert_eq!(bb.upper.len(), 3);
        assert!(bb.upper.iter().all(Option::is_none));
        assert!(bb.middle.iter().all(Option::is_none));
        assert!(bb.lower.iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_warm_up() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0);
        assert!(bb.middle[18].is_none());
        assert!(bb.middle[19].is_some());
    }

    #[test]
    fn bollinger_flat() {
        let bb = calculate_bollinger(&[100.0; 20], 20, 2.0);
        assert!((bb.upper[19].unwrap() - 100.0).abs() < 1e-10);
        assert!((bb.lower[19].unwrap() - 100.0).abs() < 1e-10);
    }
}
