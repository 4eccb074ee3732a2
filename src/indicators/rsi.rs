// =============================================================================
// Relative Strength Index (RSI) — simple-average form
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — delta[t] = close[t] - close[t-1]        (no delta at t = 0)
// Step 2 — gain = max(delta, 0), loss = max(-delta, 0)
// Step 3 — avg_gain / avg_loss = trailing SMA of the last `period` gains/losses
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The averages are plain trailing means, not Wilder's recursive smoothing.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

/// Compute the RSI series for `closes`, aligned 1:1 with the input.
///
/// The first value appears at index `period`, once `period` deltas exist;
/// every earlier index is `None`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - `closes.len() <= period` => all `None`
/// - average loss of zero saturates RSI to 100.0 (see [`rsi_from_averages`])
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    // --- Gains and losses per delta ------------------------------------------
    // deltas[i] is the move into closes[i + 1].
    let (gains, losses): (Vec<f64>, Vec<f64>) = closes
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            (d.max(0.0), (-d).max(0.0))
        })
        .unzip();

    let period_f = period as f64;
    for (i, (g, l)) in gains.windows(period).zip(losses.windows(period)).enumerate() {
        let avg_gain = g.iter().sum::<f64>() / period_f;
        let avg_loss = l.iter().sum::<f64>() / period_f;
        out[i + period] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

/// Human-readable zone for an RSI reading.
pub fn rsi_label(value: f64) -> &'static str {
    if value >= OVERBOUGHT {
        "OVERBOUGHT"
    } else if value <= OVERSOLD {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// An average loss of zero makes RS undefined (or infinite); that case is
/// pinned to 100.0, including the flat case where the average gain is zero
/// as well.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
