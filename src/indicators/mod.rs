// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators drawn on the chart.
// Every series returned here is aligned 1:1 with the input closes; indices
// without enough history hold `None` instead of being dropped, so a column can
// be plotted against the series dates directly.
//
// The indicator families only read the close column and never each other's
// output, so the order of evaluation below carries no meaning.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::TimeSeries;

// ── Column names ─────────────────────────────────────────────────────────────

pub const RSI: &str = "RSI";
pub const MACD: &str = "MACD";
pub const SIGNAL_LINE: &str = "Signal_Line";
pub const MACD_HISTOGRAM: &str = "MACD_Histogram";
pub const UPPER_BAND: &str = "Upper_Band";
pub const MIDDLE_BAND: &str = "Middle_Band";
pub const LOWER_BAND: &str = "Lower_Band";

/// Column name of the moving average over `window` days, e.g. `"50 Day MA"`.
pub fn ma_name(window: usize) -> String {
    format!("{window} Day MA")
}

// =============================================================================
// Parameters
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_std() -> f64 {
    2.0
}

fn default_ma_windows() -> Vec<usize> {
    vec![50, 252]
}

/// Window lengths for every indicator family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_std")]
    pub bollinger_std: f64,

    /// Moving-average windows. A window longer than the series is skipped.
    #[serde(default = "default_ma_windows")]
    pub ma_windows: Vec<usize>,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_period: default_bollinger_period(),
            bollinger_std: default_bollinger_std(),
            ma_windows: default_ma_windows(),
        }
    }
}

// =============================================================================
// IndicatorSet
// =============================================================================

/// Named indicator columns derived from one [`TimeSeries`].
///
/// Built once by [`compute_indicators_with`] and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct IndicatorSet {
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl IndicatorSet {
    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Value of `name` at the last index, if the column exists and is defined
    /// there.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.get(name)?.last().copied().flatten()
    }

    fn insert(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        self.columns.insert(name.into(), values);
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Compute every indicator with the default windows.
#[cfg(test)]
pub fn compute_indicators(series: &TimeSeries) -> IndicatorSet {
    compute_indicators_with(series, &IndicatorParams::default())
}

/// Compute every indicator over the close column of `series`.
///
/// An empty series yields an empty set. RSI, MACD and the bands are always
/// present for a non-empty series (possibly with leading `None`s); a moving
/// average is only present when the series covers its whole window.
pub fn compute_indicators_with(series: &TimeSeries, params: &IndicatorParams) -> IndicatorSet {
    let mut set = IndicatorSet::default();
    if series.is_empty() {
        return set;
    }

    let closes = series.closes();

    for &window in &params.ma_windows {
        if window > 0 && closes.len() >= window {
            set.insert(ma_name(window), sma::rolling_mean(&closes, window));
        }
    }

    set.insert(RSI, rsi::calculate_rsi(&closes, params.rsi_period));

    let m = macd::calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    set.insert(MACD, m.macd.into_iter().map(Some).collect());
    set.insert(SIGNAL_LINE, m.signal.into_iter().map(Some).collect());
    set.insert(MACD_HISTOGRAM, m.histogram.into_iter().map(Some).collect());

    let bb = bollinger::calculate_bollinger(&closes, params.bollinger_period, params.bollinger_std);
    set.insert(UPPER_BAND, bb.upper);
    set.insert(MIDDLE_BAND, bb.middle);
    set.insert(LOWER_BAND, bb.lower);

    debug!(
        symbol = series.symbol(),
        rows = closes.len(),
        columns = set.len(),
        "indicators computed"
    );
    set
}
