// =============================================================================
// Analysis pipeline — fetch → normalize → indicators
// =============================================================================
//
// Shared by the interactive prompt and the HTTP API. A ticker with no data is
// `Ok(None)`, not an error; only fetch failures and invalid input are `Err`.
// =============================================================================

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::app_state::AppState;
use crate::indicators::{compute_indicators_with, IndicatorSet};
use crate::market_data::{normalize, SeriesKey, TimeSeries};
use crate::types::Period;

const MAX_SYMBOL_LEN: usize = 15;

/// A normalized series together with the indicators derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub symbol: String,
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    pub series: TimeSeries,
    pub indicators: IndicatorSet,
}

/// Trim and upper-case a user-supplied ticker, rejecting anything that could
/// not be a provider symbol.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        bail!("ticker symbol is empty");
    }
    if symbol.len() > MAX_SYMBOL_LEN {
        bail!("ticker symbol '{}' is longer than {} characters", symbol, MAX_SYMBOL_LEN);
    }
    if let Some(c) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        bail!("ticker symbol '{}' contains invalid character '{}'", symbol, c);
    }
    Ok(symbol)
}

/// Load the normalized series for `symbol`, from cache when fresh.
async fn load_series(state: &AppState, symbol: &str, period: Period) -> Result<TimeSeries> {
    let key = SeriesKey::new(symbol, period);
    if let Some(series) = state.series_cache.get(&key) {
        debug!(key = %key, rows = series.len(), "series cache hit");
        return Ok(series);
    }

    let raw = state
        .yahoo
        .fetch_daily(symbol, period)
        .await
        .with_context(|| format!("failed to fetch daily bars for {}", symbol))?;
    let series = normalize(symbol, raw)?;

    if !series.is_empty() {
        state.series_cache.insert(key, series.clone());
    }
    Ok(series)
}

/// Run the full pipeline for one ticker.
///
/// Returns `Ok(None)` when the provider has no rows for the ticker. Failures
/// are also recorded in the state's recent-error log.
#[instrument(skip(state), name = "analysis::run")]
pub async fn run_analysis(state: &AppState, raw_symbol: &str, period: Period) -> Result<Option<Analysis>> {
    let symbol = normalize_symbol(raw_symbol)?;

    let series = match load_series(state, &symbol, period).await {
        Ok(s) => s,
        Err(e) => {
            warn!(symbol = %symbol, error = %e, "series load failed");
            state.push_error(&symbol, format!("{e:#}"));
            return Err(e);
        }
    };

    if series.is_empty() {
        info!(symbol = %symbol, period = %period, "no data for ticker");
        return Ok(None);
    }

    Ok(Some(analyze_series(state, series, period)))
}

/// Derive indicators for an already-normalized series.
pub fn analyze_series(state: &AppState, series: TimeSeries, period: Period) -> Analysis {
    let indicators = compute_indicators_with(&series, &state.config.indicator_params);
    state.record_analysis();

    info!(
        symbol = series.symbol(),
        period = %period,
        rows = series.len(),
        columns = indicators.len(),
        "analysis complete"
    );

    Analysis {
        symbol: series.symbol().to_string(),
        period,
        generated_at: Utc::now(),
        series,
        indicators,
    }
}
