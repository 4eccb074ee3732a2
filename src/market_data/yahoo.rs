// =============================================================================
// Yahoo Finance chart client — daily OHLCV history
// =============================================================================
//
// Uses the public v8 chart endpoint:
//
//   GET /v8/finance/chart/{symbol}?range={period}&interval=1d
//
// Timestamps are UTC seconds of the session open; adding `meta.gmtoffset`
// before truncating to a date gives the exchange-local trading day.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::series::Bar;
use crate::types::Period;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Thin HTTP client for the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// Fetch daily bars for `symbol` over `period`.
    ///
    /// An unknown symbol (HTTP 404) is reported as an empty vector, which the
    /// pipeline treats as "no data". Any other failure is an error.
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    pub async fn fetch_daily(&self, symbol: &str, period: Period) -> Result<Vec<Bar>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        if status == StatusCode::NOT_FOUND {
            debug!(symbol, "chart endpoint returned 404, treating as no data");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            anyhow::bail!("Yahoo GET /v8/finance/chart/{} returned {}: {}", symbol, status, body);
        }

        let bars = parse_chart_response(&body)?;
        debug!(symbol, period = %period, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: Option<ChartMeta>,
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart payload into daily bars in provider order.
///
/// Rows with a missing, non-finite, or non-positive price are skipped. A
/// missing volume is read as zero.
pub fn parse_chart_response(body: &str) -> Result<Vec<Bar>> {
    let parsed: ChartResponse =
        serde_json::from_str(body).context("failed to parse chart response JSON")?;

    if let Some(err) = parsed.chart.error {
        anyhow::bail!("Yahoo chart API error {}: {}", err.code, err.description);
    }

    let result = match parsed.chart.result.and_then(|r| r.into_iter().next()) {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };

    let timestamps = match result.timestamp {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };
    let gmtoffset = result.meta.map_or(0, |m| m.gmtoffset);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let price = |col: &[Option<f64>]| {
            col.get(i)
                .copied()
                .flatten()
                .filter(|v| v.is_finite() && *v > 0.0)
        };

        let (open, high, low, close) = match (
            price(&quote.open),
            price(&quote.high),
            price(&quote.low),
            price(&quote.close),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map_or(0, |v| v.round() as u64);

        let date = session_date(ts, gmtoffset)
            .with_context(|| format!("timestamp {} out of range", ts))?;

        bars.push(Bar::new(date, open, high, low, close, volume));
    }

    if skipped > 0 {
        warn!(skipped, "skipping chart rows with missing prices");
    }

    Ok(bars)
}

fn session_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    let local = ts.checked_add(gmtoffset)?;
    DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive())
}
