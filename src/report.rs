// =============================================================================
// Presentation — terminal summary and chart payload
// =============================================================================
//
// Two renderings of one `Analysis`:
//   - `render_summary`: plain text for the interactive prompt.
//   - `ChartPayload`: columnar JSON for a browser-side chart library, one
//     array per field, all aligned with `dates`.
// =============================================================================

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analysis::Analysis;
use crate::indicators::{self, rsi::rsi_label, IndicatorSet};
use crate::types::Period;

// =============================================================================
// Chart payload
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    pub symbol: String,
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    pub dates: Vec<NaiveDate>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<u64>,
    pub indicators: IndicatorSet,
}

impl From<&Analysis> for ChartPayload {
    fn from(a: &Analysis) -> Self {
        let bars = a.series.bars();
        Self {
            symbol: a.symbol.clone(),
            period: a.period,
            generated_at: a.generated_at,
            dates: a.series.dates(),
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
            volume: bars.iter().map(|b| b.volume).collect(),
            indicators: a.indicators.clone(),
        }
    }
}

// =============================================================================
// Terminal summary
// =============================================================================

/// Render the prompt output for one analysis: the row count, the first
/// `head_rows` bars, and the latest reading of every indicator.
pub fn render_summary(a: &Analysis, head_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fetched {} days of data for {} ({})", a.series.len(), a.symbol, a.period);

    let head = a.series.head(head_rows);
    if !head.is_empty() {
        let _ = writeln!(out, "\nFirst {} rows of data:", head.len());
        let _ = writeln!(
            out,
            "{:<12}{:>12}{:>12}{:>12}{:>12}{:>14}",
            "Date", "Open", "High", "Low", "Close", "Volume"
        );
        for b in head {
            let _ = writeln!(
                out,
                "{:<12}{:>12.2}{:>12.2}{:>12.2}{:>12.2}{:>14}",
                b.date.format("%Y-%m-%d"),
                b.open,
                b.high,
                b.low,
                b.close,
                b.volume
            );
        }
    }

    let last_close = match a.series.last() {
        Some(b) => b.close,
        None => return out,
    };
    let _ = writeln!(out, "\nLatest indicators (close {:.2}):", last_close);

    let set = &a.indicators;
    if set.is_empty() {
        return out;
    }
    for line in indicator_lines(set, last_close) {
        let _ = writeln!(out, "  {line}");
    }

    out
}

fn indicator_lines(set: &IndicatorSet, close: f64) -> Vec<String> {
    let mut lines = Vec::new();

    match set.latest(indicators::RSI) {
        Some(rsi) => lines.push(format!("{:<16}{:>10.2}  {}", "RSI", rsi, rsi_label(rsi))),
        None if set.contains(indicators::RSI) => {
            lines.push(format!("{:<16}{:>10}", "RSI", "n/a"))
        }
        None => {}
    }

    if let (Some(m), Some(s), Some(h)) = (
        set.latest(indicators::MACD),
        set.latest(indicators::SIGNAL_LINE),
        set.latest(indicators::MACD_HISTOGRAM),
    ) {
        let stance = if m > s {
            "above signal"
        } else if m < s {
            "below signal"
        } else {
            "on signal"
        };
        lines.push(format!("{:<16}{:>10.4}  {}", "MACD", m, stance));
        lines.push(format!("{:<16}{:>10.4}", "Signal_Line", s));
        lines.push(format!("{:<16}{:>10.4}", "MACD_Histogram", h));
    }

    match (
        set.latest(indicators::UPPER_BAND),
        set.latest(indicators::MIDDLE_BAND),
        set.latest(indicators::LOWER_BAND),
    ) {
        (Some(u), Some(m), Some(l)) => {
            let position = if close > u {
                "close above upper band"
            } else if close < l {
                "close below lower band"
            } else {
                "close inside bands"
            };
            lines.push(format!("{:<16}{:>10.2}  {}", "Upper_Band", u, position));
            lines.push(format!("{:<16}{:>10.2}", "Middle_Band", m));
            lines.push(format!("{:<16}{:>10.2}", "Lower_Band", l));
        }
        _ if set.contains(indicators::UPPER_BAND) => {
            lines.push(format!("{:<16}{:>10}", "Bollinger", "n/a"));
        }
        _ => {}
    }

    let ma_names: Vec<&str> = set.names().filter(|n| n.ends_with(" Day MA")).collect();
    for name in ma_names {
        if let Some(ma) = set.latest(name) {
            let side = if close >= ma { "close above" } else { "close below" };
            lines.push(format!("{:<16}{:>10.2}  {}", name, ma, side));
        }
    }

    lines
}
