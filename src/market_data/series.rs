use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Immutable daily series for one ticker, strictly increasing by date.
///
/// The only way to build a non-empty series is [`TimeSeries::new`], which
/// rejects unsorted or duplicated dates. Nothing downstream re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl TimeSeries {
    /// Build a series, failing on any date that does not strictly follow its
    /// predecessor.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                bail!(
                    "series for {} is not strictly increasing: {} at index {} follows {}",
                    symbol,
                    pair[1].date,
                    i + 1,
                    pair[0].date
                );
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bars: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    /// First `n` bars (fewer if the series is shorter).
    pub fn head(&self, n: usize) -> &[Bar] {
        &self.bars[..n.min(self.bars.len())]
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> Bar {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Bar::new(date, close, close, close, close, 1_000)
    }

    #[test]
    fn accepts_increasing_dates() {
        let ts = TimeSeries::new("AAPL", vec![bar(2024, 1, 2, 1.0), bar(2024, 1, 3, 2.0)]).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.closes(), vec![1.0, 2.0]);
        assert_eq!(ts.symbol(), "AAPL");
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = TimeSeries::new("AAPL", vec![bar(2024, 1, 2, 1.0), bar(2024, 1, 2, 2.0)]).unwrap_err();
        assert!(err.to_string().contains("not strictly increasing"));
    }

    #[test]
    fn rejects_unsorted_dates() {
        let bars = vec![bar(2024, 1, 3, 1.0), bar(2024, 1, 2, 2.0)];
        assert!(TimeSeries::new("AAPL", bars).is_err());
    }

    #[test]
    fn head_is_clamped_to_length() {
        let ts = TimeSeries::new("AAPL", vec![bar(2024, 1, 2, 1.0)]).unwrap();
        assert_eq!(ts.head(5).len(), 1);
        assert!(TimeSeries::empty("AAPL").head(5).is_empty());
    }
}
