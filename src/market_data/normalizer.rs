// =============================================================================
// Series Normalizer — business-day filter
// =============================================================================
//
// The reference calendar is every Monday..Friday between the first and last
// observed date of the raw series. Exchange holidays are therefore NOT
// distinguished from missing data: a holiday inside the range is simply a day
// with no row, and nothing is interpolated for it.
// =============================================================================

use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use super::series::{Bar, TimeSeries};

/// Whether `date` is a business day under the weekday calendar.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Keep only business-day rows of `raw`, preserving their order.
///
/// An empty input is a legitimate "no data" result and yields an empty
/// series. Unsorted or duplicated dates are a caller bug and are returned as
/// an error rather than repaired.
pub fn normalize(symbol: &str, raw: Vec<Bar>) -> Result<TimeSeries> {
    if raw.is_empty() {
        return Ok(TimeSeries::empty(symbol));
    }

    // Order is checked on the raw rows so that a misplaced weekend row still
    // fails. Inside an ordered [first, last] range the calendar reduces to the
    // weekday rule.
    let ordered = TimeSeries::new(symbol, raw)?;
    let total = ordered.len();
    let kept: Vec<Bar> = ordered
        .into_bars()
        .into_iter()
        .filter(|b| is_business_day(b.date))
        .collect();

    let dropped = total - kept.len();
    if dropped > 0 {
        debug!(symbol, dropped, kept = kept.len(), "non-business-day rows removed");
    }

    TimeSeries::new(symbol, kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, close: f64) -> Bar {
        Bar::new(date, close, close, close, close, 100)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let ts = normalize("MSFT", Vec::new()).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.symbol(), "MSFT");
    }

    #[test]
    fn weekend_rows_are_dropped() {
        // 2024-03-08 is a Friday.
        let raw = vec![
            bar(day(2024, 3, 8), 1.0),
            bar(day(2024, 3, 9), 2.0),
            bar(day(2024, 3, 10), 3.0),
            bar(day(2024, 3, 11), 4.0),
        ];
        let ts = normalize("MSFT", raw).unwrap();
        assert_eq!(ts.closes(), vec![1.0, 4.0]);
        assert_eq!(ts.dates(), vec![day(2024, 3, 8), day(2024, 3, 11)]);
    }

    #[test]
    fn weekday_gaps_are_not_filled() {
        // Wednesday missing (e.g. a holiday); nothing is fabricated for it.
        let raw = vec![bar(day(2024, 3, 5), 1.0), bar(day(2024, 3, 7), 2.0)];
        let ts = normalize("MSFT", raw).unwrap();
        assert_eq!(ts.len(), 2);
    }

    #[test]
    fn only_weekend_rows_yield_empty_series() {
        let raw = vec![bar(day(2024, 3, 9), 1.0), bar(day(2024, 3, 10), 2.0)];
        assert!(normalize("MSFT", raw).unwrap().is_empty());
    }

    #[test]
    fn unsorted_input_is_a_hard_failure() {
        let raw = vec![
            bar(day(2024, 3, 6), 1.0),
            bar(day(2024, 3, 5), 2.0),
            bar(day(2024, 3, 7), 3.0),
        ];
        assert!(normalize("MSFT", raw).is_err());
    }

    #[test]
    fn misplaced_weekend_row_is_a_hard_failure() {
        // Saturday after Monday: dropped by the calendar, but still out of order.
        let raw = vec![bar(day(2024, 3, 11), 1.0), bar(day(2024, 3, 9), 2.0)];
        assert!(normalize("MSFT", raw).is_err());
    }

    #[test]
    fn duplicated_weekend_row_is_a_hard_failure() {
        let raw = vec![
            bar(day(2024, 3, 8), 1.0),
            bar(day(2024, 3, 9), 2.0),
            bar(day(2024, 3, 9), 2.0),
            bar(day(2024, 3, 11), 3.0),
        ];
        assert!(normalize("MSFT", raw).is_err());
    }

    #[test]
    fn business_day_rule() {
        assert!(is_business_day(day(2024, 3, 4)));
        assert!(!is_business_day(day(2024, 3, 9)));
        assert!(!is_business_day(day(2024, 3, 10)));
    }
}
