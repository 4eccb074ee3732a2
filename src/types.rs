// =============================================================================
// Shared types used across Aurora Charts
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lookback window requested from the data provider.
///
/// The serialized form is the provider's range token (`"1mo"`, `"1y"`, ...),
/// which is also what users type at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Self::OneDay,
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::TenYears,
        Self::YearToDate,
        Self::Max,
    ];

    /// Range token understood by the chart endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::OneYear
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(Period::as_str).collect();
                anyhow::anyhow!("unknown period '{}' (expected one of: {})", s.trim(), valid.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_token() {
        for p in Period::ALL {
            assert_eq!(p.as_str().parse::<Period>().unwrap(), p);
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" 6MO ".parse::<Period>().unwrap(), Period::SixMonths);
        assert_eq!("YTD".parse::<Period>().unwrap(), Period::YearToDate);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = "3w".parse::<Period>().unwrap_err();
        assert!(err.to_string().contains("unknown period '3w'"));
    }

    #[test]
    fn serde_uses_range_token() {
        assert_eq!(serde_json::to_string(&Period::OneMonth).unwrap(), "\"1mo\"");
        let p: Period = serde_json::from_str("\"10y\"").unwrap();
        assert_eq!(p, Period::TenYears);
    }

    #[test]
    fn default_is_one_year() {
        assert_eq!(Period::default(), Period::OneYear);
    }
}
