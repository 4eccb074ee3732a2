// =============================================================================
// Runtime Configuration — application settings loaded at startup
// =============================================================================
//
// Every tunable parameter lives here. All fields carry `#[serde(default)]` so
// that adding new fields never breaks loading an older config file, and an
// empty `{}` is a valid configuration.
//
// Environment variables override the file after loading (see
// `apply_env_overrides`).
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::indicators::IndicatorParams;
use crate::types::Period;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "aurora_charts.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_head_rows() -> usize {
    5
}

fn default_bind_addr() -> String {
    "127.0.0.1:3001".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    64
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_yahoo_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for Aurora Charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Data -----------------------------------------------------------------

    /// Lookback used when the prompt or API request names no period.
    #[serde(default)]
    pub default_period: Period,

    /// Base URL of the chart data provider.
    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    /// HTTP timeout for one fetch.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long a fetched series is reused before fetching again.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached (symbol, period) series.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,

    // --- Presentation ---------------------------------------------------------

    /// Number of leading rows printed in the terminal summary.
    #[serde(default = "default_head_rows")]
    pub head_rows: usize,

    /// Serve the JSON chart API alongside the prompt.
    #[serde(default)]
    pub enable_api: bool,

    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Indicators -----------------------------------------------------------

    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_period: Period::default(),
            yahoo_base_url: default_yahoo_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
            head_rows: default_head_rows(),
            enable_api: false,
            bind_addr: default_bind_addr(),
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            default_period = %config.default_period,
            enable_api = config.enable_api,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply `AURORA_*` environment overrides. `lookup` is `std::env::var` in
    /// production and a map lookup in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = lookup("AURORA_PERIOD") {
            match p.parse::<Period>() {
                Ok(period) => self.default_period = period,
                Err(e) => warn!(error = %e, "ignoring AURORA_PERIOD"),
            }
        }

        if let Some(v) = lookup("AURORA_ENABLE_API") {
            match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.enable_api = true,
                "0" | "false" | "no" | "off" => self.enable_api = false,
                other => warn!(value = other, "ignoring AURORA_ENABLE_API"),
            }
        }

        if let Some(addr) = lookup("AURORA_BIND_ADDR") {
            if !addr.trim().is_empty() {
                self.bind_addr = addr.trim().to_string();
            }
        }
    }
}
