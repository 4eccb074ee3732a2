// =============================================================================
// Central Application State — Aurora Charts
// =============================================================================
//
// Shared by the interactive prompt and the HTTP API through `Arc<AppState>`.
//
// Thread safety:
//   - Atomic counters for lock-free statistics.
//   - parking_lot::RwLock for the error log; the series cache manages its own
//     lock.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::market_data::{SeriesCache, YahooClient};
use crate::runtime_config::RuntimeConfig;

// =============================================================================
// Error Record
// =============================================================================

/// A recorded failure, kept for the `/errors` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Ticker the failing request was for.
    pub symbol: String,
    /// Human-readable error message (full `anyhow` chain).
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

// =============================================================================
// AppState
// =============================================================================

pub struct AppState {
    pub config: RuntimeConfig,
    pub yahoo: YahooClient,
    pub series_cache: SeriesCache,

    /// Number of analyses that produced a result.
    pub analyses_served: AtomicU64,

    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    /// Instant when the application started. Used for uptime.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let yahoo = YahooClient::new(
            config.yahoo_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let series_cache = SeriesCache::new(
            config.cache_max_entries,
            Duration::from_secs(config.cache_ttl_secs),
        );

        Ok(Self {
            config,
            yahoo,
            series_cache,
            analyses_served: AtomicU64::new(0),
            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        })
    }

    pub fn record_analysis(&self) {
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }

    /// Append to the bounded error log, dropping the oldest entry when full.
    pub fn push_error(&self, symbol: &str, message: impl Into<String>) {
        let mut errors = self.recent_errors.write();
        errors.push(ErrorRecord {
            symbol: symbol.to_string(),
            message: message.into(),
            at: Utc::now().to_rfc3339(),
        });
        if errors.len() > MAX_RECENT_ERRORS {
            let excess = errors.len() - MAX_RECENT_ERRORS;
            errors.drain(..excess);
        }
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.recent_errors.read().clone()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
