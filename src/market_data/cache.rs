use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::series::TimeSeries;
use crate::types::Period;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Composite key that identifies one fetched series.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeriesKey {
    pub symbol: String,
    pub period: Period,
}

impl SeriesKey {
    pub fn new(symbol: impl Into<String>, period: Period) -> Self {
        Self {
            symbol: symbol.into(),
            period,
        }
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.symbol, self.period)
    }
}

struct CachedSeries {
    series: TimeSeries,
    stored_at: Instant,
}

// ---------------------------------------------------------------------------
// SeriesCache -- thread-safe TTL cache per (symbol, period)
// ---------------------------------------------------------------------------

/// Thread-safe cache of normalized series so that repeated lookups of the same
/// ticker within `ttl` do not hit the network. At most `max_entries` series
/// are retained; inserting beyond that evicts the oldest entry.
pub struct SeriesCache {
    entries: RwLock<HashMap<SeriesKey, CachedSeries>>,
    max_entries: usize,
    ttl: Duration,
}

impl SeriesCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(max_entries)),
            max_entries,
            ttl,
        }
    }

    /// Return a clone of the cached series if present and younger than `ttl`.
    pub fn get(&self, key: &SeriesKey) -> Option<TimeSeries> {
        let map = self.entries.read();
        map.get(key)
            .filter(|c| c.stored_at.elapsed() < self.ttl)
            .map(|c| c.series.clone())
    }

    /// Insert or replace the series for `key`, evicting expired entries and
    /// then the oldest ones until the capacity bound holds.
    pub fn insert(&self, key: SeriesKey, series: TimeSeries) {
        if self.max_entries == 0 {
            return;
        }

        let mut map = self.entries.write();
        let ttl = self.ttl;
        map.retain(|_, c| c.stored_at.elapsed() < ttl);

        map.remove(&key);
        while map.len() >= self.max_entries {
            let oldest = map
                .iter()
                .min_by_key(|(_, c)| c.stored_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    debug!(key = %k, "evicting oldest cached series");
                    map.remove(&k);
                }
                None => break,
            }
        }

        map.insert(
            key,
            CachedSeries {
                series,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held (including any not yet swept expired
    /// ones).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}
