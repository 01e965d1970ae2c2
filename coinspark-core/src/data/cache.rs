//! Short-lived in-memory memo of acquired price series.
//!
//! Entries are keyed by `"<currency>-<timeframe>-<width>x<height>"` and stay
//! live for a fixed TTL. Expired entries are not swept — they are overwritten
//! by the next write to the same key, or removed by `clear()`. The key space
//! is tiny (currency × timeframe × grid size), so the map never grows beyond
//! a handful of entries.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::series::{Currency, PriceSeries, Timeframe};

/// How long an acquired series stays live.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
struct CacheEntry {
    data: PriceSeries,
    stored_at: Instant,
}

/// TTL cache for acquired series. Last writer for a key wins.
#[derive(Debug)]
pub struct SeriesCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

/// Point-in-time cache summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Composite key for one (request, grid) combination.
    pub fn key(currency: Currency, timeframe: Timeframe, width: usize, height: usize) -> String {
        format!("{currency}-{timeframe}-{width}x{height}")
    }

    /// Live entry for `key`: present and younger than the TTL.
    pub fn get(&self, key: &str) -> Option<PriceSeries> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).and_then(|entry| {
            if entry.stored_at.elapsed() < self.ttl {
                Some(entry.data.clone())
            } else {
                None
            }
        })
    }

    /// Store `data` under `key`, replacing any previous entry.
    pub fn put(&self, key: String, data: PriceSeries) {
        let entry = CacheEntry {
            data,
            stored_at: Instant::now(),
        };
        self.entries.lock().unwrap().insert(key, entry);
    }

    /// Drop every entry, live or stale.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Current size and key set, stale entries included.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().unwrap();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> PriceSeries {
        PriceSeries {
            prices: vec![100.0, 101.0, 102.0],
            timeframe: Timeframe::Week,
            currency: Currency::Usd,
            width: 40,
            height: 8,
        }
    }

    #[test]
    fn key_is_the_composite_request_string() {
        assert_eq!(
            SeriesCache::key(Currency::Usd, Timeframe::Week, 60, 10),
            "usd-7d-60x10"
        );
        assert_eq!(
            SeriesCache::key(Currency::Eur, Timeframe::Year, 40, 8),
            "eur-1y-40x8"
        );
    }

    #[test]
    fn hit_within_ttl() {
        let cache = SeriesCache::new();
        cache.put("usd-7d-40x8".into(), sample_series());
        let hit = cache.get("usd-7d-40x8").unwrap();
        assert_eq!(hit.prices, vec![100.0, 101.0, 102.0]);
    }

    #[test]
    fn miss_for_unknown_key() {
        let cache = SeriesCache::new();
        assert!(cache.get("usd-7d-40x8").is_none());
    }

    #[test]
    fn expired_entry_reads_as_absent_but_stays_in_the_map() {
        let cache = SeriesCache::with_ttl(Duration::from_millis(10));
        cache.put("usd-7d-40x8".into(), sample_series());
        std::thread::sleep(Duration::from_millis(15));

        assert!(cache.get("usd-7d-40x8").is_none());
        // Readers treat it as gone; the mapping still holds it.
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn put_overwrites_the_previous_entry() {
        let cache = SeriesCache::new();
        cache.put("usd-7d-40x8".into(), sample_series());

        let mut newer = sample_series();
        newer.prices = vec![200.0, 201.0];
        cache.put("usd-7d-40x8".into(), newer);

        assert_eq!(cache.get("usd-7d-40x8").unwrap().prices, vec![200.0, 201.0]);
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn clear_empties_the_map() {
        let cache = SeriesCache::new();
        cache.put("usd-7d-40x8".into(), sample_series());
        cache.put("eur-24h-40x8".into(), sample_series());
        assert_eq!(cache.stats().size, 2);

        cache.clear();
        assert_eq!(cache.stats().size, 0);
        assert!(cache.get("usd-7d-40x8").is_none());
    }

    #[test]
    fn stats_lists_keys_sorted() {
        let cache = SeriesCache::new();
        cache.put("usd-7d-40x8".into(), sample_series());
        cache.put("eur-24h-40x8".into(), sample_series());

        let stats = cache.stats();
        assert_eq!(stats.keys, vec!["eur-24h-40x8", "usd-7d-40x8"]);
    }
}
