//! In-memory reading cache with a fixed TTL
//!
//! Process-wide memoization of canonical readings keyed by resolved
//! location. Expiry is evaluated lazily at lookup time; there is no
//! background eviction and no size bound. Entries are immutable once
//! stored and replaced wholesale on refresh.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::AirQualityReading;

/// Time-to-live for cached readings
pub const READING_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    reading: AirQualityReading,
    fetched_at: Instant,
}

/// Shared in-memory cache of canonical readings
#[derive(Debug)]
pub struct ReadingCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ReadingCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a fresh reading. An entry exactly `ttl` old counts as
    /// expired: a hit requires `elapsed < ttl`, strictly.
    pub fn get(&self, key: &str, now: Instant) -> Option<AirQualityReading> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let entry = entries.get(key)?;
        if now.duration_since(entry.fetched_at) < self.ttl {
            debug!("Cache hit for {}", key);
            Some(entry.reading.clone())
        } else {
            debug!("Cache entry for {} expired", key);
            None
        }
    }

    /// Store a reading, replacing any existing entry for the key
    pub fn put(&self, key: &str, reading: AirQualityReading, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        entries.insert(
            key.to_string(),
            CacheEntry {
                reading,
                fetched_at: now,
            },
        );
    }

    /// Remove every entry unconditionally; safe to call when empty
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        debug!("Reading cache cleared");
    }
}
