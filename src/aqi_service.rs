//! AQI normalization service
//!
//! Fetches raw provider data for a resolved location and memoizes the
//! canonical reading through the shared cache. Failures are never cached.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::cache::ReadingCache;
use crate::error::GatewayError;
use crate::models::{AirQualityReading, ResolvedLocation};
use crate::provider::AqiProvider;

/// Normalizes upstream AQI data behind the reading cache
pub struct AqiService {
    provider: Arc<dyn AqiProvider>,
    cache: ReadingCache,
}

impl AqiService {
    #[must_use]
    pub fn new(provider: Arc<dyn AqiProvider>, cache: ReadingCache) -> Self {
        Self { provider, cache }
    }

    /// Get the canonical reading for a resolved location.
    ///
    /// `name_key` switches the cache key to the normalized query string for
    /// name-based requests; coordinate requests key on rounded coordinates.
    /// A fresh cached entry is returned unchanged without touching the
    /// upstream collaborator.
    pub async fn get_reading(
        &self,
        location: &ResolvedLocation,
        name_key: Option<&str>,
    ) -> Result<AirQualityReading, GatewayError> {
        let key = match name_key {
            Some(name) => normalize_name_key(name),
            None => location.coordinate.cache_key(),
        };

        if let Some(reading) = self.cache.get(&key, Instant::now()) {
            debug!("Using cached AQI data for {}", key);
            return Ok(reading);
        }

        let reading = self
            .provider
            .fetch_reading(location.coordinate, Some(&location.display_name))
            .await?;

        self.cache.put(&key, reading.clone(), Instant::now());
        info!("Fetched AQI data for {} ({})", location.display_name, key);

        Ok(reading)
    }

    /// Drop every cached reading
    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("AQI cache cleared");
    }
}

/// Cache key for name-based requests: trimmed and lowercased
fn normalize_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::READING_TTL;
    use crate::models::{AqiLevel, Coordinate};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider that counts upstream calls and serves a fixed reading
    #[derive(Debug)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AqiProvider for CountingProvider {
        async fn fetch_reading(
            &self,
            coordinate: Coordinate,
            display_name: Option<&str>,
        ) -> Result<AirQualityReading, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AirQualityReading {
                city: display_name
                    .map(str::to_string)
                    .unwrap_or_else(|| coordinate.display_string()),
                level: AqiLevel::Fair,
                pm2_5: 9.1,
                pm10: 15.0,
                co: None,
                no2: None,
                o3: None,
                so2: None,
                temperature: None,
                humidity: None,
                last_update: "2026-08-06 09:00 UTC".to_string(),
            })
        }
    }

    fn location() -> ResolvedLocation {
        ResolvedLocation::new(Coordinate::new(40.7128, -74.006).unwrap(), "New York, US")
    }

    #[tokio::test]
    async fn test_second_lookup_within_ttl_hits_the_cache() {
        let provider = Arc::new(CountingProvider::new());
        let service = AqiService::new(provider.clone(), ReadingCache::new(READING_TTL));

        let first = service.get_reading(&location(), None).await.unwrap();
        let second = service.get_reading(&location(), None).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_a_refetch() {
        let provider = Arc::new(CountingProvider::new());
        let service = AqiService::new(provider.clone(), ReadingCache::new(READING_TTL));

        service.get_reading(&location(), None).await.unwrap();
        service.clear_cache();
        service.get_reading(&location(), None).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_name_key_is_normalized() {
        let provider = Arc::new(CountingProvider::new());
        let service = AqiService::new(provider.clone(), ReadingCache::new(READING_TTL));

        service
            .get_reading(&location(), Some("  London "))
            .await
            .unwrap();
        service
            .get_reading(&location(), Some("london"))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_name_and_coordinate_keys_are_distinct() {
        let provider = Arc::new(CountingProvider::new());
        let service = AqiService::new(provider.clone(), ReadingCache::new(READING_TTL));

        service.get_reading(&location(), None).await.unwrap();
        service
            .get_reading(&location(), Some("New York"))
            .await
            .unwrap();

        assert_eq!(provider.calls(), 2);
    }
}
