//! Location Resolution Module
//!
//! This module handles resolving location inputs (city names, zip codes,
//! coordinates) into structured `ResolvedLocation` values for AQI lookups.

use tracing::debug;

use crate::error::GatewayError;
use crate::geocoding::Geocoder;
use crate::models::{Coordinate, ResolvedLocation};

/// Country assumed for zip lookups when the caller gives none
const DEFAULT_ZIP_COUNTRY: &str = "US";

/// One of the three supported location inputs
#[derive(Debug, Clone)]
pub enum LocationQuery {
    City {
        name: String,
        country: Option<String>,
    },
    Zip {
        code: String,
        country: Option<String>,
    },
    Coordinates {
        lat: f64,
        lon: f64,
    },
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a location input into a structured `ResolvedLocation`
    pub async fn resolve(
        geocoder: &dyn Geocoder,
        query: LocationQuery,
    ) -> Result<ResolvedLocation, GatewayError> {
        debug!("Resolving location input: {:?}", query);

        let location = match query {
            LocationQuery::City { name, country } => {
                Self::resolve_city(geocoder, &name, country.as_deref()).await?
            }
            LocationQuery::Zip { code, country } => {
                Self::resolve_zip(geocoder, &code, country.as_deref()).await?
            }
            LocationQuery::Coordinates { lat, lon } => {
                Self::resolve_coordinates(geocoder, lat, lon).await?
            }
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.display_name, location.coordinate.latitude, location.coordinate.longitude
        );

        Ok(location)
    }

    /// Resolve a city name to coordinates via geocoding
    async fn resolve_city(
        geocoder: &dyn Geocoder,
        name: &str,
        country: Option<&str>,
    ) -> Result<ResolvedLocation, GatewayError> {
        let results = geocoder.search_city(name, country).await?;

        // Use the first (best) result
        let Some(place) = results.into_iter().next() else {
            return Err(GatewayError::LocationNotFound(name.to_string()));
        };

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            place.name, place.lat, place.lon
        );

        let coordinate = Coordinate::new(place.lat, place.lon)?;
        let display_name = place.display_name();
        Ok(ResolvedLocation::new(coordinate, display_name))
    }

    /// Resolve a zip/postal code to coordinates via geocoding
    async fn resolve_zip(
        geocoder: &dyn Geocoder,
        code: &str,
        country: Option<&str>,
    ) -> Result<ResolvedLocation, GatewayError> {
        let country = country.unwrap_or(DEFAULT_ZIP_COUNTRY);

        let place = geocoder
            .search_zip(code, country)
            .await?
            .ok_or_else(|| GatewayError::LocationNotFound(code.to_string()))?;

        debug!(
            "Found location for zip {}: {} ({:.4}, {:.4})",
            code, place.name, place.lat, place.lon
        );

        let coordinate = Coordinate::new(place.lat, place.lon)?;
        let display_name = place.display_name();
        Ok(ResolvedLocation::new(coordinate, display_name))
    }

    /// Resolve coordinates to a location with a proper name via reverse
    /// geocoding. The reverse lookup is best-effort; any failure falls back
    /// to the coordinate string instead of failing the resolution.
    async fn resolve_coordinates(
        geocoder: &dyn Geocoder,
        lat: f64,
        lon: f64,
    ) -> Result<ResolvedLocation, GatewayError> {
        let coordinate = Coordinate::new(lat, lon)?;

        match geocoder.reverse(lat, lon).await {
            Ok(results) => match results.into_iter().next() {
                Some(place) => {
                    let display_name = place.display_name();
                    Ok(ResolvedLocation::new(coordinate, display_name))
                }
                None => {
                    debug!("No reverse geocoding results found, using coordinates as name");
                    Ok(ResolvedLocation::from_coordinate(coordinate))
                }
            },
            Err(e) => {
                debug!("Reverse geocoding failed: {}, using coordinates as name", e);
                Ok(ResolvedLocation::from_coordinate(coordinate))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::GeocodedPlace;
    use async_trait::async_trait;

    /// Stub geocoder with canned responses
    struct StubGeocoder {
        places: Vec<GeocodedPlace>,
        fail: bool,
    }

    impl StubGeocoder {
        fn empty() -> Self {
            Self {
                places: Vec::new(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                places: Vec::new(),
                fail: true,
            }
        }

        fn with_place(place: GeocodedPlace) -> Self {
            Self {
                places: vec![place],
                fail: false,
            }
        }
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn search_city(
            &self,
            _name: &str,
            _country: Option<&str>,
        ) -> Result<Vec<GeocodedPlace>, GatewayError> {
            if self.fail {
                return Err(GatewayError::upstream("stub failure"));
            }
            Ok(self.places.clone())
        }

        async fn search_zip(
            &self,
            _code: &str,
            _country: &str,
        ) -> Result<Option<GeocodedPlace>, GatewayError> {
            if self.fail {
                return Err(GatewayError::upstream("stub failure"));
            }
            Ok(self.places.first().cloned())
        }

        async fn reverse(&self, _lat: f64, _lon: f64) -> Result<Vec<GeocodedPlace>, GatewayError> {
            if self.fail {
                return Err(GatewayError::upstream("stub failure"));
            }
            Ok(self.places.clone())
        }
    }

    fn interlaken() -> GeocodedPlace {
        GeocodedPlace {
            name: "Interlaken".to_string(),
            lat: 46.6863,
            lon: 7.8632,
            country: Some("CH".to_string()),
            state: None,
        }
    }

    #[tokio::test]
    async fn test_city_resolution_uses_first_result() {
        let geocoder = StubGeocoder::with_place(interlaken());
        let query = LocationQuery::City {
            name: "Interlaken".to_string(),
            country: None,
        };

        let location = LocationResolver::resolve(&geocoder, query).await.unwrap();
        assert_eq!(location.display_name, "Interlaken, CH");
        assert_eq!(location.coordinate.latitude, 46.6863);
    }

    #[tokio::test]
    async fn test_city_without_results_is_not_found() {
        let geocoder = StubGeocoder::empty();
        let query = LocationQuery::City {
            name: "Atlantis".to_string(),
            country: None,
        };

        let err = LocationResolver::resolve(&geocoder, query).await.unwrap_err();
        match err {
            GatewayError::LocationNotFound(name) => assert_eq!(name, "Atlantis"),
            other => panic!("expected LocationNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zip_without_result_is_not_found() {
        let geocoder = StubGeocoder::empty();
        let query = LocationQuery::Zip {
            code: "00000".to_string(),
            country: None,
        };

        let err = LocationResolver::resolve(&geocoder, query).await.unwrap_err();
        assert!(matches!(err, GatewayError::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn test_coordinate_range_is_validated() {
        let geocoder = StubGeocoder::empty();
        let query = LocationQuery::Coordinates {
            lat: 95.0,
            lon: 8.0,
        };

        let err = LocationResolver::resolve(&geocoder, query).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidCoordinate { .. }));
    }

    #[tokio::test]
    async fn test_reverse_failure_falls_back_to_coordinates() {
        let geocoder = StubGeocoder::failing();
        let query = LocationQuery::Coordinates {
            lat: 46.8182,
            lon: 8.2275,
        };

        let location = LocationResolver::resolve(&geocoder, query).await.unwrap();
        assert_eq!(location.display_name, "46.82, 8.23");
    }

    #[tokio::test]
    async fn test_reverse_empty_falls_back_to_coordinates() {
        let geocoder = StubGeocoder::empty();
        let query = LocationQuery::Coordinates {
            lat: 46.8182,
            lon: 8.2275,
        };

        let location = LocationResolver::resolve(&geocoder, query).await.unwrap();
        assert_eq!(location.display_name, "46.82, 8.23");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_for_city() {
        let geocoder = StubGeocoder::failing();
        let query = LocationQuery::City {
            name: "London".to_string(),
            country: None,
        };

        let err = LocationResolver::resolve(&geocoder, query).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamUnavailable(_)));
    }
}
