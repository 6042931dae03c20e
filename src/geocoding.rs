//! Geocoding collaborator for city, zip, and reverse lookups
//!
//! Wraps the OpenWeatherMap Geo API. The trait seam exists so the
//! resolver can be exercised against a stub in tests.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GatewayError;

const OWM_GEO_URL: &str = "http://api.openweathermap.org/geo/1.0";

/// Upstream calls are bounded by a short timeout; a timed-out call is an
/// upstream failure, never retried here.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// A single place returned by the geocoding collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodedPlace {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl GeocodedPlace {
    /// "{name}, {country}" when a country code is known
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

/// External geocoding collaborator
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward lookup by city name, optionally scoped to a country code
    async fn search_city(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Vec<GeocodedPlace>, GatewayError>;

    /// Forward lookup by zip/postal code; `None` when the code is unknown
    async fn search_zip(
        &self,
        code: &str,
        country: &str,
    ) -> Result<Option<GeocodedPlace>, GatewayError>;

    /// Reverse lookup; best-effort, callers tolerate failure
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Vec<GeocodedPlace>, GatewayError>;
}

/// OpenWeatherMap Geo API response for zip lookups (a single object,
/// unlike the array shape of the direct endpoint)
#[derive(Debug, Deserialize)]
struct ZipResponse {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

/// OpenWeatherMap Geo API client
pub struct OwmGeocoder {
    client: Client,
    api_key: String,
}

impl OwmGeocoder {
    /// Create a new geocoding client with the upstream timeout applied
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(concat!("AqiFrame/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, api_key })
    }

    async fn fetch_places(&self, url: String) -> Result<Vec<GeocodedPlace>, GatewayError> {
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::upstream(format!(
                "geocoding request failed with status {status}"
            )));
        }

        response
            .json::<Vec<GeocodedPlace>>()
            .await
            .map_err(|e| GatewayError::upstream(format!("invalid geocoding response: {e}")))
    }
}

#[async_trait]
impl Geocoder for OwmGeocoder {
    async fn search_city(
        &self,
        name: &str,
        country: Option<&str>,
    ) -> Result<Vec<GeocodedPlace>, GatewayError> {
        let query = match country {
            Some(country) => format!("{name},{country}"),
            None => name.to_string(),
        };
        debug!("Geocoding city query: '{}'", query);

        let url = format!(
            "{OWM_GEO_URL}/direct?q={}&limit=5&appid={}",
            urlencoding::encode(&query),
            self.api_key
        );

        let places = self.fetch_places(url).await?;
        if places.is_empty() {
            warn!("No geocoding results for '{}'", query);
        }
        Ok(places)
    }

    async fn search_zip(
        &self,
        code: &str,
        country: &str,
    ) -> Result<Option<GeocodedPlace>, GatewayError> {
        debug!("Geocoding zip code: {} ({})", code, country);

        let url = format!(
            "{OWM_GEO_URL}/zip?zip={},{}&appid={}",
            urlencoding::encode(code),
            country,
            self.api_key
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        // The zip endpoint reports an unknown code as 404 rather than an
        // empty body.
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GatewayError::upstream(format!(
                "zip geocoding request failed with status {status}"
            )));
        }

        let zip: ZipResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::upstream(format!("invalid zip geocoding response: {e}")))?;

        Ok(Some(GeocodedPlace {
            name: zip.name,
            lat: zip.lat,
            lon: zip.lon,
            country: zip.country,
            state: None,
        }))
    }

    async fn reverse(&self, lat: f64, lon: f64) -> Result<Vec<GeocodedPlace>, GatewayError> {
        debug!("Reverse geocoding: ({}, {})", lat, lon);

        let url = format!(
            "{OWM_GEO_URL}/reverse?lat={lat}&lon={lon}&limit=1&appid={}",
            self.api_key
        );

        self.fetch_places(url).await
    }
}
