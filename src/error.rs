//! Error types and handling for the AQI display gateway

use thiserror::Error;

/// Domain errors surfaced by the resolution and normalization pipeline.
///
/// Every variant except `MissingLocationInput` is reported as an HTTP 500
/// by the orchestrator; there is deliberately no per-kind status mapping.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No city, zipcode, or coordinate pair was supplied
    #[error("Please provide either: city name, zipcode, or latitude/longitude coordinates")]
    MissingLocationInput,

    /// Coordinates were numeric but outside the valid ranges
    #[error("Coordinates out of valid range: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// The geocoding collaborator had no result for the query
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Network failure, timeout, or non-2xx reply from a collaborator
    #[error("Upstream request failed: {0}")]
    UpstreamUnavailable(String),

    /// The collaborator responded, but carried no usable reading
    #[error("No air quality data available for this location")]
    NoDataForLocation,
}

impl GatewayError {
    /// Create an upstream error from any displayable cause
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable(message.into())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::UpstreamUnavailable(err.to_string())
    }
}
