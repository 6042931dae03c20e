//! Upstream AQI provider integrations
//!
//! Two structurally different upstream shapes are supported: one reports
//! severity already on the 1..5 ordinal scale, the other on a continuous
//! 0-500 scale. Each integration normalizes into `AirQualityReading`
//! behind the `AqiProvider` seam so nothing downstream can tell which
//! one is active.

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::{AirQualityReading, Coordinate};

pub mod aqicn;
pub mod openweather;

pub use aqicn::AqicnProvider;
pub use openweather::OpenWeatherProvider;

/// Identity of an upstream AQI integration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Aqicn,
}

impl ProviderId {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Aqicn => "aqicn",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "aqicn" => Ok(ProviderId::Aqicn),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, aqicn."
            )),
        }
    }
}

/// Upstream AQI collaborator producing canonical readings
#[async_trait]
pub trait AqiProvider: Send + Sync + Debug {
    /// Fetch and normalize a reading for the coordinate. `display_name`
    /// seeds the reading's city field when the caller already resolved one.
    async fn fetch_reading(
        &self,
        coordinate: Coordinate,
        display_name: Option<&str>,
    ) -> Result<AirQualityReading, GatewayError>;
}

/// Construct the configured provider
pub fn provider_from_config(config: &GatewayConfig) -> Result<Arc<dyn AqiProvider>> {
    let boxed: Arc<dyn AqiProvider> = match config.provider {
        ProviderId::OpenWeather => {
            Arc::new(OpenWeatherProvider::new(config.openweather_api_key.clone())?)
        }
        ProviderId::Aqicn => Arc::new(AqicnProvider::new(config.aqicn_api_key.clone())?),
    };

    Ok(boxed)
}
