//! Environment-backed configuration
//!
//! Provider credentials are intentionally not validated at startup; a
//! missing key surfaces as an upstream authentication failure on the
//! first request.

use std::env;

use anyhow::Result;
use tracing::warn;

use crate::provider::ProviderId;

const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration sourced from the process environment
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listening port (`PORT`)
    pub port: u16,
    /// Active upstream AQI integration (`AQI_PROVIDER`)
    pub provider: ProviderId,
    /// OpenWeatherMap API key (`OWM_API_KEY`)
    pub openweather_api_key: String,
    /// AQICN API token (`AQICN_API_KEY`)
    pub aqicn_api_key: String,
}

impl GatewayConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("AQI_PROVIDER") {
            Ok(raw) => ProviderId::try_from(raw.as_str())?,
            Err(_) => ProviderId::OpenWeather,
        };

        Ok(Self {
            port: parse_port(env::var("PORT").ok()),
            provider,
            openweather_api_key: env::var("OWM_API_KEY").unwrap_or_default(),
            aqicn_api_key: env::var("AQICN_API_KEY").unwrap_or_default(),
        })
    }
}

fn parse_port(raw: Option<String>) -> u16 {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid PORT value '{}', using {}", raw, DEFAULT_PORT);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}
