//! OpenWeatherMap Air Pollution integration (ordinal 1..5 scale)

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::AqiProvider;
use crate::error::GatewayError;
use crate::geocoding::UPSTREAM_TIMEOUT;
use crate::models::{AirQualityReading, AqiLevel, Coordinate, round_concentration};

const OWM_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { api_key, http })
    }
}

#[derive(Debug, Deserialize)]
struct OwAirPollutionResponse {
    list: Vec<OwAirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAirPollutionEntry {
    main: OwAqi,
    components: OwComponents,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
    pm10: f64,
    co: Option<f64>,
    no2: Option<f64>,
    o3: Option<f64>,
    so2: Option<f64>,
}

/// Map one upstream entry onto the canonical model. The reported severity
/// is already on the 1..5 scale; anything else is unusable data, not a
/// value to clamp.
fn normalize(entry: &OwAirPollutionEntry, city: String) -> Result<AirQualityReading, GatewayError> {
    let level = AqiLevel::from_ordinal(entry.main.aqi).ok_or(GatewayError::NoDataForLocation)?;

    let last_update = DateTime::<Utc>::from_timestamp(entry.dt, 0)
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d %H:%M UTC")
        .to_string();

    Ok(AirQualityReading {
        city,
        level,
        pm2_5: round_concentration(entry.components.pm2_5),
        pm10: round_concentration(entry.components.pm10),
        co: entry.components.co.map(round_concentration),
        no2: entry.components.no2.map(round_concentration),
        o3: entry.components.o3.map(round_concentration),
        so2: entry.components.so2.map(round_concentration),
        temperature: None,
        humidity: None,
        last_update,
    })
}

#[async_trait]
impl AqiProvider for OpenWeatherProvider {
    async fn fetch_reading(
        &self,
        coordinate: Coordinate,
        display_name: Option<&str>,
    ) -> Result<AirQualityReading, GatewayError> {
        debug!(
            "Fetching OpenWeather air pollution data for ({}, {})",
            coordinate.latitude, coordinate.longitude
        );

        let response = self
            .http
            .get(format!("{OWM_BASE_URL}/air_pollution"))
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::upstream(format!(
                "OpenWeather request failed with status {status}"
            )));
        }

        let parsed: OwAirPollutionResponse = response.json().await.map_err(|e| {
            GatewayError::upstream(format!("invalid OpenWeather air pollution response: {e}"))
        })?;

        let Some(entry) = parsed.list.first() else {
            return Err(GatewayError::NoDataForLocation);
        };

        let city = display_name
            .map(str::to_string)
            .unwrap_or_else(|| coordinate.display_string());

        normalize(entry, city)
    }
}
