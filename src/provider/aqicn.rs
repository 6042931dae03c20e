//! AQICN feed integration (continuous 0-500 scale)
//!
//! The feed reports a single station measurement: an overall AQI on the
//! continuous US scale plus per-pollutant sub-indices under `iaqi`.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::AqiProvider;
use crate::error::GatewayError;
use crate::geocoding::UPSTREAM_TIMEOUT;
use crate::models::{AirQualityReading, AqiLevel, Coordinate, round_concentration};

const AQICN_BASE_URL: &str = "https://api.waqicn.org";

#[derive(Debug, Clone)]
pub struct AqicnProvider {
    token: String,
    http: Client,
}

impl AqicnProvider {
    pub fn new(token: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { token, http })
    }
}

#[derive(Debug, Deserialize)]
struct AqicnResponse {
    status: String,
    data: Option<AqicnData>,
}

#[derive(Debug, Deserialize)]
struct AqicnData {
    aqi: f64,
    city: AqicnCity,
    #[serde(default)]
    iaqi: AqicnIaqi,
    time: AqicnTime,
}

#[derive(Debug, Deserialize)]
struct AqicnCity {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AqicnIaqi {
    pm25: Option<AqicnValue>,
    pm10: Option<AqicnValue>,
    co: Option<AqicnValue>,
    no2: Option<AqicnValue>,
    o3: Option<AqicnValue>,
    so2: Option<AqicnValue>,
    /// Temperature in degrees Celsius
    t: Option<AqicnValue>,
    /// Relative humidity in percent
    h: Option<AqicnValue>,
}

#[derive(Debug, Deserialize)]
struct AqicnValue {
    v: f64,
}

#[derive(Debug, Deserialize)]
struct AqicnTime {
    s: String,
}

/// Map a station measurement onto the canonical model, converting the
/// continuous scale through the fixed breakpoints.
fn normalize(data: &AqicnData, display_name: Option<&str>, coordinate: Coordinate) -> AirQualityReading {
    let city = display_name
        .map(str::to_string)
        .or_else(|| data.city.name.clone().filter(|name| !name.is_empty()))
        .unwrap_or_else(|| coordinate.display_string());

    let concentration = |value: &Option<AqicnValue>| value.as_ref().map(|v| round_concentration(v.v));

    AirQualityReading {
        city,
        level: AqiLevel::from_us_scale(data.aqi),
        // Stations occasionally omit one particulate channel; the canonical
        // model keeps both fields required, so an absent channel reads 0.0.
        pm2_5: concentration(&data.iaqi.pm25).unwrap_or(0.0),
        pm10: concentration(&data.iaqi.pm10).unwrap_or(0.0),
        co: concentration(&data.iaqi.co),
        no2: concentration(&data.iaqi.no2),
        o3: concentration(&data.iaqi.o3),
        so2: concentration(&data.iaqi.so2),
        temperature: concentration(&data.iaqi.t),
        humidity: concentration(&data.iaqi.h),
        last_update: data.time.s.clone(),
    }
}

#[async_trait]
impl AqiProvider for AqicnProvider {
    async fn fetch_reading(
        &self,
        coordinate: Coordinate,
        display_name: Option<&str>,
    ) -> Result<AirQualityReading, GatewayError> {
        debug!(
            "Fetching AQICN feed for ({}, {})",
            coordinate.latitude, coordinate.longitude
        );

        let url = format!(
            "{AQICN_BASE_URL}/feed/geo:{};{}/?token={}",
            coordinate.latitude, coordinate.longitude, self.token
        );

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::upstream(format!(
                "AQICN request failed with status {status}"
            )));
        }

        let parsed: AqicnResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::upstream(format!("invalid AQICN feed response: {e}")))?;

        if parsed.status != "ok" {
            return Err(GatewayError::NoDataForLocation);
        }
        let Some(data) = parsed.data.as_ref() else {
            return Err(GatewayError::NoDataForLocation);
        };

        Ok(normalize(data, display_name, coordinate))
    }
}
