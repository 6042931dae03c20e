//! Canonical air-quality reading model
//!
//! Both upstream provider shapes normalize into `AirQualityReading`; the
//! rest of the pipeline never sees provider-specific structure.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical 1..5 air-quality severity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiLevel {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

impl AqiLevel {
    pub const ALL: [AqiLevel; 5] = [
        AqiLevel::Good,
        AqiLevel::Fair,
        AqiLevel::Moderate,
        AqiLevel::Poor,
        AqiLevel::VeryPoor,
    ];

    /// Map an ordinal reported on the 1..5 scale; `None` outside it
    #[must_use]
    pub fn from_ordinal(value: u8) -> Option<Self> {
        match value {
            1 => Some(AqiLevel::Good),
            2 => Some(AqiLevel::Fair),
            3 => Some(AqiLevel::Moderate),
            4 => Some(AqiLevel::Poor),
            5 => Some(AqiLevel::VeryPoor),
            _ => None,
        }
    }

    /// Convert a continuous 0-500 US AQI value onto the 1..5 scale.
    ///
    /// Breakpoints: <=50 -> 1, <=100 -> 2, <=150 -> 3, <=200 -> 4,
    /// everything above -> 5. Total over all float inputs.
    #[must_use]
    pub fn from_us_scale(aqi: f64) -> Self {
        if aqi <= 50.0 {
            AqiLevel::Good
        } else if aqi <= 100.0 {
            AqiLevel::Fair
        } else if aqi <= 150.0 {
            AqiLevel::Moderate
        } else if aqi <= 200.0 {
            AqiLevel::Poor
        } else {
            AqiLevel::VeryPoor
        }
    }

    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }
}

impl Serialize for AqiLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for AqiLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        AqiLevel::from_ordinal(value)
            .ok_or_else(|| serde::de::Error::custom(format!("AQI level out of range: {value}")))
    }
}

/// Round a pollutant concentration to 1 decimal place (half away from zero)
#[must_use]
pub fn round_concentration(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// The single internal representation of an air-quality observation,
/// regardless of which upstream provider produced it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirQualityReading {
    /// Never empty; falls back to the formatted coordinate string
    pub city: String,
    pub level: AqiLevel,
    /// PM2.5 concentration in ug/m3, 1 decimal place
    pub pm2_5: f64,
    /// PM10 concentration in ug/m3, 1 decimal place
    pub pm10: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub o3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub so2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Provider-reported observation time, human-readable
    pub last_update: String,
}
