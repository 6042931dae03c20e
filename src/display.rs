//! Display frame encodings for the target device
//!
//! Three deterministic, side-effect-free transforms from a canonical
//! reading to an ordered frame sequence. Icon IDs are LaMetric icon
//! library references.

use serde::{Deserialize, Serialize};

use crate::models::{AirQualityReading, AqiLevel};

// Device icon library IDs
const ICON_PM2_5: u32 = 34945;
const ICON_PM10: u32 = 34946;
const ICON_AQI_METRIC: u32 = 34947;
const ICON_LOCATION: u32 = 34835;
const ICON_AIR_QUALITY: u32 = 49386;

/// Icon for frames describing overall air quality at a severity level
#[must_use]
pub fn severity_icon(level: AqiLevel) -> u32 {
    match level {
        AqiLevel::Good => 49386,
        AqiLevel::Fair => 49387,
        AqiLevel::Moderate => 49388,
        AqiLevel::Poor => 49389,
        AqiLevel::VeryPoor => 49390,
    }
}

/// Requested frame encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameFormat {
    Full,
    Metric,
    #[default]
    Compact,
}

impl FrameFormat {
    /// Parse the `format` selector; absent or unrecognized values fall
    /// back to `Compact` and are never an error.
    #[must_use]
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(str::to_lowercase).as_deref() {
            Some("full") => FrameFormat::Full,
            Some("metric") => FrameFormat::Metric,
            Some("compact") | None => FrameFormat::Compact,
            Some(other) => {
                tracing::debug!("Unrecognized format selector '{}', using compact", other);
                FrameFormat::Compact
            }
        }
    }
}

/// Numeric value with a display unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricValue {
    pub value: f64,
    pub unit: String,
}

/// One unit of display content; carries text or a metric, plus an icon
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DisplayFrame {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricValue>,
}

impl DisplayFrame {
    fn text(text: impl Into<String>, icon: u32) -> Self {
        Self {
            text: Some(text.into()),
            icon: Some(icon),
            metric: None,
        }
    }

    fn metric(value: f64, unit: &str, icon: u32) -> Self {
        Self {
            text: None,
            icon: Some(icon),
            metric: Some(MetricValue {
                value,
                unit: unit.to_string(),
            }),
        }
    }
}

/// Ordered frame sequence for one display update
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayResponse {
    pub frames: Vec<DisplayFrame>,
}

/// Render a reading with the requested encoding
#[must_use]
pub fn format_reading(reading: &AirQualityReading, format: FrameFormat) -> DisplayResponse {
    match format {
        FrameFormat::Full => format_full(reading),
        FrameFormat::Metric => format_metric(reading),
        FrameFormat::Compact => format_compact(reading),
    }
}

/// The portion of the city name before the first comma
fn short_city(city: &str) -> &str {
    city.split(',').next().unwrap_or(city)
}

/// Compact mode: exactly 5 frames, fixed order
fn format_compact(reading: &AirQualityReading) -> DisplayResponse {
    let frames = vec![
        DisplayFrame::text(short_city(&reading.city), ICON_LOCATION),
        DisplayFrame::text(
            format!("AQI {}/5", reading.level.ordinal()),
            severity_icon(reading.level),
        ),
        DisplayFrame::text(reading.level.label(), ICON_AIR_QUALITY),
        DisplayFrame::text(format!("PM2.5: {:.1}", reading.pm2_5), ICON_PM2_5),
        DisplayFrame::text(format!("PM10: {:.1}", reading.pm10), ICON_PM10),
    ];

    DisplayResponse { frames }
}

/// Full mode: the compact frames, optional gas frames when the reading
/// carries them, and the observation time
fn format_full(reading: &AirQualityReading) -> DisplayResponse {
    let mut response = format_compact(reading);

    if let Some(co) = reading.co {
        response
            .frames
            .push(DisplayFrame::text(format!("CO: {co:.1} µg/m³"), ICON_AIR_QUALITY));
    }
    if let Some(no2) = reading.no2 {
        response
            .frames
            .push(DisplayFrame::text(format!("NO2: {no2:.1} µg/m³"), ICON_AIR_QUALITY));
    }

    response.frames.push(DisplayFrame::text(
        format!("Updated: {}", reading.last_update),
        ICON_AQI_METRIC,
    ));

    response
}

/// Metric mode: one headline text frame and three numeric frames
fn format_metric(reading: &AirQualityReading) -> DisplayResponse {
    let frames = vec![
        DisplayFrame::text(
            format!("{} - {}", short_city(&reading.city), reading.level.label()),
            severity_icon(reading.level),
        ),
        DisplayFrame::metric(reading.pm2_5, "µg/m³", ICON_PM2_5),
        DisplayFrame::metric(reading.pm10, "µg/m³", ICON_PM10),
        DisplayFrame::metric(f64::from(reading.level.ordinal()), "AQI", ICON_AQI_METRIC),
    ];

    DisplayResponse { frames }
}
