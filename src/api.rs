//! HTTP API surface for air-quality lookups
//!
//! Thin orchestration layer: resolve the location, fetch the normalized
//! reading, render the frames, and shape the outward JSON envelope.
//! Every domain failure maps to a single 500 response; only a missing
//! location input and non-numeric coordinates short-circuit to 400
//! before any collaborator is called.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use crate::aqi_service::AqiService;
use crate::display::{DisplayResponse, FrameFormat, format_reading};
use crate::error::GatewayError;
use crate::geocoding::Geocoder;
use crate::location_resolver::{LocationQuery, LocationResolver};
use crate::models::AirQualityReading;

/// Static hints attached to every 500 response
const TROUBLESHOOTING_HINTS: [&str; 4] = [
    "Ensure your provider API key is set correctly",
    "Check that the city/zipcode/coordinates are valid",
    "Verify you have network connectivity",
    "Verify that the location has air quality monitoring data",
];

const USAGE_EXAMPLES: [&str; 4] = [
    "/api/aqi?city=London",
    "/api/aqi?city=Mumbai&country=IN",
    "/api/aqi?zipcode=10001&countryCode=US",
    "/api/aqi?lat=40.7128&lon=-74.0060",
];

/// Shared per-process services handed to every request handler
pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub service: AqiService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/aqi", get(get_aqi))
        .route("/aqi/clear-cache", get(clear_cache))
        .with_state(state)
}

/// Query parameters for `GET /aqi`. Coordinates arrive as strings so a
/// non-numeric value yields our 400 contract instead of a rejection.
#[derive(Debug, Deserialize)]
pub struct AqiParams {
    city: Option<String>,
    zipcode: Option<String>,
    country: Option<String>,
    #[serde(rename = "countryCode")]
    country_code: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
    format: Option<String>,
}

async fn get_aqi(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AqiParams>,
) -> (StatusCode, Json<Value>) {
    // Step 1: pick the location input; rejected before any network access.
    let (query, name_key) = match parse_location(&params) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };

    let format = FrameFormat::from_selector(params.format.as_deref());

    // Steps 2-4: resolve, normalize, format
    match fetch_and_format(&state, query, name_key.as_deref(), format).await {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(err) => {
            error!("Error in AQI endpoint: {}", err);
            error_response(&err)
        }
    }
}

async fn clear_cache(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    state.service.clear_cache();
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "AQI cache cleared successfully",
        })),
    )
}

/// Decide which resolution path the request takes, and the cache key kind:
/// name-based requests also yield the string the reading is memoized under.
fn parse_location(
    params: &AqiParams,
) -> Result<(LocationQuery, Option<String>), (StatusCode, Json<Value>)> {
    if let (Some(lat), Some(lon)) = (&params.lat, &params.lon) {
        let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid coordinates",
                    "message": "Latitude and longitude must be valid numbers",
                    "examples": USAGE_EXAMPLES,
                })),
            ));
        };
        return Ok((LocationQuery::Coordinates { lat, lon }, None));
    }

    if let Some(zipcode) = &params.zipcode {
        let name_key = name_cache_key(zipcode, params.country_code.as_deref());
        return Ok((
            LocationQuery::Zip {
                code: zipcode.clone(),
                country: params.country_code.clone(),
            },
            Some(name_key),
        ));
    }

    if let Some(city) = &params.city {
        let name_key = name_cache_key(city, params.country.as_deref());
        return Ok((
            LocationQuery::City {
                name: city.clone(),
                country: params.country.clone(),
            },
            Some(name_key),
        ));
    }

    Err(error_response(&GatewayError::MissingLocationInput))
}

/// Name-based cache key; scoped by country so "London,GB" and "London,CA"
/// never collide
fn name_cache_key(name: &str, country: Option<&str>) -> String {
    match country {
        Some(country) => format!("{name},{country}"),
        None => name.to_string(),
    }
}

async fn fetch_and_format(
    state: &AppState,
    query: LocationQuery,
    name_key: Option<&str>,
    format: FrameFormat,
) -> Result<Value, GatewayError> {
    let location = LocationResolver::resolve(state.geocoder.as_ref(), query).await?;
    let reading = state.service.get_reading(&location, name_key).await?;
    let frames = format_reading(&reading, format);
    Ok(envelope(&reading, &frames))
}

/// Outward response envelope: the frame payload plus a summary block
fn envelope(reading: &AirQualityReading, frames: &DisplayResponse) -> Value {
    json!({
        "success": true,
        "data": frames,
        "aqi_info": {
            "city": reading.city,
            "aqi_value": reading.level.ordinal(),
            "aqi_level": reading.level.label(),
            "pm2_5": reading.pm2_5,
            "pm10": reading.pm10,
            "recommendation": health_recommendation(reading.level.ordinal()),
            "last_update": reading.last_update,
        },
    })
}

fn error_response(err: &GatewayError) -> (StatusCode, Json<Value>) {
    match err {
        GatewayError::MissingLocationInput => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Missing parameters",
                "message": err.to_string(),
                "examples": USAGE_EXAMPLES,
            })),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to fetch AQI data",
                "message": err.to_string(),
                "troubleshooting": TROUBLESHOOTING_HINTS,
            })),
        ),
    }
}

/// Health recommendation per severity level. Out-of-range input is
/// unreachable from normalized readings but still answered.
#[must_use]
pub fn health_recommendation(level: u8) -> &'static str {
    match level {
        1 => "Air quality is good. Enjoy outdoor activities!",
        2 => "Air quality is fair. Unusually sensitive people should consider limiting prolonged outdoor exertion.",
        3 => "Air quality is moderate. Members of sensitive groups may experience health effects.",
        4 => "Air quality is poor. Everyone may begin to experience health effects.",
        5 => "Air quality is very poor. Everyone should avoid outdoor activities.",
        _ => "Unknown air quality level",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_covers_all_levels() {
        assert!(health_recommendation(1).contains("good"));
        assert!(health_recommendation(2).contains("fair"));
        assert!(health_recommendation(3).contains("moderate"));
        assert!(health_recommendation(4).contains("poor"));
        assert!(health_recommendation(5).contains("very poor"));
        assert_eq!(health_recommendation(0), "Unknown air quality level");
        assert_eq!(health_recommendation(6), "Unknown air quality level");
    }

    #[test]
    fn test_name_cache_key_scoping() {
        assert_eq!(name_cache_key("London", None), "London");
        assert_eq!(name_cache_key("London", Some("GB")), "London,GB");
    }

    #[test]
    fn test_parse_location_prefers_coordinates() {
        let params = AqiParams {
            city: Some("London".to_string()),
            zipcode: None,
            country: None,
            country_code: None,
            lat: Some("40.71".to_string()),
            lon: Some("-74.0".to_string()),
            format: None,
        };

        let (query, name_key) = parse_location(&params).unwrap();
        assert!(matches!(query, LocationQuery::Coordinates { .. }));
        assert!(name_key.is_none());
    }

    #[test]
    fn test_parse_location_rejects_non_numeric_coordinates() {
        let params = AqiParams {
            city: None,
            zipcode: None,
            country: None,
            country_code: None,
            lat: Some("forty".to_string()),
            lon: Some("-74.0".to_string()),
            format: None,
        };

        let (status, _) = parse_location(&params).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_location_requires_some_input() {
        let params = AqiParams {
            city: None,
            zipcode: None,
            country: None,
            country_code: None,
            lat: None,
            lon: None,
            format: None,
        };

        let (status, _) = parse_location(&params).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
