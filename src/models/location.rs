//! Location models for geographic coordinates and resolved places

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating the latitude/longitude ranges
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GatewayError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GatewayError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Format as a human-facing fallback name, e.g. "40.71, -74.00"
    #[must_use]
    pub fn display_string(&self) -> String {
        format!("{:.2}, {:.2}", self.latitude, self.longitude)
    }

    /// Cache key with coordinates rounded to 4 decimal places
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{:.4}_{:.4}", self.latitude, self.longitude)
    }
}

/// A location after resolution, ready for an AQI lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    /// Human-readable name; falls back to the coordinate string
    pub display_name: String,
}

impl ResolvedLocation {
    #[must_use]
    pub fn new(coordinate: Coordinate, display_name: impl Into<String>) -> Self {
        Self {
            coordinate,
            display_name: display_name.into(),
        }
    }

    /// Resolution without a human-readable name; the formatted coordinate
    /// string stands in for it
    #[must_use]
    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        let display_name = coordinate.display_string();
        Self {
            coordinate,
            display_name,
        }
    }
}
