//! `AqiFrame` - air-quality gateway for LaMetric-style IoT displays
//!
//! This library converts a location (city name, zip code, or coordinates)
//! into a canonical air-quality reading, normalizing two structurally
//! different upstream provider shapes, and renders the reading as fixed
//! frame sequences for a low-resolution display.

pub mod api;
pub mod aqi_service;
pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod geocoding;
pub mod location_resolver;
pub mod models;
pub mod provider;
pub mod web;

// Re-export core types for public API
pub use aqi_service::AqiService;
pub use cache::{READING_TTL, ReadingCache};
pub use config::GatewayConfig;
pub use display::{DisplayFrame, DisplayResponse, FrameFormat};
pub use error::GatewayError;
pub use geocoding::{GeocodedPlace, Geocoder, OwmGeocoder};
pub use location_resolver::{LocationQuery, LocationResolver};
pub use models::{AirQualityReading, AqiLevel, Coordinate, ResolvedLocation};
pub use provider::{AqiProvider, ProviderId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GatewayError>;
