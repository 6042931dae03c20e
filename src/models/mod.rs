//! Data models for the AQI display gateway
//!
//! Organized by concern:
//! - Location: coordinates and resolved places
//! - Reading: the canonical air-quality representation

pub mod location;
pub mod reading;

// Re-export all public types for convenient access
pub use location::{Coordinate, ResolvedLocation};
pub use reading::{AirQualityReading, AqiLevel, round_concentration};
