//! Position type definitions

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range (WGS84 decimal degrees)
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range (WGS84 decimal degrees)
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Rough length of one degree of latitude in meters.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Mean Earth radius in meters, used for great-circle distances.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Errors produced when validating a position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("Invalid longitude: {0} (must be finite and within -180..=180)")]
    InvalidLongitude(f64),
    #[error("Invalid latitude: {0} (must be finite and within -90..=90)")]
    InvalidLatitude(f64),
}

/// A WGS84 point in decimal degrees.
///
/// Positions coming out of [`Position::new`] are always finite and within
/// range. Deserialized positions are unchecked until they pass through
/// [`Position::validate`], which record ingestion does for every record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    lon: f64,
    lat: f64,
}

impl Position {
    /// Create a validated position.
    pub fn new(lon: f64, lat: f64) -> Result<Self, PositionError> {
        let position = Self { lon, lat };
        position.validate()?;
        Ok(position)
    }

    /// Longitude in decimal degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in decimal degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Check that both components are finite and inside WGS84 bounds.
    pub fn validate(&self) -> Result<(), PositionError> {
        if !self.lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.lon) {
            return Err(PositionError::InvalidLongitude(self.lon));
        }
        if !self.lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(PositionError::InvalidLatitude(self.lat));
        }
        Ok(())
    }

    /// The position as an `[x, y]` pair for spatial structures.
    #[inline]
    pub fn xy(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}
