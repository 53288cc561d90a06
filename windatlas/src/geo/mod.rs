//! Geographic primitives.
//!
//! All matching distances in the engine are planar distances over
//! (longitude, latitude) in decimal degrees. This keeps `d_min` / `d_max`
//! thresholds in one consistent unit across every stage. Great-circle
//! distances are only used for human-facing reports.

mod types;

pub use types::{
    Position, PositionError, EARTH_RADIUS_M, MAX_LAT, MAX_LON, METERS_PER_DEGREE, MIN_LAT,
    MIN_LON,
};

/// Planar distance between two positions, in degrees.
#[inline]
pub fn planar_distance(a: &Position, b: &Position) -> f64 {
    let dx = a.lon() - b.lon();
    let dy = a.lat() - b.lat();
    (dx * dx + dy * dy).sqrt()
}

/// Approximate meters for a distance expressed in degrees.
///
/// Only meaningful for log output; longitude degrees shrink with latitude.
#[inline]
pub fn approx_meters(degrees: f64) -> f64 {
    degrees * METERS_PER_DEGREE
}

/// Great-circle distance in meters using the haversine formula.
pub fn haversine_m(a: &Position, b: &Position) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
