//! Default configuration values.

use crate::dedupe::DEFAULT_MIN_DISTANCE;
use crate::merge::DEFAULT_MAX_DISTANCE;

/// Attribute names tried, in order, for a land feature's country.
pub const DEFAULT_LAND_NAME_FIELDS: [&str; 3] = ["ISO3166-1-Alpha-3", "ISO_A3", "name"];

/// Attribute names tried, in order, for an EEZ feature's country.
pub const DEFAULT_EEZ_NAME_FIELDS: [&str; 3] = ["ISO_TER1", "ISO_SOV1", "TERRITORY1"];

/// Deduplication distance in degrees.
pub const DEFAULT_DEDUPE_DISTANCE: f64 = DEFAULT_MIN_DISTANCE;

/// Merge correspondence distance in degrees.
pub const DEFAULT_MERGE_DISTANCE: f64 = DEFAULT_MAX_DISTANCE;

pub const DEFAULT_WEIGHT_ROTOR_DIAMETER: f64 = 3.0;
pub const DEFAULT_WEIGHT_HUB_HEIGHT: f64 = 1.5;
pub const DEFAULT_WEIGHT_RATED_POWER: f64 = 2.0;
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.15;
pub const DEFAULT_REVIEW_CONFIDENCE: f64 = 0.5;

pub fn default_land_name_fields() -> Vec<String> {
    DEFAULT_LAND_NAME_FIELDS.iter().map(|s| s.to_string()).collect()
}

pub fn default_eez_name_fields() -> Vec<String> {
    DEFAULT_EEZ_NAME_FIELDS.iter().map(|s| s.to_string()).collect()
}
