//! Subsetting of an inventory to a spatial domain and a point in time.
//!
//! The spatial method keeps records inside a lon/lat bounding box or in a
//! list of countries. The situation date keeps records in service on that
//! day. Both default to "everything".

mod subset;

#[cfg(test)]
mod tests;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::geo::{Position, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use crate::record::TurbineRecord;

pub use subset::RecordFilter;

/// Invalid subset settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubsetError {
    #[error("Bounding box needs min_lon, min_lat, max_lon, max_lat, got {0} values")]
    BoundsCount(usize),

    #[error("Invalid bounding box [{min_lon}, {min_lat}, {max_lon}, {max_lat}]: {reason}")]
    InvalidBounds {
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        reason: &'static str,
    },

    #[error("Invalid bounding box value '{0}'")]
    BoundsValue(String),

    #[error("Invalid situation date '{0}' (expected all, today or YYYY-MM-DD)")]
    SituationDate(String),

    #[error("Unknown subset method '{0}' (expected all, bbox or country)")]
    UnknownMethod(String),
}

/// Closed lon/lat rectangle; points on the edge are inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, SubsetError> {
        let invalid = |reason| SubsetError::InvalidBounds {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
            reason,
        };
        let lon_ok = |v: f64| (MIN_LON..=MAX_LON).contains(&v);
        let lat_ok = |v: f64| (MIN_LAT..=MAX_LAT).contains(&v);
        if !(lon_ok(min_lon) && lon_ok(max_lon) && lat_ok(min_lat) && lat_ok(max_lat)) {
            return Err(invalid("coordinates out of range"));
        }
        if min_lon > max_lon || min_lat > max_lat {
            return Err(invalid("minimum exceeds maximum"));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Build from `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn from_bounds(bounds: &[f64]) -> Result<Self, SubsetError> {
        match *bounds {
            [min_lon, min_lat, max_lon, max_lat] => Self::new(min_lon, min_lat, max_lon, max_lat),
            _ => Err(SubsetError::BoundsCount(bounds.len())),
        }
    }

    pub fn contains(&self, position: &Position) -> bool {
        (self.min_lon..=self.max_lon).contains(&position.lon())
            && (self.min_lat..=self.max_lat).contains(&position.lat())
    }
}

/// Parses `"min_lon, min_lat, max_lon, max_lat"`.
impl FromStr for BoundingBox {
    type Err = SubsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bounds = s
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<f64>().map_err(|_| SubsetError::BoundsValue(v.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_bounds(&bounds)
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// Spatial subsetting method.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpatialSubset {
    /// Keep every record
    #[default]
    All,
    BoundingBox(BoundingBox),
    /// Keep records tagged with one of these countries; an empty list keeps
    /// every record
    Countries(Vec<String>),
}

impl SpatialSubset {
    pub fn method(&self) -> &'static str {
        match self {
            SpatialSubset::All => "all",
            SpatialSubset::BoundingBox(_) => "bbox",
            SpatialSubset::Countries(_) => "country",
        }
    }

    pub fn contains(&self, record: &TurbineRecord) -> bool {
        match self {
            SpatialSubset::All => true,
            SpatialSubset::BoundingBox(bbox) => bbox.contains(&record.position),
            SpatialSubset::Countries(list) if list.is_empty() => true,
            SpatialSubset::Countries(list) => record
                .country
                .as_deref()
                .map_or(false, |c| list.iter().any(|l| l.eq_ignore_ascii_case(c))),
        }
    }

    fn is_unrestricted(&self) -> bool {
        match self {
            SpatialSubset::All => true,
            SpatialSubset::BoundingBox(_) => false,
            SpatialSubset::Countries(list) => list.is_empty(),
        }
    }
}

/// Day on which records must be in service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SituationDate {
    /// No time restriction
    #[default]
    All,
    /// The day the filter is built
    Today,
    On(NaiveDate),
}

impl SituationDate {
    /// The concrete day, or `None` for no restriction.
    pub fn resolve(&self) -> Option<NaiveDate> {
        match self {
            SituationDate::All => None,
            SituationDate::Today => Some(Utc::now().date_naive()),
            SituationDate::On(date) => Some(*date),
        }
    }
}

impl FromStr for SituationDate {
    type Err = SubsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(SituationDate::All),
            "today" => Ok(SituationDate::Today),
            _ => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(SituationDate::On)
                .map_err(|_| SubsetError::SituationDate(value.to_string())),
        }
    }
}

impl fmt::Display for SituationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SituationDate::All => f.write_str("all"),
            SituationDate::Today => f.write_str("today"),
            SituationDate::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Complete subset settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubsetOptions {
    pub spatial: SpatialSubset,
    pub situation_date: SituationDate,
}

impl SubsetOptions {
    /// True if applying these options can never drop a record.
    pub fn is_unrestricted(&self) -> bool {
        self.spatial.is_unrestricted() && self.situation_date == SituationDate::All
    }
}
