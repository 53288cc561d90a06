//! Weighted dimension distance between a record and a catalog entry.

use crate::catalog::{DimensionRanges, Range, SpecCatalogEntry};

/// Relative importance of each dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchWeights {
    pub rotor_diameter: f64,
    pub hub_height: f64,
    pub rated_power: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            rotor_diameter: 3.0,
            hub_height: 1.5,
            rated_power: 2.0,
        }
    }
}

/// The dimensions a record reports.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dimensions {
    pub rotor_diameter: Option<f64>,
    pub hub_height: Option<f64>,
    /// Per-turbine rated power
    pub rated_power: Option<f64>,
}

impl Dimensions {
    pub fn is_empty(&self) -> bool {
        self.rotor_diameter.is_none() && self.hub_height.is_none() && self.rated_power.is_none()
    }
}

/// Weighted mean of `|record − entry| / scale` over usable dimensions.
///
/// A dimension is usable if the record has a finite value for it and the
/// value lies inside the catalog range (or `allow_extrapolation` is set).
/// Returns `None` if no dimension is usable.
pub fn score(
    dims: &Dimensions,
    entry: &SpecCatalogEntry,
    ranges: &DimensionRanges,
    weights: &MatchWeights,
    allow_extrapolation: bool,
) -> Option<f64> {
    let terms = [
        (
            dims.rotor_diameter,
            entry.rotor_diameter_m,
            &ranges.rotor_diameter,
            weights.rotor_diameter,
        ),
        (
            dims.hub_height,
            entry.hub_height_m,
            &ranges.hub_height,
            weights.hub_height,
        ),
        (
            dims.rated_power,
            entry.rated_power_kw,
            &ranges.rated_power,
            weights.rated_power,
        ),
    ];

    let mut total = 0.0;
    let mut weight_sum = 0.0;
    for (value, reference, range, weight) in terms {
        let Some(value) = value.filter(|v| v.is_finite()) else {
            continue;
        };
        if weight <= 0.0 || !usable(value, range, allow_extrapolation) {
            continue;
        }
        total += weight * (value - reference).abs() / range.scale();
        weight_sum += weight;
    }

    (weight_sum > 0.0).then(|| total / weight_sum)
}

fn usable(value: f64, range: &Range, allow_extrapolation: bool) -> bool {
    allow_extrapolation || range.contains(value)
}

/// Confidence for an accepted score: `1 − score / threshold`, in [0, 1].
pub fn confidence(score: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return if score <= 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - score / threshold).clamp(0.0, 1.0)
}
