//! Catalog entries.

use serde::{Deserialize, Serialize};

use super::curve::{CurveData, PowerCurve};

/// Catalog entry as written in the catalog file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntryData {
    pub designation: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    pub rotor_diameter_m: f64,
    pub hub_height_m: f64,
    pub rated_power_kw: f64,
    #[serde(default)]
    pub curve: Option<CurveData>,
}

/// A named turbine model. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecCatalogEntry {
    pub designation: String,
    pub aliases: Vec<String>,
    pub manufacturer: Option<String>,
    pub rotor_diameter_m: f64,
    pub hub_height_m: f64,
    pub rated_power_kw: f64,
    pub curve: PowerCurve,
}

impl SpecCatalogEntry {
    /// Validate raw data and complete the power curve.
    pub fn from_data(data: EntryData) -> Result<Self, String> {
        if data.designation.trim().is_empty() {
            return Err("designation is empty".to_string());
        }
        for (field, value) in [
            ("rotor_diameter_m", data.rotor_diameter_m),
            ("hub_height_m", data.hub_height_m),
            ("rated_power_kw", data.rated_power_kw),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", field, value));
            }
        }
        let curve = PowerCurve::resolve(data.curve, data.rotor_diameter_m / 2.0, data.rated_power_kw)?;

        Ok(Self {
            designation: data.designation,
            aliases: data.aliases,
            manufacturer: data.manufacturer,
            rotor_diameter_m: data.rotor_diameter_m,
            hub_height_m: data.hub_height_m,
            rated_power_kw: data.rated_power_kw,
            curve,
        })
    }

    /// Build an entry without curve data (ramp-synthesized power).
    pub fn simple(
        designation: impl Into<String>,
        rotor_diameter_m: f64,
        hub_height_m: f64,
        rated_power_kw: f64,
    ) -> Result<Self, String> {
        Self::from_data(EntryData {
            designation: designation.into(),
            aliases: Vec::new(),
            manufacturer: None,
            rotor_diameter_m,
            hub_height_m,
            rated_power_kw,
            curve: None,
        })
    }

    pub fn radius_m(&self) -> f64 {
        self.rotor_diameter_m / 2.0
    }
}

/// Rotor radius must stay below hub height or the blades hit the ground.
///
/// Record values take precedence over the candidate's when present.
pub fn is_plausible(
    record_diameter: Option<f64>,
    record_hub_height: Option<f64>,
    entry: &SpecCatalogEntry,
) -> bool {
    let diameter = record_diameter.unwrap_or(entry.rotor_diameter_m);
    let hub = record_hub_height.unwrap_or(entry.hub_height_m);
    diameter / 2.0 < hub
}
