//! Canonical turbine record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::geo::Position;

use super::dates;

/// How a record obtained its turbine type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Type reported by the source itself
    Source,
    /// Designation or alias lookup in the catalog
    Designation,
    /// Weighted dimension similarity against the catalog
    Scored,
    /// Region default from configuration
    RegionDefault,
}

impl MatchMethod {
    pub fn name(&self) -> &'static str {
        match self {
            MatchMethod::Source => "source",
            MatchMethod::Designation => "designation",
            MatchMethod::Scored => "scored",
            MatchMethod::RegionDefault => "region_default",
        }
    }
}

/// One turbine (or one aggregate wind-farm entry) from one source.
///
/// Every attribute except `id`, `position` and `source` is optional; a
/// missing value is `None`, never a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineRecord {
    /// Source-local identifier
    pub id: String,
    pub position: Position,
    /// Provenance tag; `"a+b"` after a merge used both sources
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_offshore: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hub_height_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotor_diameter_m: Option<f64>,
    /// Installed power; for aggregates this covers all `n_turbines`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_power_kw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turbine_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_by: Option<MatchMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Free-text model designation as reported by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_farm: Option<String>,
    /// Set on aggregate entries that stand for several turbines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_turbines: Option<u32>,
    /// Start of operation; a bare year means January 1
    #[serde(
        default,
        deserialize_with = "dates::start_of_service",
        skip_serializing_if = "Option::is_none"
    )]
    pub commissioned: Option<NaiveDate>,
    /// End of operation; a bare year means December 31
    #[serde(
        default,
        deserialize_with = "dates::end_of_service",
        skip_serializing_if = "Option::is_none"
    )]
    pub decommissioned: Option<NaiveDate>,
}

impl TurbineRecord {
    /// Create a record with every optional attribute missing.
    pub fn new(id: impl Into<String>, position: Position, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            source: source.into(),
            country: None,
            is_offshore: None,
            hub_height_m: None,
            rotor_diameter_m: None,
            installed_power_kw: None,
            turbine_type: None,
            match_confidence: None,
            matched_by: None,
            name: None,
            manufacturer: None,
            model: None,
            wind_farm: None,
            n_turbines: None,
            commissioned: None,
            decommissioned: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_offshore(mut self, offshore: bool) -> Self {
        self.is_offshore = Some(offshore);
        self
    }

    pub fn with_hub_height(mut self, meters: f64) -> Self {
        self.hub_height_m = Some(meters);
        self
    }

    pub fn with_rotor_diameter(mut self, meters: f64) -> Self {
        self.rotor_diameter_m = Some(meters);
        self
    }

    pub fn with_installed_power(mut self, kw: f64) -> Self {
        self.installed_power_kw = Some(kw);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_wind_farm(mut self, name: impl Into<String>) -> Self {
        self.wind_farm = Some(name.into());
        self
    }

    pub fn with_n_turbines(mut self, n: u32) -> Self {
        self.n_turbines = Some(n);
        self
    }

    pub fn with_commissioned(mut self, date: NaiveDate) -> Self {
        self.commissioned = Some(date);
        self
    }

    pub fn with_decommissioned(mut self, date: NaiveDate) -> Self {
        self.decommissioned = Some(date);
        self
    }

    /// Whether the turbine is in operation on `date`.
    ///
    /// Missing service dates never exclude a record.
    pub fn in_service_on(&self, date: NaiveDate) -> bool {
        self.commissioned.map_or(true, |start| start <= date)
            && self.decommissioned.map_or(true, |end| date <= end)
    }

    /// Number of optional attributes that carry a value.
    pub fn attribute_count(&self) -> usize {
        [
            self.country.is_some(),
            self.is_offshore.is_some(),
            self.hub_height_m.is_some(),
            self.rotor_diameter_m.is_some(),
            self.installed_power_kw.is_some(),
            self.turbine_type.is_some(),
            self.match_confidence.is_some(),
            self.matched_by.is_some(),
            self.name.is_some(),
            self.manufacturer.is_some(),
            self.model.is_some(),
            self.wind_farm.is_some(),
            self.n_turbines.is_some(),
            self.commissioned.is_some(),
            self.decommissioned.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    /// True if this entry stands for more than one turbine.
    pub fn is_aggregate(&self) -> bool {
        self.n_turbines.map_or(false, |n| n > 1)
    }

    /// Rated power of a single turbine.
    ///
    /// Aggregates divide installed power by their turbine count.
    pub fn rated_power_kw(&self) -> Option<f64> {
        let installed = self.installed_power_kw?;
        match self.n_turbines {
            Some(n) if n > 1 => Some(installed / f64::from(n)),
            _ => Some(installed),
        }
    }

    /// Fill every missing attribute from `other`. Returns how many changed.
    ///
    /// The typing triple (type, confidence, method) moves as one unit.
    pub fn fill_missing_from(&mut self, other: &TurbineRecord) -> usize {
        let mut changed = 0;
        changed += fill(&mut self.country, &other.country);
        changed += fill(&mut self.is_offshore, &other.is_offshore);
        changed += fill(&mut self.hub_height_m, &other.hub_height_m);
        changed += fill(&mut self.rotor_diameter_m, &other.rotor_diameter_m);
        changed += fill(&mut self.installed_power_kw, &other.installed_power_kw);
        changed += fill(&mut self.name, &other.name);
        changed += fill(&mut self.manufacturer, &other.manufacturer);
        changed += fill(&mut self.model, &other.model);
        changed += fill(&mut self.wind_farm, &other.wind_farm);
        changed += fill(&mut self.n_turbines, &other.n_turbines);
        changed += fill(&mut self.commissioned, &other.commissioned);
        changed += fill(&mut self.decommissioned, &other.decommissioned);
        if self.turbine_type.is_none() && other.turbine_type.is_some() {
            changed += self.take_typing(other);
        }
        changed
    }

    /// Overwrite every attribute that `other` has a value for.
    pub fn overwrite_from(&mut self, other: &TurbineRecord) -> usize {
        let mut changed = 0;
        changed += overwrite(&mut self.country, &other.country);
        changed += overwrite(&mut self.is_offshore, &other.is_offshore);
        changed += overwrite(&mut self.hub_height_m, &other.hub_height_m);
        changed += overwrite(&mut self.rotor_diameter_m, &other.rotor_diameter_m);
        changed += overwrite(&mut self.installed_power_kw, &other.installed_power_kw);
        changed += overwrite(&mut self.name, &other.name);
        changed += overwrite(&mut self.manufacturer, &other.manufacturer);
        changed += overwrite(&mut self.model, &other.model);
        changed += overwrite(&mut self.wind_farm, &other.wind_farm);
        changed += overwrite(&mut self.n_turbines, &other.n_turbines);
        changed += overwrite(&mut self.commissioned, &other.commissioned);
        changed += overwrite(&mut self.decommissioned, &other.decommissioned);
        if other.turbine_type.is_some() {
            changed += self.take_typing(other);
        }
        changed
    }

    fn take_typing(&mut self, other: &TurbineRecord) -> usize {
        let before = (
            self.turbine_type.clone(),
            self.match_confidence,
            self.matched_by,
        );
        self.turbine_type = other.turbine_type.clone();
        self.match_confidence = other.match_confidence;
        self.matched_by = other.matched_by;
        let after = (
            self.turbine_type.clone(),
            self.match_confidence,
            self.matched_by,
        );
        usize::from(before != after)
    }
}

fn fill<T: Clone>(dst: &mut Option<T>, src: &Option<T>) -> usize {
    if dst.is_none() && src.is_some() {
        *dst = src.clone();
        1
    } else {
        0
    }
}

fn overwrite<T: Clone + PartialEq>(dst: &mut Option<T>, src: &Option<T>) -> usize {
    match src {
        Some(value) if dst.as_ref() != Some(value) => {
            *dst = Some(value.clone());
            1
        }
        _ => 0,
    }
}
