//! Configuration settings structs.

use std::path::PathBuf;

use crate::catalog::RegionKey;
use crate::dedupe::DedupeOptions;
use crate::filter::SubsetOptions;
use crate::matcher::{MatchWeights, MatcherOptions};

use super::defaults::*;

/// Full contents of `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub boundaries: BoundarySettings,
    pub catalog: CatalogSettings,
    /// Region default table, in file order
    pub defaults: Vec<(RegionKey, String)>,
    pub dedupe: DedupeSettings,
    pub merge: MergeSettings,
    /// `[subset]`
    pub subset: SubsetOptions,
    pub matcher: MatcherSettings,
    pub logging: LoggingSettings,
}

/// `[boundaries]`
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySettings {
    pub land: Option<PathBuf>,
    pub eez: Option<PathBuf>,
    pub land_name_fields: Vec<String>,
    pub eez_name_fields: Vec<String>,
}

impl Default for BoundarySettings {
    fn default() -> Self {
        Self {
            land: None,
            eez: None,
            land_name_fields: default_land_name_fields(),
            eez_name_fields: default_eez_name_fields(),
        }
    }
}

/// `[catalog]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSettings {
    pub path: Option<PathBuf>,
}

/// `[dedupe]`
#[derive(Debug, Clone, PartialEq)]
pub struct DedupeSettings {
    pub min_distance: f64,
    pub source_priority: Vec<String>,
    pub enrich_survivor: bool,
}

impl Default for DedupeSettings {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_DEDUPE_DISTANCE,
            source_priority: Vec::new(),
            enrich_survivor: false,
        }
    }
}

/// `[merge]`
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSettings {
    pub max_distance: f64,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MERGE_DISTANCE,
        }
    }
}

/// `[matcher]`
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherSettings {
    pub weight_rotor_diameter: f64,
    pub weight_hub_height: f64,
    pub weight_rated_power: f64,
    pub acceptance_threshold: f64,
    pub review_confidence: f64,
    pub forbidden_types: Vec<String>,
    pub allow_extrapolation: bool,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            weight_rotor_diameter: DEFAULT_WEIGHT_ROTOR_DIAMETER,
            weight_hub_height: DEFAULT_WEIGHT_HUB_HEIGHT,
            weight_rated_power: DEFAULT_WEIGHT_RATED_POWER,
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            review_confidence: DEFAULT_REVIEW_CONFIDENCE,
            forbidden_types: Vec::new(),
            allow_extrapolation: false,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Directory for the log file; no file logging when unset
    pub directory: Option<PathBuf>,
    pub file: Option<String>,
}

impl ConfigFile {
    pub fn dedupe_options(&self) -> DedupeOptions {
        DedupeOptions {
            min_distance: self.dedupe.min_distance,
            source_priority: self.dedupe.source_priority.clone(),
            enrich_survivor: self.dedupe.enrich_survivor,
        }
    }

    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            weights: MatchWeights {
                rotor_diameter: self.matcher.weight_rotor_diameter,
                hub_height: self.matcher.weight_hub_height,
                rated_power: self.matcher.weight_rated_power,
            },
            acceptance_threshold: self.matcher.acceptance_threshold,
            review_confidence: self.matcher.review_confidence,
            forbidden_types: self.matcher.forbidden_types.clone(),
            allow_extrapolation: self.matcher.allow_extrapolation,
        }
    }
}
