//! Assignment of catalog specifications to records.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::{is_plausible, RegionDefaults, RegionKey, SpecCatalog, SpecCatalogEntry};
use crate::record::{MatchMethod, TurbineRecord};
use crate::report::{ReviewItem, ReviewReason, Stage, StageOutput, StageReport};

use super::report::{MatchKind, MatchSummary};
use super::scoring::{confidence, score, Dimensions, MatchWeights};

/// Matcher settings.
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherOptions {
    pub weights: MatchWeights,
    /// Catalog matches must score strictly below this
    pub acceptance_threshold: f64,
    /// Catalog matches below this confidence are flagged for review
    pub review_confidence: f64,
    /// Model names never assigned by designation or scoring
    pub forbidden_types: Vec<String>,
    /// Score record values that lie outside the catalog's range
    pub allow_extrapolation: bool,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            acceptance_threshold: 0.15,
            review_confidence: 0.5,
            forbidden_types: Vec::new(),
            allow_extrapolation: false,
        }
    }
}

/// Result of matching one record.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'c> {
    Designation(&'c SpecCatalogEntry),
    Scored {
        entry: &'c SpecCatalogEntry,
        score: f64,
        confidence: f64,
    },
    RegionDefault {
        entry: &'c SpecCatalogEntry,
        region: RegionKey,
    },
    Unresolved,
}

impl MatchOutcome<'_> {
    pub fn kind(&self) -> MatchKind {
        match self {
            MatchOutcome::Designation(_) => MatchKind::Designation,
            MatchOutcome::Scored { .. } => MatchKind::Scored,
            MatchOutcome::RegionDefault { .. } => MatchKind::RegionDefault,
            MatchOutcome::Unresolved => MatchKind::Unresolved,
        }
    }
}

/// Assigns a catalog specification to every untyped record.
///
/// Steps, first success wins: designation lookup of the reported model,
/// weighted dimension scoring, region default. Records that pass none are
/// left untyped and reported as unresolved.
pub struct TurbineSpecMatcher<'c> {
    catalog: &'c SpecCatalog,
    defaults: &'c RegionDefaults,
    options: MatcherOptions,
    forbidden: HashSet<String>,
}

impl<'c> TurbineSpecMatcher<'c> {
    pub fn new(
        catalog: &'c SpecCatalog,
        defaults: &'c RegionDefaults,
        options: MatcherOptions,
    ) -> Self {
        let forbidden = options
            .forbidden_types
            .iter()
            .map(|t| catalog.normalize(t))
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            catalog,
            defaults,
            options,
            forbidden,
        }
    }

    fn is_forbidden(&self, name: &str) -> bool {
        self.forbidden.contains(&self.catalog.normalize(name))
    }

    /// Decide the specification for one record.
    pub fn match_record(&self, record: &TurbineRecord) -> MatchOutcome<'c> {
        let diameter = record.rotor_diameter_m;
        let hub = record.hub_height_m;

        if let Some(model) = record.model.as_deref() {
            if !self.is_forbidden(model) {
                if let Some(entry) = self.catalog.lookup(model) {
                    if is_plausible(diameter, hub, entry) {
                        return MatchOutcome::Designation(entry);
                    }
                    debug!(id = %record.id, model, "Designation match failed plausibility check");
                }
            }
        }

        let dims = Dimensions {
            rotor_diameter: diameter,
            hub_height: hub,
            rated_power: record.rated_power_kw(),
        };
        if let Some(outcome) = self.best_scored(&dims) {
            return outcome;
        }

        match self
            .defaults
            .lookup(self.catalog, record.country.as_deref(), record.is_offshore)
        {
            Some((region, entry)) => MatchOutcome::RegionDefault { entry, region },
            None => MatchOutcome::Unresolved,
        }
    }

    fn best_scored(&self, dims: &Dimensions) -> Option<MatchOutcome<'c>> {
        if dims.is_empty() {
            return None;
        }
        let threshold = self.options.acceptance_threshold;
        let ranges = self.catalog.ranges();

        let mut best: Option<(f64, &'c SpecCatalogEntry)> = None;
        for entry in self.catalog.entries() {
            if self.is_forbidden(&entry.designation)
                || !is_plausible(dims.rotor_diameter, dims.hub_height, entry)
            {
                continue;
            }
            let Some(s) = score(
                dims,
                entry,
                ranges,
                &self.options.weights,
                self.options.allow_extrapolation,
            ) else {
                continue;
            };
            // Strict comparison keeps the earlier entry on ties.
            if s < threshold && best.map_or(true, |(b, _)| s < b) {
                best = Some((s, entry));
            }
        }

        best.map(|(s, entry)| MatchOutcome::Scored {
            entry,
            score: s,
            confidence: confidence(s, threshold),
        })
    }

    /// Type every record that lacks a `turbine_type`.
    ///
    /// Every output record carries a `match_confidence`: records typed by
    /// their source keep theirs or get 1.0, unresolved records get 0.0.
    pub fn assign(&self, label: &str, records: Vec<TurbineRecord>) -> (StageOutput, MatchSummary) {
        let mut report = StageReport::new(Stage::Match, label);
        report.processed = records.len();

        let outcomes: Vec<Option<MatchOutcome<'c>>> = records
            .par_iter()
            .map(|r| r.turbine_type.is_none().then(|| self.match_record(r)))
            .collect();

        let mut summary = MatchSummary::default();
        let mut review = Vec::new();
        let mut out = Vec::with_capacity(records.len());

        for (mut record, outcome) in records.into_iter().zip(outcomes) {
            let Some(outcome) = outcome else {
                summary.record(MatchKind::Preassigned, record.country.as_deref());
                record.match_confidence = record.match_confidence.or(Some(1.0));
                record.matched_by = record.matched_by.or(Some(MatchMethod::Source));
                out.push(record);
                continue;
            };
            summary.record(outcome.kind(), record.country.as_deref());

            let flag = match &outcome {
                MatchOutcome::Designation(entry) => {
                    apply(&mut record, entry, 1.0, MatchMethod::Designation);
                    None
                }
                MatchOutcome::Scored {
                    entry, confidence, ..
                } => {
                    apply(&mut record, entry, *confidence, MatchMethod::Scored);
                    (*confidence < self.options.review_confidence).then(|| {
                        ReviewReason::LowConfidence {
                            designation: entry.designation.clone(),
                            confidence: *confidence,
                        }
                    })
                }
                MatchOutcome::RegionDefault { entry, region } => {
                    apply(&mut record, entry, 0.0, MatchMethod::RegionDefault);
                    Some(ReviewReason::DefaultSpec {
                        designation: entry.designation.clone(),
                        region: region.to_string(),
                    })
                }
                MatchOutcome::Unresolved => {
                    record.match_confidence = Some(0.0);
                    Some(ReviewReason::Unresolved)
                }
            };

            if !matches!(outcome, MatchOutcome::Unresolved) {
                report.modified += 1;
            }
            if let Some(reason) = flag {
                review.push(ReviewItem::for_record(Stage::Match, &record, reason));
            }
            out.push(record);
        }

        report.flagged = review.len();
        report.output = out.len();
        info!(
            label,
            designation = summary.count(MatchKind::Designation),
            scored = summary.count(MatchKind::Scored),
            defaults = summary.count(MatchKind::RegionDefault),
            unresolved = summary.count(MatchKind::Unresolved),
            "Matched turbine specifications"
        );

        (
            StageOutput {
                records: out,
                report,
                review,
            },
            summary,
        )
    }
}

/// Record the assignment and fill missing dimensions from the entry.
fn apply(
    record: &mut TurbineRecord,
    entry: &SpecCatalogEntry,
    confidence: f64,
    method: MatchMethod,
) {
    record.turbine_type = Some(entry.designation.clone());
    record.match_confidence = Some(confidence);
    record.matched_by = Some(method);
    record.rotor_diameter_m = record.rotor_diameter_m.or(Some(entry.rotor_diameter_m));
    record.hub_height_m = record.hub_height_m.or(Some(entry.hub_height_m));
    if record.installed_power_kw.is_none() {
        let count = record.n_turbines.filter(|n| *n > 1).unwrap_or(1);
        record.installed_power_kw = Some(entry.rated_power_kw * f64::from(count));
    }
    if record.manufacturer.is_none() {
        record.manufacturer = entry.manufacturer.clone();
    }
}
