//! Country and onshore/offshore tagging.

use rayon::prelude::*;
use tracing::debug;

use crate::geo::Position;
use crate::record::TurbineRecord;
use crate::report::{ReviewItem, ReviewReason, Stage, StageOutput, StageReport};

use super::layer::BoundaryLayer;

/// Outcome of locating one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Inside a land polygon
    Land(String),
    /// Outside every land polygon but inside an EEZ
    Offshore(String),
    /// In neither layer
    Outside,
}

/// Tags records with the owning country and an offshore flag.
///
/// Land polygons are tested first; only points outside every land polygon
/// are tested against the EEZ layer.
pub struct CountryOffshoreResolver {
    land: BoundaryLayer,
    eez: Option<BoundaryLayer>,
}

impl CountryOffshoreResolver {
    pub fn new(land: BoundaryLayer, eez: Option<BoundaryLayer>) -> Self {
        Self { land, eez }
    }

    /// Locate a single position.
    pub fn locate(&self, position: &Position) -> Resolution {
        let point = position.xy();
        if let Some(name) = self.land.locate(point) {
            return Resolution::Land(name.to_string());
        }
        match self.eez.as_ref().and_then(|eez| eez.locate(point)) {
            Some(name) => Resolution::Offshore(name.to_string()),
            None => Resolution::Outside,
        }
    }

    /// Tag every record. Records outside both layers keep their fields and
    /// are flagged for review.
    pub fn resolve(&self, label: &str, records: Vec<TurbineRecord>) -> StageOutput {
        let mut report = StageReport::new(Stage::Resolve, label);
        report.processed = records.len();

        let resolved: Vec<(TurbineRecord, bool, bool)> = records
            .into_par_iter()
            .map(|mut record| {
                let (country, offshore) = match self.locate(&record.position) {
                    Resolution::Land(name) => (name, false),
                    Resolution::Offshore(name) => (name, true),
                    Resolution::Outside => return (record, false, true),
                };
                let changed = record.country.as_deref() != Some(country.as_str())
                    || record.is_offshore != Some(offshore);
                record.country = Some(country);
                record.is_offshore = Some(offshore);
                (record, changed, false)
            })
            .collect();

        let mut out = Vec::with_capacity(resolved.len());
        let mut review = Vec::new();
        for (record, changed, outside) in resolved {
            if changed {
                report.modified += 1;
            }
            if outside {
                debug!(id = %record.id, position = %record.position, "Outside all boundaries");
                review.push(ReviewItem::for_record(
                    Stage::Resolve,
                    &record,
                    ReviewReason::OutsideBoundaries,
                ));
            }
            out.push(record);
        }

        report.flagged = review.len();
        report.output = out.len();
        StageOutput {
            records: out,
            report,
            review,
        }
    }
}
