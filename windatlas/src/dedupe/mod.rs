//! Near-duplicate removal within one record set.
//!
//! Duplicates are connected components of the graph that links records
//! closer than `d_min` (planar degrees, strict), so chains of close points
//! collapse to a single record. Each component keeps one survivor chosen by
//! a fixed tie-break, which makes the result independent of worker
//! scheduling and idempotent.

mod cluster;
mod survivor;

#[cfg(test)]
mod tests;

use tracing::{debug, info};

use crate::geo::approx_meters;
use crate::record::TurbineRecord;
use crate::report::{Stage, StageOutput, StageReport};

pub use cluster::find_clusters;
pub use survivor::rank_members;

/// Default separation below which two records are duplicates (~150 m).
pub const DEFAULT_MIN_DISTANCE: f64 = 1.5e-3;

/// Deduplicator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupeOptions {
    /// Records strictly closer than this (degrees) are duplicates
    pub min_distance: f64,
    /// Source tags, most trusted first
    pub source_priority: Vec<String>,
    /// Fill the survivor's missing attributes from the dropped members
    pub enrich_survivor: bool,
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            min_distance: DEFAULT_MIN_DISTANCE,
            source_priority: Vec::new(),
            enrich_survivor: false,
        }
    }
}

/// Collapses near-duplicate records.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    options: DedupeOptions,
}

impl Deduplicator {
    pub fn new(options: DedupeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DedupeOptions {
        &self.options
    }

    /// Deduplicate a record set. Survivors keep their input order.
    pub fn dedupe(&self, label: &str, records: Vec<TurbineRecord>) -> StageOutput {
        let mut report = StageReport::new(Stage::Dedupe, label);
        report.processed = records.len();

        let clusters = find_clusters(&records, self.options.min_distance);
        let mut survivors: Vec<(usize, TurbineRecord)> = Vec::with_capacity(clusters.len());

        for cluster in &clusters {
            let ranked = rank_members(&records, cluster, &self.options.source_priority);
            let best = ranked[0];
            let mut survivor = records[best].clone();

            if ranked.len() > 1 {
                debug!(
                    survivor = %survivor.id,
                    dropped = ranked.len() - 1,
                    "Collapsed duplicate cluster"
                );
                if self.options.enrich_survivor {
                    for &other in &ranked[1..] {
                        survivor.fill_missing_from(&records[other]);
                    }
                }
            }
            survivors.push((best, survivor));
        }

        survivors.sort_by_key(|(index, _)| *index);
        let out: Vec<TurbineRecord> = survivors.into_iter().map(|(_, r)| r).collect();

        report.modified = report.processed - out.len();
        report.output = out.len();
        info!(
            label,
            min_distance = self.options.min_distance,
            approx_m = approx_meters(self.options.min_distance),
            removed = report.modified,
            "Deduplicated records"
        );

        StageOutput {
            records: out,
            report,
            review: Vec::new(),
        }
    }
}
