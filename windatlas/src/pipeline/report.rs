//! Pipeline outcome and run report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::matcher::MatchSummary;
use crate::record::{records_json, TurbineRecord};
use crate::report::{ReviewItem, StageReport};

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// The final, typed inventory
    pub inventory: Vec<TurbineRecord>,
    /// One report per stage run, in execution order
    pub reports: Vec<StageReport>,
    pub review: Vec<ReviewItem>,
    pub summary: MatchSummary,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

/// Serializable audit record of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub started: String,
    pub finished: String,
    pub records: usize,
    pub inventory_sha256: String,
    pub stages: &'a [StageReport],
    pub review_items: usize,
    pub matching: &'a MatchSummary,
}

impl PipelineOutcome {
    /// Build the audit report; the digest covers the serialized inventory.
    pub fn run_report(&self) -> Result<RunReport<'_>, serde_json::Error> {
        let bytes = records_json(&self.inventory)?;
        Ok(RunReport {
            started: self.started.to_rfc3339(),
            finished: self.finished.to_rfc3339(),
            records: self.inventory.len(),
            inventory_sha256: crate::io::digest(&bytes),
            stages: &self.reports,
            review_items: self.review.len(),
            matching: &self.summary,
        })
    }
}
