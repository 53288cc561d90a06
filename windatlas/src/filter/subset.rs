//! The subset stage.

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::info;

use crate::record::TurbineRecord;
use crate::report::{Stage, StageOutput, StageReport};

use super::{SpatialSubset, SubsetOptions};

/// Drops records outside the spatial domain or out of service on the
/// situation date.
///
/// Dropped records are counted as modified; they are expected, so no review
/// items are raised.
#[derive(Debug, Clone)]
pub struct RecordFilter {
    spatial: SpatialSubset,
    date: Option<NaiveDate>,
}

impl RecordFilter {
    /// Build a filter; a `today` situation date is fixed here.
    pub fn new(options: SubsetOptions) -> Self {
        Self {
            date: options.situation_date.resolve(),
            spatial: options.spatial,
        }
    }

    pub fn situation_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn keeps(&self, record: &TurbineRecord) -> bool {
        self.spatial.contains(record) && self.date.map_or(true, |d| record.in_service_on(d))
    }

    /// Keep the records that pass, in input order.
    pub fn apply(&self, label: &str, records: Vec<TurbineRecord>) -> StageOutput {
        let mut report = StageReport::new(Stage::Subset, label);
        report.processed = records.len();

        let keep: Vec<bool> = records.par_iter().map(|r| self.keeps(r)).collect();
        let out: Vec<TurbineRecord> = records
            .into_iter()
            .zip(keep)
            .filter_map(|(record, keep)| keep.then_some(record))
            .collect();

        report.modified = report.processed - out.len();
        report.output = out.len();
        let situation_date = self
            .date
            .map_or_else(|| "all".to_string(), |d| d.to_string());
        info!(
            label,
            method = self.spatial.method(),
            situation_date = %situation_date,
            selected = out.len(),
            dropped = report.modified,
            "Subset records"
        );

        StageOutput {
            records: out,
            report,
            review: Vec::new(),
        }
    }
}
