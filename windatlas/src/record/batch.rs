//! Validation of incoming records.

use std::collections::HashSet;

use crate::report::{ReviewItem, ReviewReason, Stage, StageOutput, StageReport};

use super::TurbineRecord;

/// A labelled set of records as produced by an ingestion collaborator.
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub label: String,
    pub records: Vec<TurbineRecord>,
}

impl RecordBatch {
    pub fn new(label: impl Into<String>, records: Vec<TurbineRecord>) -> Self {
        Self {
            label: label.into(),
            records,
        }
    }

    /// Validate the batch.
    ///
    /// Records with a non-finite or out-of-range position are rejected, as
    /// are repeats of an already seen `(source, id)` pair (the first
    /// occurrence wins). Rejections are reported as review items, never as
    /// errors.
    pub fn ingest(self) -> StageOutput {
        ingest_records(&self.label, self.records)
    }
}

fn ingest_records(label: &str, records: Vec<TurbineRecord>) -> StageOutput {
    let mut report = StageReport::new(Stage::Ingest, label);
    let mut review = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(records.len());
    let mut accepted = Vec::with_capacity(records.len());

    for record in records {
        report.processed += 1;

        if let Err(e) = record.position.validate() {
            review.push(ReviewItem::for_record(
                Stage::Ingest,
                &record,
                ReviewReason::InvalidPosition {
                    message: e.to_string(),
                },
            ));
            continue;
        }

        if !seen.insert((record.source.clone(), record.id.clone())) {
            review.push(ReviewItem::for_record(
                Stage::Ingest,
                &record,
                ReviewReason::DuplicateId,
            ));
            continue;
        }

        accepted.push(record);
    }

    report.flagged = review.len();
    report.output = accepted.len();
    StageOutput {
        records: accepted,
        report,
        review,
    }
}
