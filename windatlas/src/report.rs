//! Stage reports and review items.
//!
//! Every pipeline stage returns a [`StageOutput`]: the new record set, a
//! [`StageReport`] with processed / modified / flagged counts, and the
//! [`ReviewItem`]s for records that need a human look. Per-record problems
//! never abort a stage; they end up here instead.

use std::fmt;

use serde::Serialize;

use crate::record::TurbineRecord;

/// Pipeline stage identifiers used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingest,
    Resolve,
    Dedupe,
    Merge,
    WindfarmMap,
    Subset,
    Match,
}

impl Stage {
    /// Short lowercase name for logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Ingest => "ingest",
            Stage::Resolve => "resolve",
            Stage::Dedupe => "dedupe",
            Stage::Merge => "merge",
            Stage::WindfarmMap => "map-windfarms",
            Stage::Subset => "subset",
            Stage::Match => "match",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts produced by one run of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    /// Which stage produced the report
    pub stage: Stage,
    /// Dataset or plan step the stage ran on
    pub label: String,
    /// Records the stage looked at
    pub processed: usize,
    /// Records whose fields the stage changed (or, for dedupe, records dropped)
    pub modified: usize,
    /// Records surfaced for manual review
    pub flagged: usize,
    /// Records in the stage output
    pub output: usize,
}

impl StageReport {
    /// Create an empty report for a stage.
    pub fn new(stage: Stage, label: impl Into<String>) -> Self {
        Self {
            stage,
            label: label.into(),
            processed: 0,
            modified: 0,
            flagged: 0,
            output: 0,
        }
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: processed={} modified={} flagged={} output={}",
            self.stage, self.label, self.processed, self.modified, self.flagged, self.output
        )
    }
}

/// Why a record was surfaced for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ReviewReason {
    /// The record could not be read into the canonical shape.
    Malformed { message: String },
    /// Non-finite or out-of-range coordinates; the record was skipped.
    InvalidPosition { message: String },
    /// The `(source, id)` pair was already seen; the record was skipped.
    DuplicateId,
    /// The position lies outside every land and EEZ polygon.
    OutsideBoundaries,
    /// Lost a one-to-one correspondence to a closer record.
    ///
    /// `distance` is planar degrees to the contested record, `distance_m`
    /// the great-circle distance.
    ContestedMatch {
        winner_id: String,
        distance: f64,
        distance_m: f64,
    },
    /// Typed from a region default rather than a catalog match.
    DefaultSpec { designation: String, region: String },
    /// Catalog match below the review confidence.
    LowConfidence { designation: String, confidence: f64 },
    /// No catalog match and no applicable default.
    Unresolved,
}

impl ReviewReason {
    /// Serialized tag of the reason.
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewReason::Malformed { .. } => "malformed",
            ReviewReason::InvalidPosition { .. } => "invalid_position",
            ReviewReason::DuplicateId => "duplicate_id",
            ReviewReason::OutsideBoundaries => "outside_boundaries",
            ReviewReason::ContestedMatch { .. } => "contested_match",
            ReviewReason::DefaultSpec { .. } => "default_spec",
            ReviewReason::LowConfidence { .. } => "low_confidence",
            ReviewReason::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewReason::Malformed { message } => write!(f, "malformed record: {}", message),
            ReviewReason::InvalidPosition { message } => write!(f, "invalid position: {}", message),
            ReviewReason::DuplicateId => write!(f, "duplicate id within source"),
            ReviewReason::OutsideBoundaries => write!(f, "outside all land and EEZ polygons"),
            ReviewReason::ContestedMatch {
                winner_id,
                distance,
                distance_m,
            } => write!(
                f,
                "lost correspondence at {:.6} deg ({:.0} m) to closer record '{}'",
                distance, distance_m, winner_id
            ),
            ReviewReason::DefaultSpec {
                designation,
                region,
            } => write!(f, "default spec '{}' for region {}", designation, region),
            ReviewReason::LowConfidence {
                designation,
                confidence,
            } => write!(
                f,
                "low-confidence match '{}' ({:.2})",
                designation, confidence
            ),
            ReviewReason::Unresolved => write!(f, "no specification could be assigned"),
        }
    }
}

/// A record surfaced for manual review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    /// Stage that raised the item
    pub stage: Stage,
    /// Provenance tag of the record (empty if unreadable)
    pub source: String,
    /// Record id (empty if unreadable)
    pub id: String,
    #[serde(flatten)]
    pub reason: ReviewReason,
}

impl ReviewItem {
    /// Review item for a known record.
    pub fn for_record(stage: Stage, record: &TurbineRecord, reason: ReviewReason) -> Self {
        Self {
            stage,
            source: record.source.clone(),
            id: record.id.clone(),
            reason,
        }
    }
}

impl fmt::Display for ReviewItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}/{}: {}", self.stage, self.source, self.id, self.reason)
    }
}

/// Result of running one stage: records plus bookkeeping.
#[derive(Debug, Clone)]
pub struct StageOutput {
    pub records: Vec<TurbineRecord>,
    pub report: StageReport,
    pub review: Vec<ReviewItem>,
}

impl StageOutput {
    /// Log the report summary and every review item.
    pub fn log(&self) {
        tracing::info!(
            stage = %self.report.stage,
            label = %self.report.label,
            processed = self.report.processed,
            modified = self.report.modified,
            flagged = self.report.flagged,
            output = self.report.output,
            "Stage complete"
        );
        for item in &self.review {
            tracing::warn!(
                stage = %item.stage,
                source = %item.source,
                id = %item.id,
                "{}",
                item.reason
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;

    #[test]
    fn test_stage_report_display() {
        let mut report = StageReport::new(Stage::Dedupe, "osm");
        report.processed = 10;
        report.modified = 2;
        report.output = 8;
        assert_eq!(
            report.to_string(),
            "dedupe[osm]: processed=10 modified=2 flagged=0 output=8"
        );
    }

    #[test]
    fn test_review_item_serializes_flat() {
        let record = TurbineRecord::new("t1", Position::new(4.0, 52.0).unwrap(), "osm");
        let item = ReviewItem::for_record(Stage::Resolve, &record, ReviewReason::OutsideBoundaries);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["stage"], "resolve");
        assert_eq!(json["reason"], "outside_boundaries");
        assert_eq!(json["id"], "t1");
    }

    #[test]
    fn test_reason_kind_matches_serialized_tag() {
        let reason = ReviewReason::LowConfidence {
            designation: "E-82".into(),
            confidence: 0.2,
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["reason"], reason.kind());
    }
}
