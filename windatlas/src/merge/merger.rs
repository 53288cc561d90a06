//! Pairwise merge of two record sets.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::geo::haversine_m;
use crate::record::TurbineRecord;
use crate::report::{ReviewItem, ReviewReason, Stage, StageOutput, StageReport};
use crate::spatial::{Neighbor, SpatialIndex};

use super::MergePolicy;

/// Default maximum correspondence distance in degrees.
pub const DEFAULT_MAX_DISTANCE: f64 = 1.5e-3;

/// Settings for one merge operation.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    pub policy: MergePolicy,
    /// Pairs farther apart than this (degrees) never correspond
    pub max_distance: f64,
    /// Provenance tag for merged records; defaults to `"<primary>+<secondary>"`
    pub label: Option<String>,
}

impl MergeOptions {
    pub fn new(policy: MergePolicy, max_distance: f64) -> Self {
        Self {
            policy,
            max_distance,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A secondary record that lost its primary record to a closer rival.
#[derive(Debug, Clone, PartialEq)]
pub struct Contest {
    pub secondary: usize,
    pub primary: usize,
    pub winner: usize,
    pub distance: f64,
}

/// One-to-one correspondence between secondary and primary records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correspondence {
    /// `matched[j]` is the primary index matched to secondary record `j`
    pub matched: Vec<Option<usize>>,
    pub contests: Vec<Contest>,
}

impl Correspondence {
    pub fn match_count(&self) -> usize {
        self.matched.iter().flatten().count()
    }

    /// Secondary indices without a correspondence, in order.
    pub fn unmatched(&self) -> impl Iterator<Item = usize> + '_ {
        self.matched
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_none())
            .map(|(j, _)| j)
    }
}

/// Find one-to-one correspondences.
///
/// Every secondary record nominates its nearest primary record within
/// `max_distance` (in parallel). A primary record nominated several times
/// goes to the closest nominee, lower secondary index on equal distance;
/// the other nominees stay unmatched.
pub fn correspond(
    primary: &[TurbineRecord],
    secondary: &[TurbineRecord],
    max_distance: f64,
) -> Correspondence {
    let mut result = Correspondence {
        matched: vec![None; secondary.len()],
        contests: Vec::new(),
    };
    if primary.is_empty() || secondary.is_empty() {
        return result;
    }

    let index = SpatialIndex::from_records(primary);
    let nominations: Vec<Option<Neighbor>> = secondary
        .par_iter()
        .map(|record| index.nearest_within(&record.position, max_distance))
        .collect();

    // Best nominee per primary record: (distance, secondary index).
    let mut best: Vec<Option<(f64, usize)>> = vec![None; primary.len()];
    for (j, nomination) in nominations.iter().enumerate() {
        if let Some(n) = nomination {
            let slot = &mut best[n.index];
            let better = match slot {
                None => true,
                Some((d, _)) => n.distance < *d,
            };
            if better {
                *slot = Some((n.distance, j));
            }
        }
    }

    for (j, nomination) in nominations.iter().enumerate() {
        let Some(n) = nomination else { continue };
        match best[n.index] {
            Some((_, winner)) if winner == j => result.matched[j] = Some(n.index),
            Some((_, winner)) => result.contests.push(Contest {
                secondary: j,
                primary: n.index,
                winner,
                distance: n.distance,
            }),
            None => {}
        }
    }
    result
}

/// Combines two record sets under a [`MergePolicy`].
#[derive(Debug, Clone)]
pub struct RecordMerger {
    options: MergeOptions,
}

impl RecordMerger {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `secondary` into `primary`.
    ///
    /// The output holds the primary records in order, then (for `combine`)
    /// the unmatched secondary records in order.
    pub fn merge(
        &self,
        label: &str,
        primary: Vec<TurbineRecord>,
        secondary: Vec<TurbineRecord>,
    ) -> StageOutput {
        let policy = self.options.policy;
        let mut report = StageReport::new(Stage::Merge, label);
        report.processed = primary.len() + secondary.len();

        let correspondence = correspond(&primary, &secondary, self.options.max_distance);
        let mut out = primary;

        for (j, matched) in correspondence.matched.iter().enumerate() {
            let Some(i) = *matched else { continue };
            let donor = &secondary[j];
            let target = &mut out[i];
            let primary_source = target.source.clone();
            if policy.apply(target, donor) > 0 {
                target.source = match &self.options.label {
                    Some(tag) => tag.clone(),
                    None => format!("{}+{}", primary_source, donor.source),
                };
                report.modified += 1;
            }
        }

        let mut review = Vec::with_capacity(correspondence.contests.len());
        for contest in &correspondence.contests {
            let loser = &secondary[contest.secondary];
            let distance_m = haversine_m(&loser.position, &out[contest.primary].position);
            debug!(
                id = %loser.id,
                winner = %secondary[contest.winner].id,
                distance_m,
                "Lost contested correspondence"
            );
            review.push(ReviewItem::for_record(
                Stage::Merge,
                loser,
                ReviewReason::ContestedMatch {
                    winner_id: secondary[contest.winner].id.clone(),
                    distance: contest.distance,
                    distance_m,
                },
            ));
        }

        let unmatched: Vec<usize> = correspondence.unmatched().collect();
        if policy.keeps_unmatched() {
            out.extend(unmatched.iter().map(|&j| secondary[j].clone()));
        }

        report.flagged = review.len();
        report.output = out.len();
        info!(
            label,
            policy = %policy,
            max_distance = self.options.max_distance,
            matched = correspondence.match_count(),
            unmatched = unmatched.len(),
            contested = correspondence.contests.len(),
            "Merged record sets"
        );

        StageOutput {
            records: out,
            report,
            review,
        }
    }
}
