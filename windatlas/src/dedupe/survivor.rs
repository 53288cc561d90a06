//! Survivor selection within a duplicate cluster.

use std::cmp::Ordering;

use crate::record::TurbineRecord;

/// Order cluster members best-first.
///
/// More non-null attributes wins, then the source listed earlier in
/// `source_priority` (unlisted sources rank last), then the smaller id, then
/// the earlier input position.
pub fn rank_members(
    records: &[TurbineRecord],
    cluster: &[usize],
    source_priority: &[String],
) -> Vec<usize> {
    let mut ranked = cluster.to_vec();
    ranked.sort_by(|&a, &b| compare(records, a, b, source_priority));
    ranked
}

fn compare(records: &[TurbineRecord], a: usize, b: usize, source_priority: &[String]) -> Ordering {
    let (ra, rb) = (&records[a], &records[b]);
    rb.attribute_count()
        .cmp(&ra.attribute_count())
        .then_with(|| {
            priority_rank(&ra.source, source_priority)
                .cmp(&priority_rank(&rb.source, source_priority))
        })
        .then_with(|| ra.id.cmp(&rb.id))
        .then(a.cmp(&b))
}

fn priority_rank(source: &str, source_priority: &[String]) -> usize {
    source_priority
        .iter()
        .position(|s| s.eq_ignore_ascii_case(source))
        .unwrap_or(source_priority.len())
}
