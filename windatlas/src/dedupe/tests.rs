//! Tests for the deduplicator.

use super::*;
use crate::geo::Position;

fn record(id: &str, source: &str, lon: f64, lat: f64) -> TurbineRecord {
    TurbineRecord::new(id, Position::new(lon, lat).unwrap(), source)
}

fn dedupe(records: Vec<TurbineRecord>, min_distance: f64) -> Vec<TurbineRecord> {
    let options = DedupeOptions {
        min_distance,
        ..DedupeOptions::default()
    };
    Deduplicator::new(options).dedupe("test", records).records
}

#[test]
fn test_transitive_cluster_collapses_to_one() {
    let records = vec![
        record("a", "s", 0.0, 0.0),
        record("b", "s", 0.0, 0.0001),
        record("c", "s", 0.0, 0.0002),
    ];
    let out = dedupe(records, 0.00015);
    assert_eq!(out.len(), 1);
}

#[test]
fn test_distant_records_survive() {
    let records = vec![record("a", "s", 0.0, 0.0), record("b", "s", 1.0, 1.0)];
    assert_eq!(dedupe(records, 0.001).len(), 2);
}

#[test]
fn test_threshold_is_strict() {
    let records = vec![record("a", "s", 0.0, 0.0), record("b", "s", 0.0, 0.5)];
    assert_eq!(dedupe(records.clone(), 0.5).len(), 2);
    assert_eq!(dedupe(records, 0.5001).len(), 1);
}

#[test]
fn test_empty_input() {
    let out = Deduplicator::default().dedupe("empty", Vec::new());
    assert!(out.records.is_empty());
    assert_eq!(out.report.processed, 0);
}

#[test]
fn test_survivor_prefers_more_attributes() {
    let records = vec![
        record("a", "s", 0.0, 0.0),
        record("b", "s", 0.0, 0.0001).with_hub_height(100.0),
    ];
    let out = dedupe(records, 0.001);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, "b");
}

#[test]
fn test_survivor_prefers_source_priority() {
    let records = vec![
        record("a", "osm", 0.0, 0.0),
        record("b", "registry", 0.0, 0.0001),
    ];
    let options = DedupeOptions {
        min_distance: 0.001,
        source_priority: vec!["registry".into(), "osm".into()],
        enrich_survivor: false,
    };
    let out = Deduplicator::new(options).dedupe("test", records);
    assert_eq!(out.records[0].id, "b");
    assert_eq!(out.report.modified, 1);
}

#[test]
fn test_unlisted_source_ranks_last() {
    let records = vec![
        record("a", "unknown", 0.0, 0.0),
        record("b", "osm", 0.0, 0.0001),
    ];
    let options = DedupeOptions {
        min_distance: 0.001,
        source_priority: vec!["osm".into()],
        enrich_survivor: false,
    };
    let out = Deduplicator::new(options).dedupe("test", records);
    assert_eq!(out.records[0].id, "b");
}

#[test]
fn test_survivor_falls_back_to_smaller_id() {
    let records = vec![record("z9", "s", 0.0, 0.0), record("a1", "s", 0.0, 0.0001)];
    let out = dedupe(records, 0.001);
    assert_eq!(out[0].id, "a1");
}

#[test]
fn test_dropped_records_vanish_without_enrichment() {
    let records = vec![
        record("a", "s", 0.0, 0.0).with_hub_height(100.0),
        record("b", "s", 0.0, 0.0001).with_rotor_diameter(120.0),
    ];
    let out = dedupe(records, 0.001);
    assert_eq!(out[0].id, "a");
    assert_eq!(out[0].rotor_diameter_m, None);
}

#[test]
fn test_enrich_survivor_fills_missing() {
    let records = vec![
        record("a", "s", 0.0, 0.0).with_hub_height(100.0),
        record("b", "s", 0.0, 0.0001).with_rotor_diameter(120.0),
    ];
    let options = DedupeOptions {
        min_distance: 0.001,
        source_priority: Vec::new(),
        enrich_survivor: true,
    };
    let out = Deduplicator::new(options).dedupe("test", records);
    assert_eq!(out.records[0].id, "a");
    assert_eq!(out.records[0].hub_height_m, Some(100.0));
    assert_eq!(out.records[0].rotor_diameter_m, Some(120.0));
}

#[test]
fn test_survivors_keep_input_order() {
    let records = vec![
        record("far", "s", 5.0, 5.0),
        record("x", "s", 0.0, 0.0),
        record("y", "s", 0.0, 0.0001).with_hub_height(90.0),
    ];
    let out = dedupe(records, 0.001);
    let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["far", "y"]);
}

#[test]
fn test_find_clusters_groups_indices() {
    let records = vec![
        record("a", "s", 0.0, 0.0),
        record("b", "s", 3.0, 3.0),
        record("c", "s", 0.0, 0.0001),
    ];
    assert_eq!(find_clusters(&records, 0.001), vec![vec![0, 2], vec![1]]);
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn records() -> impl Strategy<Value = Vec<TurbineRecord>> {
        prop::collection::vec((0.0f64..0.01, 0.0f64..0.01, prop::option::of(50.0f64..150.0)), 0..40)
            .prop_map(|points| {
                points
                    .into_iter()
                    .enumerate()
                    .map(|(i, (lon, lat, hub))| {
                        let mut r = record(&format!("t{}", i), "s", lon, lat);
                        r.hub_height_m = hub;
                        r
                    })
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn dedupe_is_idempotent(input in records(), d_min in 0.0001f64..0.003) {
            let once = dedupe(input, d_min);
            let twice = dedupe(once.clone(), d_min);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn dedupe_is_deterministic(input in records(), d_min in 0.0001f64..0.003) {
            let a = dedupe(input.clone(), d_min);
            let b = dedupe(input, d_min);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn survivors_are_separated(input in records(), d_min in 0.0001f64..0.003) {
            let out = dedupe(input, d_min);
            for (i, a) in out.iter().enumerate() {
                for b in &out[i + 1..] {
                    prop_assert!(crate::geo::planar_distance(&a.position, &b.position) >= d_min);
                }
            }
        }
    }
}
