//! Spatial lookups over record positions.
//!
//! [`SpatialIndex`] wraps an R-tree of `(lon, lat)` points. It backs the
//! deduplicator's neighbourhood graph, the merger's nearest-record
//! nomination and the wind-farm mapper's candidate search.

mod index;

pub use index::{Neighbor, SpatialIndex};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;

    fn pos(lon: f64, lat: f64) -> Position {
        Position::new(lon, lat).unwrap()
    }

    fn grid() -> Vec<Position> {
        vec![pos(0.0, 0.0), pos(1.0, 0.0), pos(0.0, 1.0), pos(3.0, 3.0)]
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = SpatialIndex::build(&[]);
        assert!(index.is_empty());
        assert!(index.nearest(&pos(0.0, 0.0)).is_none());
        assert!(index.k_nearest(&pos(0.0, 0.0), 3).is_empty());
        assert!(index.within_radius(&pos(0.0, 0.0), 10.0).is_empty());
        assert!(index.nearest_within(&pos(0.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_nearest() {
        let index = SpatialIndex::build(&grid());
        let n = index.nearest(&pos(2.9, 3.1)).unwrap();
        assert_eq!(n.index, 3);
        assert!((n.distance - (0.02f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_tie_prefers_lower_index() {
        let index = SpatialIndex::build(&grid());
        // Equidistant from points 1 and 2.
        let n = index.nearest(&pos(0.5, 0.5)).unwrap();
        assert_eq!(n.index, 0);
        let n = index.nearest(&pos(1.0, 1.0)).unwrap();
        assert_eq!(n.index, 1);
    }

    #[test]
    fn test_k_nearest_orders_by_distance_then_index() {
        let index = SpatialIndex::build(&grid());
        let found: Vec<usize> = index
            .k_nearest(&pos(1.0, 1.0), 3)
            .into_iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(found, vec![1, 2, 0]);

        let two: Vec<usize> = index
            .k_nearest(&pos(1.0, 1.0), 1)
            .into_iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(two, vec![1]);
    }

    #[test]
    fn test_within_radius_is_inclusive() {
        let index = SpatialIndex::build(&grid());
        let found: Vec<usize> = index
            .within_radius(&pos(0.0, 0.0), 1.0)
            .into_iter()
            .map(|n| n.index)
            .collect();
        assert_eq!(found, vec![0, 1, 2]);
        assert!(index.within_radius(&pos(0.0, 0.0), -1.0).is_empty());
    }

    #[test]
    fn test_nearest_within() {
        let index = SpatialIndex::build(&grid());
        assert_eq!(index.nearest_within(&pos(2.5, 2.5), 1.0).map(|n| n.index), Some(3));
        assert!(index.nearest_within(&pos(2.0, 2.0), 0.5).is_none());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn positions() -> impl Strategy<Value = Vec<Position>> {
            prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 0..60)
                .prop_map(|v| v.into_iter().map(|(x, y)| pos(x, y)).collect())
        }

        proptest! {
            #[test]
            fn nearest_matches_linear_scan(
                points in positions(),
                qx in -10.0f64..10.0,
                qy in -10.0f64..10.0,
            ) {
                let index = SpatialIndex::build(&points);
                let query = pos(qx, qy);
                let expected = points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (crate::geo::planar_distance(p, &query), i))
                    .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                let got = index.nearest(&query);
                prop_assert_eq!(got.map(|n| n.index), expected.map(|e| e.1));
            }

            #[test]
            fn within_radius_matches_linear_scan(
                points in positions(),
                qx in -10.0f64..10.0,
                qy in -10.0f64..10.0,
                r in 0.0f64..5.0,
            ) {
                let index = SpatialIndex::build(&points);
                let query = pos(qx, qy);
                let mut got: Vec<usize> =
                    index.within_radius(&query, r).into_iter().map(|n| n.index).collect();
                got.sort_unstable();
                let expected: Vec<usize> = points
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| {
                        let dx = p.lon() - qx;
                        let dy = p.lat() - qy;
                        dx * dx + dy * dy <= r * r
                    })
                    .map(|(i, _)| i)
                    .collect();
                prop_assert_eq!(got, expected);
            }
        }
    }
}
