//! R-tree backed point index.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::geo::Position;
use crate::record::TurbineRecord;

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// A point returned by a query: its index in the build input and its
/// planar distance (degrees) to the query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// Nearest-neighbour and radius queries over a fixed point set.
///
/// Built once per operation and dropped with it. Results always refer to
/// positions by their index in the slice the index was built from, and
/// equal distances are ordered by that index so queries are reproducible.
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Bulk-load an index over positions.
    pub fn build(positions: &[Position]) -> Self {
        let points = positions
            .iter()
            .enumerate()
            .map(|(i, p)| IndexedPoint::new(p.xy(), i))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// Index the positions of a record set.
    pub fn from_records(records: &[TurbineRecord]) -> Self {
        let positions: Vec<Position> = records.iter().map(|r| r.position).collect();
        Self::build(&positions)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The closest point, lowest index on ties. `None` for an empty index.
    pub fn nearest(&self, query: &Position) -> Option<Neighbor> {
        let point = query.xy();
        let (_, d2) = self.tree.nearest_neighbor_iter_with_distance_2(&point).next()?;
        // Every point at exactly the nearest distance competes; lowest index wins.
        self.tree
            .locate_within_distance(point, d2)
            .map(|p| p.data)
            .min()
            .map(|index| Neighbor {
                index,
                distance: d2.sqrt(),
            })
    }

    /// Up to `k` closest points ordered by `(distance, index)`.
    pub fn k_nearest(&self, query: &Position, k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }
        let point = query.xy();
        let mut found: Vec<(f64, usize)> = Vec::with_capacity(k);
        for (p, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&point) {
            // Keep pulling past k while distances tie with the k-th point.
            if found.len() >= k && d2 > found[k - 1].0 {
                break;
            }
            found.push((d2, p.data));
        }
        finish(found, Some(k))
    }

    /// All points with planar distance `<= radius`, ordered by `(distance, index)`.
    pub fn within_radius(&self, query: &Position, radius: f64) -> Vec<Neighbor> {
        if !(radius >= 0.0) {
            return Vec::new();
        }
        let point = query.xy();
        let found = self
            .tree
            .locate_within_distance(point, radius * radius)
            .map(|p| (squared(p.geom(), &point), p.data))
            .collect();
        finish(found, None)
    }

    /// The closest point if it lies within `radius`.
    pub fn nearest_within(&self, query: &Position, radius: f64) -> Option<Neighbor> {
        self.nearest(query)
            .filter(|n| n.distance * n.distance <= radius * radius)
    }
}

fn squared(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

fn finish(mut found: Vec<(f64, usize)>, limit: Option<usize>) -> Vec<Neighbor> {
    found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    if let Some(k) = limit {
        found.truncate(k);
    }
    found
        .into_iter()
        .map(|(d2, index)| Neighbor {
            index,
            distance: d2.sqrt(),
        })
        .collect()
}
