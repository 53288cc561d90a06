//! Connected components of the "closer than `d_min`" graph.

use rayon::prelude::*;

use crate::record::TurbineRecord;
use crate::spatial::SpatialIndex;

/// Disjoint-set forest over record indices.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Union keeping the smaller index as root.
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[child] = root;
        }
    }
}

/// Group records whose positions are transitively closer than `min_distance`.
///
/// Returns clusters of input indices, each sorted ascending, ordered by
/// their smallest member. Singletons are included.
pub fn find_clusters(records: &[TurbineRecord], min_distance: f64) -> Vec<Vec<usize>> {
    let n = records.len();
    if n == 0 {
        return Vec::new();
    }

    let index = SpatialIndex::from_records(records);
    // Neighbour queries are independent; only the union pass is sequential.
    let edges: Vec<(usize, usize)> = records
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, record)| {
            index
                .within_radius(&record.position, min_distance)
                .into_iter()
                .filter(move |n| n.index > i && n.distance < min_distance)
                .map(move |n| (i, n.index))
        })
        .collect();

    let mut sets = DisjointSet::new(n);
    for (a, b) in edges {
        sets.union(a, b);
    }

    let mut slot_of_root = vec![usize::MAX; n];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    for i in 0..n {
        let root = sets.find(i);
        if slot_of_root[root] == usize::MAX {
            slot_of_root[root] = clusters.len();
            clusters.push(Vec::new());
        }
        clusters[slot_of_root[root]].push(i);
    }
    clusters
}
